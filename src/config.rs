//=========================================================================
// Scene Catalog
//=========================================================================
//
// Authoring data loaded from JSON: the scenes a project knows about, its
// named loading screens and the auto loaders attached to scenes.
//
// ```json
// {
//   "scenes": [{ "name": "Menu", "path": "Assets/Scenes/Menu.scene" }],
//   "loading_screens": {
//     "default": { "loading_scene": { "name": "Loading" }, "min_loading_time": 2.0 }
//   },
//   "auto_loaders": {
//     "Splash": { "delay_seconds": 3.0, "target": { "name": "Menu" } }
//   }
// }
// ```
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

use log::{info, warn};
use serde::{Deserialize, Serialize};

//=== Internal Dependencies ===============================================

use crate::core::auto_loader::AutoLoader;
use crate::core::loading_screen::LoadingScreen;
use crate::core::scene::SceneHandle;

//=== Constants ===========================================================

/// Loading screen a runtime built from a catalog uses by default.
pub const DEFAULT_LOADING_SCREEN: &str = "default";

//=== CatalogError ========================================================

#[derive(Debug)]
pub enum CatalogError {
    Io(io::Error),
    Parse(serde_json::Error),
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "failed to read scene catalog: {}", e),
            Self::Parse(e) => write!(f, "failed to parse scene catalog: {}", e),
        }
    }
}

impl std::error::Error for CatalogError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Parse(e) => Some(e),
        }
    }
}

impl From<io::Error> for CatalogError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for CatalogError {
    fn from(e: serde_json::Error) -> Self {
        Self::Parse(e)
    }
}

//=== SceneCatalog ========================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneCatalog {
    #[serde(default)]
    pub scenes: Vec<SceneHandle>,
    #[serde(default)]
    pub loading_screens: BTreeMap<String, LoadingScreen>,
    /// Auto loaders keyed by the scene they run in.
    #[serde(default)]
    pub auto_loaders: BTreeMap<String, AutoLoader>,
}

impl SceneCatalog {
    //--- Loading ----------------------------------------------------------

    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        let catalog = Self::from_json_str(&contents)?;
        info!(
            "Loaded scene catalog from {:?} ({} scenes, {} loading screens)",
            path,
            catalog.scenes.len(),
            catalog.loading_screens.len()
        );
        Ok(catalog)
    }

    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        let catalog: SceneCatalog = serde_json::from_str(json)?;
        Ok(catalog.validate())
    }

    pub fn to_json_string(&self) -> Result<String, CatalogError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    //--- Queries ----------------------------------------------------------

    /// Scene handle by name.
    pub fn find(&self, name: &str) -> Option<&SceneHandle> {
        self.scenes.iter().find(|scene| scene.name() == name)
    }

    pub fn loading_screen(&self, name: &str) -> Option<&LoadingScreen> {
        self.loading_screens.get(name)
    }

    //--- Validation -------------------------------------------------------

    fn validate(mut self) -> Self {
        let before = self.scenes.len();
        self.scenes.retain(SceneHandle::is_configured);
        if self.scenes.len() != before {
            warn!("Skipping {} scene entries without a name", before - self.scenes.len());
        }

        for (i, scene) in self.scenes.iter().enumerate() {
            if self.scenes[..i].iter().any(|s| s.name() == scene.name()) {
                warn!("Scene '{}' is listed more than once", scene.name());
            }
        }

        for (name, screen) in &mut self.loading_screens {
            if !screen.is_configured() {
                warn!("Loading screen '{}' has no loading scene", name);
            }
            *screen = std::mem::take(screen).validate();
        }

        for (scene, loader) in &mut self.auto_loaders {
            if !(loader.delay_seconds.is_finite() && loader.delay_seconds >= 0.0) {
                warn!(
                    "Auto loader delay in '{}' must be a non-negative number, got {}. Using 0 instead.",
                    scene, loader.delay_seconds
                );
                loader.delay_seconds = 0.0;
            }
            if let Some(screen) = loader.loading_screen.take() {
                loader.loading_screen = Some(screen.validate());
            }
        }

        self
    }
}

//=== Tests ===============================================================
