//=========================================================================
// Scene Handle
//=========================================================================
//
// Serializable reference to a loadable scene.
//
// The name addresses the scene in the host's registry; the path is only
// used by editor tooling.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::path::Path;

use log::info;
use serde::{Deserialize, Serialize};

//=== Internal Dependencies ===============================================

use super::HandleTransition;
use crate::core::error::LoadError;
use crate::core::host::{LoadSceneMode, SceneHost, SceneInfo};
use crate::core::transition::{EffectSelector, Effects};

//=== SceneHandle =========================================================

/// Reference to a scene, authored as data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SceneHandle {
    name: String,
    #[serde(default)]
    path: String,
}

impl SceneHandle {
    //--- Construction -----------------------------------------------------

    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }

    /// Handle with a name and no asset path.
    pub fn named(name: impl Into<String>) -> Self {
        Self::new(name, "")
    }

    /// Handle for a scene asset; the name is the file stem.
    ///
    /// `"Assets/Levels/Level1.unity"` becomes `Level1`.
    pub fn from_path(path: impl Into<String>) -> Self {
        let path = path.into();
        let name = Path::new(&path)
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self { name, path }
    }

    //--- Queries ----------------------------------------------------------

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// False for an empty handle.
    pub fn is_configured(&self) -> bool {
        !self.name.is_empty()
    }

    /// The host's view of this scene.
    pub fn get_scene<H: SceneHost + ?Sized>(&self, host: &H) -> SceneInfo {
        host.get_scene_by_name(&self.name)
    }

    //--- Loading ----------------------------------------------------------

    /// Loads the scene immediately.
    pub fn load_scene<H: SceneHost + ?Sized>(
        &self,
        host: &mut H,
        mode: LoadSceneMode,
    ) -> Result<(), LoadError> {
        if !self.is_configured() {
            return Err(LoadError::Unconfigured);
        }
        host.load_scene(&self.name, mode)?;
        Ok(())
    }

    /// Obscures the view, loads the scene, then reveals it again.
    ///
    /// Returns the transition to advance every frame. When the selector
    /// finds no effect the scene is loaded straight away and `None` is
    /// returned.
    pub fn transition_to_scene<H: SceneHost + ?Sized>(
        &self,
        selector: EffectSelector,
        host: &mut H,
        effects: &mut Effects,
    ) -> Result<Option<HandleTransition>, LoadError> {
        if !self.is_configured() {
            return Err(LoadError::Unconfigured);
        }

        match selector.resolve(effects) {
            Some(effect) => {
                HandleTransition::start(self.name.clone(), selector, effect, host, effects)
                    .map(Some)
            }
            None => {
                info!(
                    "Couldn't find a transition effect while unloading '{}'",
                    host.active_scene().unwrap_or_default()
                );
                self.load_scene(host, LoadSceneMode::Single)?;
                Ok(None)
            }
        }
    }
}

//=== Tests ===============================================================
