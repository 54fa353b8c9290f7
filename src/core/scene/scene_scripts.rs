//=========================================================================
// Scene Scripts
//=========================================================================
//
// Registry of per-scene content and the set of scenes it believes loaded.
//
// Scripts are stored by scene name and keep their state between loads.
// The registry mirrors the host: entering a scene runs `on_loaded`,
// leaving it runs `on_unloaded` and despawns the scene's effects.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashMap;

use log::{debug, warn};

//=== Internal Dependencies ===============================================

use super::SceneScript;
use crate::core::globals::GlobalContext;
use crate::core::host::SceneHost;

//=== SceneScripts ========================================================

/// Per-scene scripts and loaded-scene bookkeeping.
#[derive(Default)]
pub struct SceneScripts {
    scripts: HashMap<String, Vec<Box<dyn SceneScript>>>,
    loaded: Vec<String>,
}

impl SceneScripts {
    //--- Construction -----------------------------------------------------

    pub fn new() -> Self {
        Self::default()
    }

    //--- Registration -----------------------------------------------------

    /// Attaches a script to every future load of `scene`.
    ///
    /// Scripts registered for a scene that is already loaded only start
    /// receiving updates; their `on_loaded` runs at the next load.
    pub fn register<T>(&mut self, scene: impl Into<String>, script: T)
    where
        T: SceneScript + 'static,
    {
        let scene = scene.into();
        if scene.is_empty() {
            warn!("Ignoring script registered for an unnamed scene");
            return;
        }

        debug!("Registered script for scene '{}'", scene);
        self.scripts.entry(scene).or_default().push(Box::new(script));
    }

    /// Number of scripts attached to `scene`.
    pub fn script_count(&self, scene: &str) -> usize {
        self.scripts.get(scene).map_or(0, Vec::len)
    }

    //--- Queries ----------------------------------------------------------

    /// Scenes entered and not yet left, in load order.
    pub fn loaded(&self) -> &[String] {
        &self.loaded
    }

    pub fn is_loaded(&self, scene: &str) -> bool {
        self.loaded.iter().any(|s| s == scene)
    }

    //--- Lifecycle --------------------------------------------------------

    /// Enters every scene the host already has loaded.
    pub fn seed<H: SceneHost + ?Sized>(&mut self, host: &H, context: &mut GlobalContext) {
        let present: Vec<String> = (0..host.scene_count())
            .filter_map(|index| host.scene_at(index))
            .map(|info| info.name)
            .collect();

        for scene in present {
            self.enter(&scene, context);
        }
    }

    /// Leaves every scene the host no longer reports as loaded.
    pub fn sync_unloaded<H: SceneHost + ?Sized>(&mut self, host: &H, context: &mut GlobalContext) {
        let gone: Vec<String> = self
            .loaded
            .iter()
            .filter(|scene| !host.get_scene_by_name(scene).is_loaded)
            .cloned()
            .collect();

        for scene in gone {
            self.leave(&scene, context);
        }
    }

    /// Marks `scene` as loaded and runs its `on_loaded` hooks.
    ///
    /// A scene that was already loaded is left first, as a reload replaces
    /// its content.
    pub fn enter(&mut self, scene: &str, context: &mut GlobalContext) {
        if self.is_loaded(scene) {
            debug!("Scene '{}' reloaded", scene);
            self.leave(scene, context);
        }

        self.loaded.push(scene.to_string());
        if let Some(scripts) = self.scripts.get_mut(scene) {
            for script in scripts.iter_mut() {
                script.on_loaded(scene, context);
            }
        }
    }

    /// Marks `scene` as unloaded, runs its `on_unloaded` hooks and despawns
    /// its effects.
    pub fn leave(&mut self, scene: &str, context: &mut GlobalContext) {
        let Some(pos) = self.loaded.iter().position(|s| s == scene) else {
            debug!("Scene '{}' not loaded, skipping unload", scene);
            return;
        };
        self.loaded.remove(pos);

        if let Some(scripts) = self.scripts.get_mut(scene) {
            for script in scripts.iter_mut() {
                script.on_unloaded(scene, context);
            }
        }
        context.effects.despawn_scene(scene);
    }

    //--- Frame Update -----------------------------------------------------

    /// Updates the scripts of every loaded scene.
    pub fn update(&mut self, context: &mut GlobalContext) {
        for scene in &self.loaded {
            if let Some(scripts) = self.scripts.get_mut(scene) {
                for script in scripts.iter_mut() {
                    script.update(context);
                }
            }
        }
    }
}

impl std::fmt::Debug for SceneScripts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let counts: HashMap<&str, usize> = self
            .scripts
            .iter()
            .map(|(scene, scripts)| (scene.as_str(), scripts.len()))
            .collect();
        f.debug_struct("SceneScripts")
            .field("scripts", &counts)
            .field("loaded", &self.loaded)
            .finish()
    }
}

//=== Tests ===============================================================
