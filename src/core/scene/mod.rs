//=========================================================================
// Scene System
//=========================================================================
//
// Scene references, transition-wrapped loads and per-scene content.
//
// Architecture:
//   SceneHandle ──transition_to_scene()──> HandleTransition
//                                            Obscuring → AwaitingLoad → Finished
//
//   SceneScripts
//     ├─ scripts: HashMap<scene name, Vec<Box<dyn SceneScript>>>
//     └─ loaded: Vec<scene name>
//
// Flow:
//   scene loaded   → SceneScript::on_loaded()
//   every tick     → SceneScript::update() for loaded scenes
//   scene replaced → SceneScript::on_unloaded(), effects despawned
//
//=========================================================================

//=== Internal Dependencies ===============================================

use crate::core::globals::GlobalContext;

//=== Module Declarations =================================================

mod handle_transition;
mod request;
mod scene_handle;
mod scene_scripts;

//=== Public API ==========================================================

pub use handle_transition::{HandleState, HandleTransition};
pub use request::SceneRequest;
pub use scene_handle::SceneHandle;
pub use scene_scripts::SceneScripts;

//=== SceneScript Trait ===================================================

/// Content that lives inside a scene.
///
/// Scripts are registered once per scene name and keep their state between
/// loads; `on_loaded` is the place to reset it.
///
/// # Minimal Implementation
///
/// Every hook has a default empty implementation, so a script overrides
/// only the ones it needs:
///
/// ```rust
/// # use scene_sequencer::prelude::*;
/// struct Spinner { angle: f32 }
///
/// impl SceneScript for Spinner {
///     fn update(&mut self, context: &mut GlobalContext) {
///         self.angle += 90.0 * context.delta_time();
///     }
/// }
/// ```
pub trait SceneScript {
    /// Called when the owning scene has been loaded (or reloaded).
    ///
    /// Effects spawned here belong to `scene` and are despawned with it.
    fn on_loaded(&mut self, _scene: &str, _context: &mut GlobalContext) {}

    /// Called once the owning scene is no longer loaded.
    fn on_unloaded(&mut self, _scene: &str, _context: &mut GlobalContext) {}

    /// Called every tick while the owning scene is loaded.
    fn update(&mut self, _context: &mut GlobalContext) {}
}
