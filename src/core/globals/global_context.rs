//=========================================================================
// Global Context
//=========================================================================
//
// Shared data container for scene scripts.
//
// Contains state data that scripts read/write:
// - effects: transition effects of every loaded scene
// - message_bus: scene requests out, scene-loaded notifications in
// - frame timing and the loading-screen progress
//
//=========================================================================

//=== Internal Dependencies ===============================================

use crate::core::host::SceneLoaded;
use crate::core::message_bus::MessageBus;
use crate::core::scene::SceneRequest;
use crate::core::transition::Effects;

//=== GlobalContext =======================================================

/// Shared context data accessible to scene scripts.
///
/// Scripts receive `&mut GlobalContext` during their lifecycle methods.
/// This separates script-accessible data from the runtime's own systems.
#[derive(Debug, Default)]
pub struct GlobalContext {
    /// Live transition effects, tagged by owning scene.
    ///
    /// Effects spawned in `on_loaded` are despawned with their scene.
    pub effects: Effects,

    /// Typed message queues.
    ///
    /// `SceneRequest`s pushed here are applied at the next tick boundary.
    /// `SceneLoaded` notifications are readable for the frame they arrived in.
    pub message_bus: MessageBus,

    pub(crate) delta_time: f32,
    pub(crate) loading_progress: f32,
}

impl GlobalContext {
    /// Creates a new context with no effects and empty queues.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seconds elapsed since the previous tick.
    pub fn delta_time(&self) -> f32 {
        self.delta_time
    }

    /// Progress of the running loading-screen session, 0 when none runs.
    pub fn loading_progress(&self) -> f32 {
        self.loading_progress
    }

    /// Queues a scene change for the next tick boundary.
    pub fn request(&mut self, request: SceneRequest) {
        self.message_bus.push(request);
    }

    /// Scenes that finished loading this frame.
    pub fn scenes_loaded(&self) -> &[SceneLoaded] {
        self.message_bus.read::<SceneLoaded>()
    }
}
