//=========================================================================
// Core Systems
//
// Everything the runtime is built from, independent of any engine
// backend.
//
// Responsibilities:
// - Consume the host's scene API (`host`)
// - Animate transition effects across scene switches (`transition`)
// - Load scenes directly or wrapped in transitions (`scene`)
// - Sequence loads through a loading screen (`loading_screen`)
// - Carry data and messages between scripts and systems (`globals`,
//   `message_bus`)
//
// Notes:
// All waiting is expressed as explicit states advanced once per frame.
// Nothing here blocks or spawns threads; notifications from the host are
// drained on the same frame pass that advances the state machines.
//
//=========================================================================

//=== Module Declarations =================================================

pub mod auto_loader;
pub mod error;
pub mod globals;
pub mod host;
pub mod loading_screen;
pub mod message_bus;
pub mod scene;
pub mod transition;

//=== Public API ==========================================================

pub use auto_loader::AutoLoader;
pub use error::LoadError;
pub use globals::{GlobalContext, GlobalSystems};
pub use host::{LoadSceneMode, SceneHost, SceneLoaded};
pub use loading_screen::{LoadingProgress, LoadingScreen, LoadingScreenSequencer};
pub use scene::{SceneHandle, SceneRequest, SceneScript};
pub use transition::{EffectId, EffectSelector, Effects, TransitionEffect};
