//=========================================================================
// Prelude
//=========================================================================
//
// Convenience module that re-exports commonly used types and traits.
//
// Usage:
//   use scene_sequencer::prelude::*;
//
//=========================================================================

//=== Public API ==========================================================

// Runtime
pub use crate::runtime::{SceneRuntime, SceneRuntimeBuilder};

// Global systems and context
pub use crate::core::globals::{GlobalContext, GlobalSystems};

// Host
pub use crate::core::host::{LoadSceneMode, SceneHost, SceneLoaded, SimulatedHost};

// Scenes
pub use crate::core::scene::{SceneHandle, SceneRequest, SceneScript};

// Transitions
pub use crate::core::transition::{EffectSelector, ScreenFaderScript, TransitionEffect};

// Loading screens
pub use crate::core::auto_loader::AutoLoader;
pub use crate::core::loading_screen::{LoadingProgress, LoadingScreen, ProgressBar};

// Errors
pub use crate::core::error::LoadError;

// Message bus
pub use crate::core::message_bus::MessageBus;
