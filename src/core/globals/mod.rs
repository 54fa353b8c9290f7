//=========================================================================
// Global Runtime State
//=========================================================================
//
// Separates systems (logic components) from context (shared data).
//
// Architecture:
//   GlobalSystems: SceneScripts + LoadingScreenSequencer + HandleTransitions
//   GlobalContext: Effects + MessageBus + frame timing (passed to scripts)
//
//=========================================================================

//=== Module Declarations =================================================

mod global_context;
mod global_systems;

//=== Public API ==========================================================

pub use global_context::GlobalContext;
pub use global_systems::GlobalSystems;
