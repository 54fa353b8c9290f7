//=========================================================================
// Host Bridge
//=========================================================================
//
// Bridges the engine that owns scenes with the sequencing core.
//
// This module defines the contract the core consumes, so the engine
// backend can be swapped without touching sequencing code.
//
// Components:
// - `interface`: host trait, load modes, notifications and errors
// - `notifications`: scene-loaded subscription list
// - `simulated`: deterministic in-memory host
//
//=========================================================================

//=== Module Declarations =================================================

mod interface;
mod notifications;
mod simulated;

//=== Public API ==========================================================

pub use interface::{
    AsyncLoadId, HostError, LoadSceneMode, SceneHost, SceneInfo, SceneLoaded,
};
pub use notifications::{SceneLoadedHub, SceneLoadedSubscription, SubscriptionId};
pub use simulated::{SimulatedHost, READY_TO_ACTIVATE};
