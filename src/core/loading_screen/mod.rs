//=========================================================================
// Loading Screen
//=========================================================================
//
// Shows an intermediate scene while the real target loads in the
// background, then switches to the target.
//
// Architecture:
//   LoadingScreen (authored data: loading scene + minimum display time)
//        ↓
//   LoadingScreenSequencer ──advance(dt)──> host + effects
//        ↓
//   LoadingProgress (per-session handle) ──> ProgressBar
//
//=========================================================================

//=== External Dependencies ===============================================

use log::warn;
use serde::{Deserialize, Serialize};

//=== Internal Dependencies ===============================================

use crate::core::scene::SceneHandle;

//=== Module Declarations =================================================

mod progress;
mod sequencer;

//=== Public API ==========================================================

pub use progress::{LoadingProgress, ProgressBar};
pub use sequencer::{LoaderState, LoadingScreenSequencer};

//=== LoadingScreen =======================================================

/// A loading scene and how long it stays up at least.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoadingScreen {
    pub loading_scene: SceneHandle,
    #[serde(default)]
    pub min_loading_time: f32,
}

impl LoadingScreen {
    /// Negative minimum times are clamped to 0.
    pub fn new(loading_scene: SceneHandle, min_loading_time: f32) -> Self {
        Self {
            loading_scene,
            min_loading_time,
        }
        .validate()
    }

    /// Whether a loading scene has been set.
    pub fn is_configured(&self) -> bool {
        self.loading_scene.is_configured()
    }

    pub(crate) fn validate(mut self) -> Self {
        if !(self.min_loading_time.is_finite() && self.min_loading_time >= 0.0) {
            warn!(
                "Minimum loading time must be a non-negative number, got {}. Using 0 instead.",
                self.min_loading_time
            );
            self.min_loading_time = 0.0;
        }
        self
    }
}

//=== Tests ===============================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_minimum_time_is_clamped() {
        let screen = LoadingScreen::new(SceneHandle::named("Loading"), -3.0);
        assert_eq!(screen.min_loading_time, 0.0);

        let screen = LoadingScreen::new(SceneHandle::named("Loading"), f32::NAN);
        assert_eq!(screen.min_loading_time, 0.0);

        let screen = LoadingScreen::new(SceneHandle::named("Loading"), 2.0);
        assert_eq!(screen.min_loading_time, 2.0);
    }

    #[test]
    fn unset_loading_scene_is_unconfigured() {
        assert!(!LoadingScreen::default().is_configured());
        assert!(LoadingScreen::new(SceneHandle::named("Loading"), 0.0).is_configured());
    }

    #[test]
    fn deserializes_with_defaults() {
        let screen: LoadingScreen =
            serde_json::from_str(r#"{"loading_scene":{"name":"Loading"}}"#).unwrap();
        assert_eq!(screen.loading_scene.name(), "Loading");
        assert_eq!(screen.min_loading_time, 0.0);
    }
}
