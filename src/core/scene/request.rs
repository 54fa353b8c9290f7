//=========================================================================
// Scene Requests
//=========================================================================
//
// Messages scripts push onto the bus to change scenes.
//
// Requests are applied by the runtime at the next tick boundary, in the
// order they were pushed.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use super::SceneHandle;
use crate::core::host::LoadSceneMode;
use crate::core::loading_screen::LoadingScreen;
use crate::core::transition::EffectSelector;

//=== SceneRequest ========================================================

/// A scene change requested from inside a scene.
#[derive(Debug, Clone)]
pub enum SceneRequest {
    /// Immediate load, cancelling any transition pending towards the scene.
    Load {
        scene: SceneHandle,
        mode: LoadSceneMode,
    },

    /// Obscure, load, reveal.
    TransitionTo {
        scene: SceneHandle,
        effect: EffectSelector,
    },

    /// Load through a loading screen, with a transition when `effect` is set.
    LoadWithLoadingScreen {
        target: SceneHandle,
        screen: LoadingScreen,
        effect: Option<EffectSelector>,
    },

    /// Unload an additively loaded scene.
    Unload { scene: String },
}

impl SceneRequest {
    /// Plain single-mode load.
    pub fn load(scene: SceneHandle) -> Self {
        Self::Load {
            scene,
            mode: LoadSceneMode::Single,
        }
    }

    /// Transition using whichever effect is active.
    pub fn transition_to(scene: SceneHandle) -> Self {
        Self::TransitionTo {
            scene,
            effect: EffectSelector::Discover,
        }
    }

    /// Name of the scene this request ends up in, if any.
    pub fn destination(&self) -> Option<&str> {
        match self {
            Self::Load { scene, .. } | Self::TransitionTo { scene, .. } => Some(scene.name()),
            Self::LoadWithLoadingScreen { target, .. } => Some(target.name()),
            Self::Unload { .. } => None,
        }
    }
}

//=== Tests ===============================================================
