//=========================================================================
// Screen Fader Script
//=========================================================================
//
// Places a screen fader in a scene each time the scene loads.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use super::{EffectId, ScreenFader, TransitionEffect};
use crate::core::globals::GlobalContext;
use crate::core::scene::SceneScript;

//=== ScreenFaderScript ===================================================

/// Spawns a [`ScreenFader`] effect owned by the scene it is attached to.
///
/// Faders start fully obscuring by default, so the scene appears behind a
/// covered view that the incoming transition then reveals.
#[derive(Debug, Clone)]
pub struct ScreenFaderScript {
    duration: f32,
    color: [f32; 3],
    start_obscured: bool,
    spawned: Option<EffectId>,
}

impl ScreenFaderScript {
    /// Black fader.
    ///
    /// # Panics
    ///
    /// Panics if `duration` is negative.
    pub fn new(duration: f32) -> Self {
        assert!(duration >= 0.0, "Transition duration must be non-negative, got {}", duration);
        Self {
            duration,
            color: [0.0, 0.0, 0.0],
            start_obscured: true,
            spawned: None,
        }
    }

    pub fn with_color(mut self, rgb: [f32; 3]) -> Self {
        self.color = rgb;
        self
    }

    /// Starts the fader revealed instead of obscuring.
    pub fn revealed(mut self) -> Self {
        self.start_obscured = false;
        self
    }

    /// Effect spawned for the current load.
    pub fn effect(&self) -> Option<EffectId> {
        self.spawned
    }
}

impl SceneScript for ScreenFaderScript {
    fn on_loaded(&mut self, scene: &str, context: &mut GlobalContext) {
        let effect = TransitionEffect::new(self.duration, ScreenFader::with_color(self.color));
        let effect = if self.start_obscured {
            effect.obscured()
        } else {
            effect
        };
        self.spawned = Some(context.effects.spawn(scene, effect));
    }

    fn on_unloaded(&mut self, _scene: &str, _context: &mut GlobalContext) {
        self.spawned = None;
    }
}

//=== Tests ===============================================================
