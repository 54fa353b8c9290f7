//=========================================================================
// Screen Fader
//=========================================================================
//
// Transition surface that fades a full-screen overlay.
//
// The overlay alpha follows the transition value; the overlay is disabled
// whenever alpha is exactly 0 so it stops intercepting the view.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::any::Any;

//=== Internal Dependencies ===============================================

use super::EffectSurface;

//=== ScreenFader =========================================================

/// Full-screen colored overlay driven by a [`super::TransitionEffect`].
#[derive(Debug, Clone, PartialEq)]
pub struct ScreenFader {
    color: [f32; 4],
    enabled: bool,
}

impl ScreenFader {
    /// Fader with an opaque-black overlay, initially hidden.
    pub fn black() -> Self {
        Self::with_color([0.0, 0.0, 0.0])
    }

    /// Fader with a custom overlay color (RGB, alpha is driven).
    pub fn with_color(rgb: [f32; 3]) -> Self {
        Self {
            color: [rgb[0], rgb[1], rgb[2], 0.0],
            enabled: false,
        }
    }

    /// Overlay color including the current alpha.
    pub fn color(&self) -> [f32; 4] {
        self.color
    }

    pub fn alpha(&self) -> f32 {
        self.color[3]
    }

    /// Whether the overlay is drawn at all.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

impl Default for ScreenFader {
    fn default() -> Self {
        Self::black()
    }
}

impl EffectSurface for ScreenFader {
    fn apply(&mut self, value: f32) {
        self.enabled = value > 0.0;
        self.color[3] = value;
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

//=== Tests ===============================================================
