//=========================================================================
// Loading Progress
//=========================================================================

//=== External Dependencies ===============================================

use std::cell::Cell;
use std::rc::Rc;

//=== Internal Dependencies ===============================================

use crate::core::globals::GlobalContext;
use crate::core::scene::SceneScript;

//=== LoadingProgress =====================================================

/// Observable progress of one loading-screen session.
///
/// Clones share the same value. The sequencer is the only writer; it
/// resets the value to 0 once the session is over.
#[derive(Debug, Clone, Default)]
pub struct LoadingProgress(Rc<Cell<f32>>);

impl LoadingProgress {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Progress already at 1, for loads that skipped the loading screen.
    pub(crate) fn completed() -> Self {
        let progress = Self::new();
        progress.set(1.0);
        progress
    }

    /// Current value in `[0, 1]`.
    pub fn get(&self) -> f32 {
        self.0.get()
    }

    pub(crate) fn set(&self, value: f32) {
        self.0.set(value.clamp(0.0, 1.0));
    }
}

//=== ProgressBar =========================================================

/// Scene script mirroring the loading progress into a fill amount.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProgressBar {
    fill_amount: f32,
}

impl ProgressBar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fraction of the bar to draw, in `[0, 1]`.
    pub fn fill_amount(&self) -> f32 {
        self.fill_amount
    }
}

impl SceneScript for ProgressBar {
    fn on_loaded(&mut self, _scene: &str, context: &mut GlobalContext) {
        self.fill_amount = context.loading_progress();
    }

    fn update(&mut self, context: &mut GlobalContext) {
        self.fill_amount = context.loading_progress();
    }
}

//=== Tests ===============================================================
