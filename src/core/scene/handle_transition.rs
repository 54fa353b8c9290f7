//=========================================================================
// Handle Transition
//=========================================================================
//
// Frame-driven state machine behind `SceneHandle::transition_to_scene`.
//
// States:
//   Obscuring ──effect completed──> host.load_scene(Single)
//       ↓
//   AwaitingLoad ──own scene loaded──> reveal, unsubscribe
//       ↓
//   Finished
//
// The scene-loaded subscription is taken when the transition starts and
// released on every terminal path.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::cell::Cell;
use std::rc::Rc;

use log::{debug, info};

//=== Internal Dependencies ===============================================

use crate::core::error::LoadError;
use crate::core::host::{LoadSceneMode, SceneHost, SceneLoadedSubscription};
use crate::core::transition::{EffectId, EffectSelector, Effects};

//=== HandleState =========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandleState {
    /// Waiting for the effect to fully obscure the view.
    Obscuring,
    /// Load issued, waiting for the scene-loaded notification.
    AwaitingLoad,
    Finished,
}

//=== HandleTransition ====================================================

/// A transition-wrapped scene load in flight.
#[derive(Debug)]
pub struct HandleTransition {
    scene: String,
    selector: EffectSelector,
    effect: EffectId,
    obscured: Rc<Cell<bool>>,
    subscription: Option<SceneLoadedSubscription>,
    state: HandleState,
}

impl HandleTransition {
    //--- Construction -----------------------------------------------------

    pub(super) fn start<H: SceneHost + ?Sized>(
        scene: String,
        selector: EffectSelector,
        effect: EffectId,
        host: &mut H,
        effects: &mut Effects,
    ) -> Result<Self, LoadError> {
        let obscured = Rc::new(Cell::new(false));
        let mut transition = Self {
            scene,
            selector,
            effect,
            obscured: Rc::clone(&obscured),
            subscription: Some(host.subscribe()),
            state: HandleState::Obscuring,
        };

        debug!("Transitioning to '{}' with effect {:?}", transition.scene, effect);
        if let Some(fx) = effects.get_mut(effect) {
            fx.animate_transition_to(true, Some(Box::new(move || obscured.set(true))));
        }

        // An inactive effect completes synchronously.
        transition.poll_obscured(host)?;
        Ok(transition)
    }

    //--- Queries ----------------------------------------------------------

    /// Scene being transitioned to.
    pub fn scene(&self) -> &str {
        &self.scene
    }

    pub fn state(&self) -> HandleState {
        self.state
    }

    pub fn is_finished(&self) -> bool {
        self.state == HandleState::Finished
    }

    //--- Frame Update -----------------------------------------------------

    /// Advances the transition by one frame.
    pub fn advance<H: SceneHost + ?Sized>(
        &mut self,
        host: &mut H,
        effects: &mut Effects,
    ) -> Result<(), LoadError> {
        match self.state {
            HandleState::Obscuring => {
                // Loads that complete before ours was issued are not ours.
                if let Some(subscription) = &self.subscription {
                    subscription.drain();
                }
                self.poll_obscured(host)
            }
            HandleState::AwaitingLoad => {
                let arrived = self
                    .subscription
                    .as_ref()
                    .map(|s| s.drain().iter().any(|event| event.scene == self.scene))
                    .unwrap_or(false);

                if arrived {
                    self.reveal(effects);
                    self.finish(host);
                }
                Ok(())
            }
            HandleState::Finished => Ok(()),
        }
    }

    /// Abandons the transition, releasing its subscription.
    pub fn cancel<H: SceneHost + ?Sized>(&mut self, host: &mut H) {
        if self.state != HandleState::Finished {
            debug!("Transition to '{}' cancelled", self.scene);
            self.finish(host);
        }
    }

    //--- Internal Helpers -------------------------------------------------

    fn poll_obscured<H: SceneHost + ?Sized>(&mut self, host: &mut H) -> Result<(), LoadError> {
        if !self.obscured.get() {
            // The completion holds the only other reference to the flag.
            if Rc::strong_count(&self.obscured) > 1 {
                return Ok(());
            }
            info!(
                "Transition effect stopped before obscuring, loading '{}' without it",
                self.scene
            );
        }

        if let Err(e) = host.load_scene(&self.scene, LoadSceneMode::Single) {
            self.finish(host);
            return Err(e.into());
        }
        self.state = HandleState::AwaitingLoad;
        Ok(())
    }

    fn reveal(&self, effects: &mut Effects) {
        let effect = if effects.contains(self.effect) {
            Some(self.effect)
        } else {
            self.selector.resolve(effects)
        };

        match effect.and_then(|id| effects.get_mut(id)) {
            Some(fx) => fx.animate_transition_to(false, None),
            None => info!("Couldn't find a transition effect after loading '{}'", self.scene),
        }
    }

    fn finish<H: SceneHost + ?Sized>(&mut self, host: &mut H) {
        if let Some(subscription) = self.subscription.take() {
            host.unsubscribe(subscription.id());
        }
        self.state = HandleState::Finished;
    }
}

//=== Tests ===============================================================
