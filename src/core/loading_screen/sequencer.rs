//=========================================================================
// Loading Screen Sequencer
//=========================================================================
//
// Explicit per-frame state machine for loads that go through a loading
// scene.
//
// States:
//   Idle
//    ├─ transition_to_scene() ──> Obscuring ──effect done──┐
//    └─ load_scene() ─────────────────────────────────────┴─> AwaitingLoadingScreen
//                                                                 │ loading scene loaded:
//                                                                 │ reveal (not awaited), async load
//                                                                 ↓ of the target, activation deferred
//   AwaitingTargetLoad ──progress >= 0.9──> EnforcingMinimumTime ──elapsed >= min──┐
//        └──────────────── elapsed >= min already ─────────────────────────────────┴─> ClosingTransition
//                                                                                       │ obscure, awaited
//                                                                                       ↓ progress = 1
//   Activating ──target loaded──> reveal, progress = 0, unsubscribe ──> Idle
//
// Progress published to the session handle never decreases, stays below 1
// until activation is requested and is reset to 0 when the session ends.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::cell::Cell;
use std::rc::Rc;

use log::{debug, error, info};

//=== Internal Dependencies ===============================================

use super::{LoadingProgress, LoadingScreen};
use crate::core::error::LoadError;
use crate::core::host::{
    AsyncLoadId, LoadSceneMode, SceneHost, SceneLoaded, SceneLoadedSubscription,
    READY_TO_ACTIVATE,
};
use crate::core::scene::SceneHandle;
use crate::core::transition::{EffectId, EffectSelector, Effects};

/// Highest progress published before activation is requested.
const BEFORE_ACTIVATION: f32 = 1.0 - f32::EPSILON;

//=== LoaderState =========================================================

/// Where the sequencer currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoaderState {
    #[default]
    Idle,
    /// Waiting for the effect to obscure the view before leaving the scene.
    Obscuring,
    /// Loading scene requested, waiting for its notification.
    AwaitingLoadingScreen,
    /// Polling the background load of the target.
    AwaitingTargetLoad,
    /// Target ready, holding the loading screen up for the minimum time.
    EnforcingMinimumTime,
    /// Obscuring the loading screen before activation.
    ClosingTransition,
    /// Activation allowed, waiting for the target's notification.
    Activating,
}

//=== Session =============================================================

enum Flow {
    /// Evaluate the new state in the same frame.
    Continue,
    /// Wait for the next frame.
    Yield,
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Closing {
    WaitingForEffect,
    Obscuring,
}

#[derive(Debug)]
struct Session {
    state: LoaderState,
    target: String,
    loading_scene: String,
    min_loading_time: f32,
    transition: Option<EffectSelector>,
    effect: Option<EffectId>,
    subscription: SceneLoadedSubscription,
    progress: LoadingProgress,
    obscured: Rc<Cell<bool>>,
    operation: Option<AsyncLoadId>,
    elapsed: f32,
    ready_at: f32,
    closing: Closing,
}

impl Session {
    fn open<H: SceneHost + ?Sized>(
        screen: &LoadingScreen,
        target: &SceneHandle,
        transition: Option<EffectSelector>,
        host: &mut H,
    ) -> Self {
        Self {
            state: LoaderState::Idle,
            target: target.name().to_string(),
            loading_scene: screen.loading_scene.name().to_string(),
            min_loading_time: screen.min_loading_time.max(0.0),
            transition,
            effect: None,
            subscription: host.subscribe(),
            progress: LoadingProgress::new(),
            obscured: Rc::new(Cell::new(false)),
            operation: None,
            elapsed: 0.0,
            ready_at: 0.0,
            closing: Closing::WaitingForEffect,
        }
    }

    fn close<H: SceneHost + ?Sized>(self, host: &mut H) {
        host.unsubscribe(self.subscription.id());
        self.progress.set(0.0);
    }

    fn is_timing(&self) -> bool {
        matches!(
            self.state,
            LoaderState::AwaitingTargetLoad | LoaderState::EnforcingMinimumTime
        )
    }

    //--- State Steps ------------------------------------------------------

    fn step<H: SceneHost + ?Sized>(
        &mut self,
        arrived: &[SceneLoaded],
        host: &mut H,
        effects: &mut Effects,
    ) -> Result<Flow, LoadError> {
        match self.state {
            LoaderState::Idle => Ok(Flow::Finished),

            LoaderState::Obscuring => {
                if self.obscured.get() {
                    self.show_loading_screen(host)?;
                } else if self.obscuring_lost() {
                    info!(
                        "Transition effect stopped before obscuring, showing loading screen '{}'",
                        self.loading_scene
                    );
                    self.show_loading_screen(host)?;
                }
                Ok(Flow::Yield)
            }

            LoaderState::AwaitingLoadingScreen => {
                if !contains_scene(arrived, &self.loading_scene) {
                    return Ok(Flow::Yield);
                }

                if self.transition.is_some() {
                    match self.find_effect(effects).and_then(|id| effects.get_mut(id)) {
                        Some(fx) => fx.animate_transition_to(false, None),
                        None => debug!("No transition effect in loading scene '{}'", self.loading_scene),
                    }
                }

                let operation = host.load_scene_async(&self.target, false)?;
                debug!("Loading '{}' in the background ({:?})", self.target, operation);
                self.operation = Some(operation);
                self.elapsed = 0.0;
                self.state = LoaderState::AwaitingTargetLoad;

                // Progress is only polled from the next frame on.
                Ok(Flow::Yield)
            }

            LoaderState::AwaitingTargetLoad => {
                let sample = self
                    .operation
                    .and_then(|op| host.load_progress(op))
                    .unwrap_or(0.0);
                self.publish(sample.min(READY_TO_ACTIVATE));

                if self.progress.get() < READY_TO_ACTIVATE {
                    return Ok(Flow::Yield);
                }

                if self.elapsed >= self.min_loading_time {
                    self.state = LoaderState::ClosingTransition;
                    return Ok(Flow::Continue);
                }

                debug!("'{}' ready after {}s, holding loading screen", self.target, self.elapsed);
                self.ready_at = self.elapsed;
                self.state = LoaderState::EnforcingMinimumTime;
                Ok(Flow::Yield)
            }

            LoaderState::EnforcingMinimumTime => {
                if self.elapsed >= self.min_loading_time {
                    self.state = LoaderState::ClosingTransition;
                    return Ok(Flow::Continue);
                }

                let t = (self.elapsed - self.ready_at) / (self.min_loading_time - self.ready_at);
                let value = READY_TO_ACTIVATE + (1.0 - READY_TO_ACTIVATE) * t;
                self.publish(value.min(BEFORE_ACTIVATION));
                Ok(Flow::Yield)
            }

            LoaderState::ClosingTransition => {
                let effect = self
                    .effect
                    .filter(|_| self.transition.is_some())
                    .and_then(|id| effects.get_mut(id));

                let Some(fx) = effect else {
                    return self.activate(host);
                };

                match self.closing {
                    Closing::WaitingForEffect => {
                        if fx.is_animating() {
                            return Ok(Flow::Yield);
                        }
                        fx.animate_transition_to(true, None);
                        self.closing = Closing::Obscuring;
                        Ok(Flow::Continue)
                    }
                    Closing::Obscuring => {
                        if fx.is_animating() {
                            Ok(Flow::Yield)
                        } else {
                            self.activate(host)
                        }
                    }
                }
            }

            LoaderState::Activating => {
                if !contains_scene(arrived, &self.target) {
                    return Ok(Flow::Yield);
                }

                if self.transition.is_some() {
                    match self.find_effect(effects).and_then(|id| effects.get_mut(id)) {
                        Some(fx) => fx.animate_transition_to(false, None),
                        None => info!("Couldn't find a transition effect after loading '{}'", self.target),
                    }
                }

                info!("Loaded '{}' through loading screen '{}'", self.target, self.loading_scene);
                Ok(Flow::Finished)
            }
        }
    }

    //--- Internal Helpers -------------------------------------------------

    fn show_loading_screen<H: SceneHost + ?Sized>(&mut self, host: &mut H) -> Result<(), LoadError> {
        self.state = LoaderState::AwaitingLoadingScreen;
        host.load_scene(&self.loading_scene, LoadSceneMode::Single)?;
        Ok(())
    }

    fn activate<H: SceneHost + ?Sized>(&mut self, host: &mut H) -> Result<Flow, LoadError> {
        self.progress.set(1.0);
        if let Some(operation) = self.operation {
            host.allow_activation(operation)?;
        }
        self.state = LoaderState::Activating;
        Ok(Flow::Yield)
    }

    /// True once the obscuring completion was dropped without running.
    ///
    /// The completion holds the only other reference to the flag; it goes
    /// away when its effect is despawned, deactivated or given a new
    /// animation.
    fn obscuring_lost(&self) -> bool {
        !self.obscured.get() && Rc::strong_count(&self.obscured) == 1
    }

    /// The cached effect while it lives, otherwise whatever the selector finds.
    fn find_effect(&mut self, effects: &Effects) -> Option<EffectId> {
        let found = self
            .effect
            .filter(|id| effects.contains(*id))
            .or_else(|| self.transition.and_then(|selector| selector.resolve(effects)));
        self.effect = found;
        found
    }

    fn publish(&self, value: f32) {
        self.progress.set(value.max(self.progress.get()));
    }
}

fn contains_scene(arrived: &[SceneLoaded], scene: &str) -> bool {
    arrived.iter().any(|event| event.scene == scene)
}

//=== LoadingScreenSequencer ==============================================

/// Runs at most one loading-screen session at a time.
#[derive(Debug, Default)]
pub struct LoadingScreenSequencer {
    session: Option<Session>,
}

impl LoadingScreenSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    //--- Queries ----------------------------------------------------------

    pub fn state(&self) -> LoaderState {
        self.session
            .as_ref()
            .map_or(LoaderState::Idle, |session| session.state)
    }

    pub fn is_idle(&self) -> bool {
        self.session.is_none()
    }

    /// Progress of the running session, 0 when idle.
    pub fn progress(&self) -> f32 {
        self.session
            .as_ref()
            .map_or(0.0, |session| session.progress.get())
    }

    /// Target of the running session.
    pub fn target(&self) -> Option<&str> {
        self.session.as_ref().map(|session| session.target.as_str())
    }

    //--- Starting Sessions ------------------------------------------------

    /// Shows the loading scene, then loads `target` behind it.
    pub fn load_scene<H: SceneHost + ?Sized>(
        &mut self,
        screen: &LoadingScreen,
        target: &SceneHandle,
        host: &mut H,
    ) -> Result<LoadingProgress, LoadError> {
        self.check_request(target)?;
        if !screen.is_configured() {
            return Self::load_directly(target, host);
        }

        info!("Loading '{}' through loading screen '{}'", target.name(), screen.loading_scene.name());
        let mut session = Session::open(screen, target, None, host);
        let shown = session.show_loading_screen(host);
        self.start(shown, session, host)
    }

    /// Like [`LoadingScreenSequencer::load_scene`], wrapped in transitions.
    ///
    /// The view is obscured before the loading scene replaces the current
    /// one and again before the target is activated. If no effect is found
    /// the loading screen is shown immediately; effects in the loading
    /// scene and the target are still looked up through `selector`.
    pub fn transition_to_scene<H: SceneHost + ?Sized>(
        &mut self,
        screen: &LoadingScreen,
        target: &SceneHandle,
        selector: EffectSelector,
        host: &mut H,
        effects: &mut Effects,
    ) -> Result<LoadingProgress, LoadError> {
        self.check_request(target)?;
        if !screen.is_configured() {
            return Self::load_directly(target, host);
        }

        info!(
            "Transitioning to '{}' through loading screen '{}'",
            target.name(),
            screen.loading_scene.name()
        );
        let mut session = Session::open(screen, target, Some(selector), host);

        if let Some(id) = selector.resolve(effects) {
            session.effect = Some(id);
            session.state = LoaderState::Obscuring;

            let obscured = Rc::clone(&session.obscured);
            if let Some(fx) = effects.get_mut(id) {
                fx.animate_transition_to(true, Some(Box::new(move || obscured.set(true))));
            }
        }

        let shown = if session.state == LoaderState::Obscuring && !session.obscured.get() {
            Ok(())
        } else {
            session.show_loading_screen(host)
        };
        self.start(shown, session, host)
    }

    //--- Frame Update -----------------------------------------------------

    /// Advances the running session by one frame.
    ///
    /// A host failure ends the session and is returned.
    pub fn advance<H: SceneHost + ?Sized>(
        &mut self,
        dt: f32,
        host: &mut H,
        effects: &mut Effects,
    ) -> Result<(), LoadError> {
        let Some(mut session) = self.session.take() else {
            return Ok(());
        };

        let arrived = session.subscription.drain();
        if session.is_timing() {
            session.elapsed += dt.max(0.0);
        }

        let outcome = loop {
            match session.step(&arrived, host, effects) {
                Ok(Flow::Continue) => continue,
                Ok(Flow::Yield) => break Ok(true),
                Ok(Flow::Finished) => break Ok(false),
                Err(e) => break Err(e),
            }
        };

        match outcome {
            Ok(true) => {
                self.session = Some(session);
                Ok(())
            }
            Ok(false) => {
                session.close(host);
                Ok(())
            }
            Err(e) => {
                error!("Loading screen session towards '{}' failed: {}", session.target, e);
                session.close(host);
                Err(e)
            }
        }
    }

    //--- Internal Helpers -------------------------------------------------

    fn check_request(&self, target: &SceneHandle) -> Result<(), LoadError> {
        if let Some(session) = &self.session {
            return Err(LoadError::SessionInProgress {
                target: session.target.clone(),
            });
        }
        if !target.is_configured() {
            return Err(LoadError::Unconfigured);
        }
        Ok(())
    }

    fn load_directly<H: SceneHost + ?Sized>(
        target: &SceneHandle,
        host: &mut H,
    ) -> Result<LoadingProgress, LoadError> {
        error!(
            "The loading scene was not set on the loading screen, loading '{}' directly",
            target.name()
        );
        target.load_scene(host, LoadSceneMode::Single)?;
        Ok(LoadingProgress::completed())
    }

    fn start<H: SceneHost + ?Sized>(
        &mut self,
        shown: Result<(), LoadError>,
        session: Session,
        host: &mut H,
    ) -> Result<LoadingProgress, LoadError> {
        match shown {
            Ok(()) => {
                let progress = session.progress.clone();
                self.session = Some(session);
                Ok(progress)
            }
            Err(e) => {
                session.close(host);
                Err(e)
            }
        }
    }
}

//=== Tests ===============================================================
