//=========================================================================
// Global Systems
//=========================================================================
//
// Container for the runtime's systems with logic.
//
// Contains the script registry, the loading-screen sequencer and the
// transition-wrapped loads in flight. Systems operate on GlobalContext
// data and on the host.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::{debug, error};

//=== Internal Dependencies ===============================================

use super::GlobalContext;
use crate::core::error::LoadError;
use crate::core::host::{LoadSceneMode, SceneHost, SceneLoaded, SceneLoadedSubscription};
use crate::core::loading_screen::{LoadingProgress, LoadingScreen, LoadingScreenSequencer};
use crate::core::scene::{HandleTransition, SceneHandle, SceneRequest, SceneScripts};
use crate::core::transition::{EffectSelector, Effects};

//=== GlobalSystems =======================================================

/// Container for the runtime's logic systems.
///
/// # Available Systems
///
/// - `scripts`: per-scene content and loaded-scene bookkeeping
/// - `loader`: the one loading-screen sequencer
#[derive(Debug, Default)]
pub struct GlobalSystems {
    /// Scripts attached to scenes by name.
    pub scripts: SceneScripts,

    /// Loading-screen sequencer, advanced once per tick.
    pub loader: LoadingScreenSequencer,

    transitions: Vec<HandleTransition>,
    subscription: Option<SceneLoadedSubscription>,
}

impl GlobalSystems {
    /// Creates a new systems container with no scripts and an idle loader.
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Subscribes to the host and enters the scenes it already has loaded.
    pub(crate) fn start<H: SceneHost + ?Sized>(&mut self, host: &mut H, context: &mut GlobalContext) {
        if self.subscription.is_none() {
            self.subscription = Some(host.subscribe());
        }
        self.scripts.seed(host, context);
    }

    /// Number of transition-wrapped loads still running.
    pub fn pending_transitions(&self) -> usize {
        self.transitions.len()
    }

    //--- Update Loop ------------------------------------------------------

    /// Updates all systems for the current frame.
    ///
    /// # Processing Pipeline
    ///
    /// 1. **Requests**: applies `SceneRequest`s queued since the last tick
    /// 2. **Notifications**: leaves replaced scenes, enters loaded ones and
    ///    publishes `SceneLoaded` messages
    /// 3. **Effects**: animates transition effects, runs completions
    /// 4. **Sequencing**: advances handle transitions and the loader
    /// 5. **Scripts**: updates scripts of loaded scenes
    /// 6. **Cleanup**: clears this frame's `SceneLoaded` messages
    pub(crate) fn update<H: SceneHost + ?Sized>(
        &mut self,
        dt: f32,
        host: &mut H,
        context: &mut GlobalContext,
    ) {
        context.delta_time = dt;

        // 1. Apply requests queued by scripts
        for request in context.message_bus.take::<SceneRequest>() {
            if let Err(e) = self.apply(request, host, &mut context.effects) {
                error!("Scene request failed: {}", e);
            }
        }

        // 2. Dispatch scene-loaded notifications
        self.dispatch_loaded(host, context);

        // 3. Animate effects
        context.effects.advance(dt);

        // 4. Advance sequencing
        self.advance_transitions(host, &mut context.effects);
        if let Err(e) = self.loader.advance(dt, host, &mut context.effects) {
            error!("Loading screen failed: {}", e);
        }
        context.loading_progress = self.loader.progress();

        // 5. Update scripts (may queue requests for the next tick)
        self.scripts.update(context);

        // 6. Per-frame notifications end here
        context.message_bus.clear::<SceneLoaded>();
    }

    //--- Scene Operations -------------------------------------------------

    /// Loads immediately.
    ///
    /// Cancels transitions pending towards the scene, and every pending
    /// transition when the load replaces all scenes.
    pub fn load_scene<H: SceneHost + ?Sized>(
        &mut self,
        scene: &SceneHandle,
        mode: LoadSceneMode,
        host: &mut H,
    ) -> Result<(), LoadError> {
        scene.load_scene(host, mode)?;

        for transition in self
            .transitions
            .iter_mut()
            .filter(|t| mode == LoadSceneMode::Single || t.scene() == scene.name())
        {
            transition.cancel(host);
        }
        self.transitions.retain(|t| !t.is_finished());
        Ok(())
    }

    /// Starts a transition-wrapped load.
    pub fn transition_to_scene<H: SceneHost + ?Sized>(
        &mut self,
        scene: &SceneHandle,
        selector: EffectSelector,
        host: &mut H,
        effects: &mut Effects,
    ) -> Result<(), LoadError> {
        if let Some(transition) = scene.transition_to_scene(selector, host, effects)? {
            self.transitions.push(transition);
        }
        Ok(())
    }

    /// Starts a loading-screen session, with transitions when `effect` is set.
    pub fn load_with_loading_screen<H: SceneHost + ?Sized>(
        &mut self,
        screen: &LoadingScreen,
        target: &SceneHandle,
        effect: Option<EffectSelector>,
        host: &mut H,
        effects: &mut Effects,
    ) -> Result<LoadingProgress, LoadError> {
        match effect {
            Some(selector) => self
                .loader
                .transition_to_scene(screen, target, selector, host, effects),
            None => self.loader.load_scene(screen, target, host),
        }
    }

    //--- Internal Helpers -------------------------------------------------

    fn apply<H: SceneHost + ?Sized>(
        &mut self,
        request: SceneRequest,
        host: &mut H,
        effects: &mut Effects,
    ) -> Result<(), LoadError> {
        debug!("Applying {:?}", request);
        match request {
            SceneRequest::Load { scene, mode } => self.load_scene(&scene, mode, host),
            SceneRequest::TransitionTo { scene, effect } => {
                self.transition_to_scene(&scene, effect, host, effects)
            }
            SceneRequest::LoadWithLoadingScreen {
                target,
                screen,
                effect,
            } => self
                .load_with_loading_screen(&screen, &target, effect, host, effects)
                .map(|_| ()),
            SceneRequest::Unload { scene } => {
                host.unload_scene_async(&scene)?;
                Ok(())
            }
        }
    }

    fn dispatch_loaded<H: SceneHost + ?Sized>(&mut self, host: &H, context: &mut GlobalContext) {
        let arrived = self
            .subscription
            .as_ref()
            .map(SceneLoadedSubscription::drain)
            .unwrap_or_default();

        // Replacing loads and unloads both show up as scenes gone missing.
        self.scripts.sync_unloaded(host, context);

        for event in arrived {
            if host.get_scene_by_name(&event.scene).is_loaded {
                self.scripts.enter(&event.scene, context);
            } else {
                debug!("Scene '{}' was replaced in the frame it loaded", event.scene);
            }
            context.message_bus.push(event);
        }
    }

    fn advance_transitions<H: SceneHost + ?Sized>(&mut self, host: &mut H, effects: &mut Effects) {
        for transition in &mut self.transitions {
            if let Err(e) = transition.advance(host, effects) {
                error!("Transition to '{}' failed: {}", transition.scene(), e);
            }
        }
        self.transitions.retain(|t| !t.is_finished());
    }
}
