//=========================================================================
// Scene Runtime
//
// Main entry point and coordinator for scene sequencing.
//
// Architecture:
// ```text
//     SceneRuntimeBuilder  ──build()──>  SceneRuntime  ──tick(dt)──>  [Frame]
//         │                                 │
//         ├─ with_tps()                     ├─ host.begin_frame()
//         ├─ with_loading_screen()          └─ GlobalSystems::update()
//         └─ with_script()
// ```
//
// The runtime never owns the frame loop. The embedding engine calls
// `tick` (or `step` at the configured rate) once per frame.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::info;

//=== Internal Dependencies ===============================================

use crate::config::{SceneCatalog, DEFAULT_LOADING_SCREEN};
use crate::core::error::LoadError;
use crate::core::globals::{GlobalContext, GlobalSystems};
use crate::core::host::{LoadSceneMode, SceneHost};
use crate::core::loading_screen::{LoadingProgress, LoadingScreen};
use crate::core::scene::{SceneHandle, SceneScript};
use crate::core::transition::{EffectSelector, Effects};

//=== SceneRuntimeBuilder =================================================

/// Builder for configuring and constructing a [`SceneRuntime`].
///
/// # Default Values
///
/// - **TPS**: 60.0 (ticks per second used by [`SceneRuntime::step`])
/// - **Loading screen**: none (loads through it go straight to the target)
///
/// # Examples
///
/// ```
/// use scene_sequencer::prelude::*;
///
/// let host = SimulatedHost::new().with_scene("Menu", 0.0);
/// let mut runtime = SceneRuntimeBuilder::new(host)
///     .with_tps(30.0)
///     .with_script("Menu", ScreenFaderScript::new(0.5))
///     .build();
///
/// runtime.load_scene(&SceneHandle::named("Menu"), LoadSceneMode::Single).unwrap();
/// runtime.step();
/// assert_eq!(runtime.effects().len(), 1);
/// ```
pub struct SceneRuntimeBuilder<H: SceneHost> {
    host: H,
    tps: f64,
    loading_screen: LoadingScreen,
    systems: GlobalSystems,
}

impl<H: SceneHost> SceneRuntimeBuilder<H> {
    /// Creates a new builder around `host` with default settings.
    pub fn new(host: H) -> Self {
        Self {
            host,
            tps: 60.0,
            loading_screen: LoadingScreen::default(),
            systems: GlobalSystems::new(),
        }
    }

    /// Sets the tick rate used by [`SceneRuntime::step`].
    ///
    /// Default: 60.0
    ///
    /// # Panics
    ///
    /// Panics if `tps <= 0.0`.
    pub fn with_tps(mut self, tps: f64) -> Self {
        assert!(tps > 0.0, "TPS must be positive, got {}", tps);
        self.tps = tps;
        self
    }

    /// Sets the loading screen used by
    /// [`SceneRuntime::load_through_loading_screen`].
    ///
    /// # Panics
    ///
    /// Panics if `screen` names no loading scene.
    pub fn with_loading_screen(mut self, screen: LoadingScreen) -> Self {
        assert!(screen.is_configured(), "Loading screen must name a loading scene");
        self.loading_screen = screen.validate();
        self
    }

    /// Registers the catalog's auto loaders and takes its default loading
    /// screen, if it has a usable one.
    pub fn with_catalog(mut self, catalog: &SceneCatalog) -> Self {
        for (scene, loader) in &catalog.auto_loaders {
            self.systems.scripts.register(scene.clone(), loader.clone());
        }
        if let Some(screen) = catalog
            .loading_screen(DEFAULT_LOADING_SCREEN)
            .filter(|screen| screen.is_configured())
        {
            self.loading_screen = screen.clone();
        }
        self
    }

    /// Attaches a script to every load of `scene`.
    pub fn with_script<T>(mut self, scene: impl Into<String>, script: T) -> Self
    where
        T: SceneScript + 'static,
    {
        self.systems.scripts.register(scene, script);
        self
    }

    /// Builds the runtime.
    ///
    /// Scenes the host already has loaded are entered on the first tick.
    pub fn build(self) -> SceneRuntime<H> {
        info!("Building scene runtime (TPS: {})", self.tps);

        SceneRuntime {
            host: self.host,
            context: GlobalContext::new(),
            systems: self.systems,
            loading_screen: self.loading_screen,
            tps: self.tps,
            frame: 0,
            started: false,
        }
    }
}

//=== SceneRuntime ========================================================

/// Owns the host, the effects, the scripts and the one loading-screen
/// sequencer, and drives them once per frame.
pub struct SceneRuntime<H: SceneHost> {
    host: H,
    context: GlobalContext,
    systems: GlobalSystems,
    loading_screen: LoadingScreen,
    tps: f64,
    frame: u64,
    started: bool,
}

impl<H: SceneHost> SceneRuntime<H> {
    //--- Initialization ---------------------------------------------------

    /// Configures systems before the first tick.
    pub fn init<F>(mut self, init_fn: F) -> Self
    where
        F: FnOnce(&mut GlobalSystems),
    {
        info!("Initializing runtime systems");
        init_fn(&mut self.systems);
        self
    }

    //--- Frame Update -----------------------------------------------------

    /// Runs one frame that lasted `dt` seconds.
    pub fn tick(&mut self, dt: f32) {
        self.ensure_started();
        self.host.begin_frame(dt);
        self.systems.update(dt, &mut self.host, &mut self.context);
        self.frame += 1;
    }

    /// Runs one frame at the configured tick rate.
    pub fn step(&mut self) {
        self.tick(self.fixed_delta());
    }

    /// Runs `frames` fixed-rate frames.
    pub fn run_frames(&mut self, frames: u32) {
        for _ in 0..frames {
            self.step();
        }
    }

    /// Seconds per fixed-rate frame.
    pub fn fixed_delta(&self) -> f32 {
        (1.0 / self.tps) as f32
    }

    /// Frames run so far.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    //--- Scene Operations -------------------------------------------------

    /// Loads immediately, cancelling pending transitions the load overrides.
    pub fn load_scene(&mut self, scene: &SceneHandle, mode: LoadSceneMode) -> Result<(), LoadError> {
        self.ensure_started();
        self.systems.load_scene(scene, mode, &mut self.host)
    }

    /// Obscures, loads and reveals over the next frames.
    pub fn transition_to_scene(
        &mut self,
        scene: &SceneHandle,
        selector: EffectSelector,
    ) -> Result<(), LoadError> {
        self.ensure_started();
        self.systems
            .transition_to_scene(scene, selector, &mut self.host, &mut self.context.effects)
    }

    /// Loads `target` behind `screen`, with transitions when `effect` is set.
    ///
    /// The returned handle reports this session's progress only.
    pub fn load_with_loading_screen(
        &mut self,
        screen: &LoadingScreen,
        target: &SceneHandle,
        effect: Option<EffectSelector>,
    ) -> Result<LoadingProgress, LoadError> {
        self.ensure_started();
        self.systems.load_with_loading_screen(
            screen,
            target,
            effect,
            &mut self.host,
            &mut self.context.effects,
        )
    }

    /// Loads `target` behind the loading screen the runtime was built with.
    pub fn load_through_loading_screen(
        &mut self,
        target: &SceneHandle,
        effect: Option<EffectSelector>,
    ) -> Result<LoadingProgress, LoadError> {
        let screen = self.loading_screen.clone();
        self.load_with_loading_screen(&screen, target, effect)
    }

    //--- Accessors --------------------------------------------------------

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn effects(&self) -> &Effects {
        &self.context.effects
    }

    pub fn context(&self) -> &GlobalContext {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut GlobalContext {
        &mut self.context
    }

    pub fn systems(&self) -> &GlobalSystems {
        &self.systems
    }

    /// Progress of the running loading-screen session, 0 when idle.
    pub fn loading_progress(&self) -> f32 {
        self.systems.loader.progress()
    }

    //--- Internal Helpers -------------------------------------------------

    fn ensure_started(&mut self) {
        if !self.started {
            self.started = true;
            self.systems.start(&mut self.host, &mut self.context);
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::auto_loader::AutoLoader;
    use crate::core::host::{AsyncLoadId, SceneLoaded, SimulatedHost};
    use crate::core::loading_screen::{LoaderState, ProgressBar};
    use crate::core::scene::SceneRequest;
    use crate::core::transition::ScreenFaderScript;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn init_logger() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn host() -> SimulatedHost {
        let mut host = SimulatedHost::new()
            .with_scene("Splash", 0.0)
            .with_scene("Menu", 0.0)
            .with_scene("Loading", 0.0)
            .with_scene("Hud", 0.0)
            .with_scene("Level1", 0.5);
        host.load_scene("Menu", LoadSceneMode::Single).unwrap();
        host
    }

    /// Records the progress scripts observe each frame.
    struct ProgressRecorder(Rc<RefCell<Vec<f32>>>);

    impl SceneScript for ProgressRecorder {
        fn update(&mut self, context: &mut GlobalContext) {
            self.0.borrow_mut().push(context.loading_progress());
        }
    }

    /// Records scene-loaded messages seen on the bus.
    struct LoadedRecorder(Rc<RefCell<Vec<String>>>);

    impl SceneScript for LoadedRecorder {
        fn update(&mut self, context: &mut GlobalContext) {
            let mut seen = self.0.borrow_mut();
            seen.extend(context.scenes_loaded().iter().map(|e| e.scene.clone()));
        }
    }

    /// Issues one request on its first update.
    struct Requester(Option<SceneRequest>);

    impl SceneScript for Requester {
        fn update(&mut self, context: &mut GlobalContext) {
            if let Some(request) = self.0.take() {
                context.request(request);
            }
        }
    }

    //=====================================================================
    // Builder Tests
    //=====================================================================

    #[test]
    fn builder_defaults() {
        let runtime = SceneRuntimeBuilder::new(host()).build();
        assert_eq!(runtime.tps, 60.0);
        assert_eq!(runtime.frame(), 0);
    }

    #[test]
    fn builder_with_tps() {
        let runtime = SceneRuntimeBuilder::new(host()).with_tps(8.0).build();
        assert_eq!(runtime.fixed_delta(), 0.125);
    }

    #[test]
    #[should_panic(expected = "TPS must be positive")]
    fn builder_with_tps_panics_on_zero() {
        SceneRuntimeBuilder::new(host()).with_tps(0.0);
    }

    #[test]
    #[should_panic(expected = "Loading screen must name a loading scene")]
    fn builder_rejects_unconfigured_loading_screen() {
        SceneRuntimeBuilder::new(host()).with_loading_screen(LoadingScreen::default());
    }

    #[test]
    fn init_registers_scripts_before_first_tick() {
        let mut runtime = SceneRuntimeBuilder::new(host())
            .build()
            .init(|systems| systems.scripts.register("Menu", ScreenFaderScript::new(0.5)));

        runtime.step();
        assert!(runtime.effects().find_active_in("Menu").is_some());
        assert!(runtime.systems().scripts.is_loaded("Menu"));
    }

    //=====================================================================
    // Loading Screen Tests
    //=====================================================================

    #[test]
    fn loading_screen_end_to_end() {
        init_logger();
        let observed = Rc::new(RefCell::new(Vec::new()));
        let mut runtime = SceneRuntimeBuilder::new(host())
            .with_tps(8.0)
            .with_script("Loading", ProgressRecorder(Rc::clone(&observed)))
            .with_script("Loading", ProgressBar::new())
            .build();

        let progress = runtime
            .load_with_loading_screen(
                &LoadingScreen::new(SceneHandle::named("Loading"), 2.0),
                &SceneHandle::named("Level1"),
                None,
            )
            .unwrap();
        assert_eq!(progress.get(), 0.0);

        runtime.step();
        let started = runtime.host().time();
        assert_eq!(runtime.systems().loader.state(), LoaderState::AwaitingTargetLoad);

        let operation = AsyncLoadId::new(0);
        for k in 1..16 {
            runtime.step();
            assert!(
                runtime.host().activation_requested_at(operation).is_none(),
                "activation requested early at frame {}",
                k
            );
        }
        runtime.step();
        assert_eq!(
            runtime.host().activation_requested_at(operation),
            Some(started + 2.0)
        );
        assert_eq!(runtime.loading_progress(), 1.0);

        runtime.step();
        assert_eq!(runtime.host().loaded_scenes(), vec!["Level1"]);
        assert!(runtime.systems().loader.is_idle());
        assert_eq!(progress.get(), 0.0);

        // Only the runtime's own listener is left.
        assert_eq!(runtime.host().subscriber_count(), 1);

        let observed = observed.borrow();
        assert!(observed.windows(2).all(|w| w[0] <= w[1]));
        assert!(observed.iter().all(|p| (0.0..=1.0).contains(p)));
        assert_eq!(observed.last(), Some(&1.0));
    }

    #[test]
    fn builder_loading_screen_is_used() {
        let mut runtime = SceneRuntimeBuilder::new(host())
            .with_loading_screen(LoadingScreen::new(SceneHandle::named("Loading"), -1.0))
            .build();

        runtime
            .load_through_loading_screen(&SceneHandle::named("Level1"), None)
            .unwrap();
        assert_eq!(runtime.host().loaded_scenes(), vec!["Loading"]);
        assert_eq!(runtime.systems().loader.target(), Some("Level1"));
    }

    #[test]
    fn catalog_configures_runtime() {
        let catalog = SceneCatalog::from_json_str(
            r#"{
                "loading_screens": {
                    "default": { "loading_scene": { "name": "Loading" }, "min_loading_time": 1.0 }
                },
                "auto_loaders": {
                    "Menu": { "target": { "name": "Level1" }, "use_loading_screen": true,
                              "loading_screen": { "loading_scene": { "name": "Loading" } } }
                }
            }"#,
        )
        .unwrap();

        let mut runtime = SceneRuntimeBuilder::new(host()).with_catalog(&catalog).build();
        assert_eq!(runtime.loading_screen.min_loading_time, 1.0);
        assert_eq!(runtime.systems().scripts.script_count("Menu"), 1);

        // Menu is already loaded, so its auto loader fires on the first tick
        // and its request applies on the second.
        runtime.run_frames(2);
        assert_eq!(runtime.systems().loader.target(), Some("Level1"));
        assert_eq!(runtime.host().loaded_scenes(), vec!["Loading"]);
    }

    #[test]
    fn missing_loading_screen_loads_target_directly() {
        init_logger();
        let mut runtime = SceneRuntimeBuilder::new(host()).build();

        let progress = runtime
            .load_through_loading_screen(&SceneHandle::named("Hud"), None)
            .unwrap();

        assert_eq!(progress.get(), 1.0);
        assert_eq!(runtime.host().loaded_scenes(), vec!["Hud"]);
        assert!(runtime.systems().loader.is_idle());
    }

    #[test]
    fn second_session_is_rejected_while_first_runs() {
        let mut runtime = SceneRuntimeBuilder::new(host()).build();
        let screen = LoadingScreen::new(SceneHandle::named("Loading"), 0.0);

        runtime
            .load_with_loading_screen(&screen, &SceneHandle::named("Level1"), None)
            .unwrap();
        let second =
            runtime.load_with_loading_screen(&screen, &SceneHandle::named("Menu"), None);

        assert!(matches!(second, Err(LoadError::SessionInProgress { .. })));
    }

    //=====================================================================
    // Transition Tests
    //=====================================================================

    #[test]
    fn auto_loader_splash_flow() {
        init_logger();
        let screen = LoadingScreen::new(SceneHandle::named("Loading"), 0.5);
        let mut runtime = SceneRuntimeBuilder::new(host())
            .with_tps(8.0)
            .with_script("Splash", ScreenFaderScript::new(0.25).revealed())
            .with_script(
                "Splash",
                AutoLoader::new(SceneHandle::named("Level1"))
                    .with_delay(0.5)
                    .with_loading_screen(screen),
            )
            .with_script("Loading", ScreenFaderScript::new(0.25))
            .with_script("Level1", ScreenFaderScript::new(0.25))
            .build();

        runtime
            .load_scene(&SceneHandle::named("Splash"), LoadSceneMode::Single)
            .unwrap();

        let mut frames = 0;
        let arrived = |runtime: &SceneRuntime<SimulatedHost>| {
            runtime.host().loaded_scenes() == vec!["Level1"] && runtime.systems().loader.is_idle()
        };
        while !arrived(&runtime) {
            runtime.step();
            frames += 1;
            assert!(frames < 100, "splash flow never reached Level1");
        }

        let history: Vec<&str> = runtime
            .host()
            .history()
            .iter()
            .map(|e| e.scene.as_str())
            .collect();
        assert_eq!(history, vec!["Menu", "Splash", "Loading", "Level1"]);

        // Level1's fader is revealing the new scene.
        let fader = runtime.effects().find_active_in("Level1").unwrap();
        assert!(runtime.effects().get(fader).unwrap().is_animating());
        assert_eq!(runtime.effects().len(), 1);
        assert_eq!(runtime.host().subscriber_count(), 1);
    }

    #[test]
    fn direct_load_cancels_pending_transition() {
        let mut runtime = SceneRuntimeBuilder::new(host())
            .with_script("Menu", ScreenFaderScript::new(1.0).revealed())
            .build();
        runtime.step();

        runtime
            .transition_to_scene(&SceneHandle::named("Level1"), EffectSelector::Discover)
            .unwrap();
        assert_eq!(runtime.systems().pending_transitions(), 1);
        assert_eq!(runtime.host().subscriber_count(), 2);

        runtime
            .load_scene(&SceneHandle::named("Level1"), LoadSceneMode::Single)
            .unwrap();
        assert_eq!(runtime.systems().pending_transitions(), 0);
        assert_eq!(runtime.host().subscriber_count(), 1);
    }

    #[test]
    fn single_load_cancels_every_pending_transition() {
        let mut runtime = SceneRuntimeBuilder::new(host())
            .with_script("Menu", ScreenFaderScript::new(1.0).revealed())
            .build();
        runtime.step();

        runtime
            .transition_to_scene(&SceneHandle::named("Level1"), EffectSelector::Discover)
            .unwrap();
        runtime
            .load_scene(&SceneHandle::named("Hud"), LoadSceneMode::Single)
            .unwrap();
        runtime.run_frames(20);

        assert_eq!(runtime.systems().pending_transitions(), 0);
        assert_eq!(runtime.host().subscriber_count(), 1);
        assert_eq!(runtime.host().loaded_scenes(), vec!["Hud"]);
    }

    #[test]
    fn additive_load_keeps_other_transitions() {
        let mut runtime = SceneRuntimeBuilder::new(host())
            .with_script("Menu", ScreenFaderScript::new(1.0).revealed())
            .build();
        runtime.step();

        runtime
            .transition_to_scene(&SceneHandle::named("Level1"), EffectSelector::Discover)
            .unwrap();
        runtime
            .load_scene(&SceneHandle::named("Hud"), LoadSceneMode::Additive)
            .unwrap();

        assert_eq!(runtime.systems().pending_transitions(), 1);
        assert_eq!(runtime.host().subscriber_count(), 2);
    }

    #[test]
    fn replaced_scene_does_not_strand_loading_screen() {
        init_logger();
        let mut runtime = SceneRuntimeBuilder::new(host())
            .with_script("Menu", ScreenFaderScript::new(0.25).revealed())
            .build();
        runtime.step();

        let screen = LoadingScreen::new(SceneHandle::named("Loading"), 0.0);
        runtime
            .load_with_loading_screen(
                &screen,
                &SceneHandle::named("Level1"),
                Some(EffectSelector::Discover),
            )
            .unwrap();
        assert_eq!(runtime.systems().loader.state(), LoaderState::Obscuring);

        // The scene holding the obscuring fader goes away mid-animation.
        runtime
            .load_scene(&SceneHandle::named("Hud"), LoadSceneMode::Single)
            .unwrap();

        let mut frames = 0;
        while !runtime.systems().loader.is_idle() {
            runtime.step();
            frames += 1;
            assert!(frames < 60, "loader stuck in {:?}", runtime.systems().loader.state());
        }

        assert_eq!(runtime.host().loaded_scenes(), vec!["Level1"]);
        assert_eq!(runtime.host().subscriber_count(), 1);

        let next = runtime.load_with_loading_screen(&screen, &SceneHandle::named("Menu"), None);
        assert!(next.is_ok());
    }

    #[test]
    fn transition_without_effect_cuts_straight_to_scene() {
        let mut runtime = SceneRuntimeBuilder::new(host()).build();

        runtime
            .transition_to_scene(&SceneHandle::named("Hud"), EffectSelector::Discover)
            .unwrap();

        assert_eq!(runtime.systems().pending_transitions(), 0);
        assert_eq!(runtime.host().loaded_scenes(), vec!["Hud"]);
    }

    //=====================================================================
    // Request and Notification Tests
    //=====================================================================

    #[test]
    fn script_requests_apply_next_tick() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut runtime = SceneRuntimeBuilder::new(host())
            .with_script(
                "Menu",
                Requester(Some(SceneRequest::Load {
                    scene: SceneHandle::named("Hud"),
                    mode: LoadSceneMode::Additive,
                })),
            )
            .with_script("Menu", LoadedRecorder(Rc::clone(&seen)))
            .build();

        runtime.step();
        assert_eq!(runtime.host().loaded_scenes(), vec!["Menu"]);

        runtime.step();
        assert_eq!(runtime.host().loaded_scenes(), vec!["Menu", "Hud"]);
        assert_eq!(*seen.borrow(), vec!["Hud".to_string()]);
        assert!(runtime.context().scenes_loaded().is_empty());

        runtime.context_mut().request(SceneRequest::Unload {
            scene: "Hud".into(),
        });
        runtime.step();
        assert_eq!(runtime.host().loaded_scenes(), vec!["Menu"]);
        assert!(!runtime.systems().scripts.is_loaded("Hud"));
    }

    #[test]
    fn failed_request_is_logged_and_skipped() {
        init_logger();
        let mut runtime = SceneRuntimeBuilder::new(host()).build();

        runtime.context_mut().request(SceneRequest::load(SceneHandle::named("Missing")));
        runtime.context_mut().request(SceneRequest::load(SceneHandle::named("Hud")));
        runtime.step();

        assert_eq!(runtime.host().loaded_scenes(), vec!["Hud"]);
    }

    #[test]
    fn replaced_scene_effects_are_despawned() {
        let mut runtime = SceneRuntimeBuilder::new(host())
            .with_script("Menu", ScreenFaderScript::new(0.5))
            .build();
        runtime.step();
        assert_eq!(runtime.effects().len(), 1);

        runtime
            .load_scene(&SceneHandle::named("Hud"), LoadSceneMode::Single)
            .unwrap();
        runtime.step();

        assert!(runtime.effects().is_empty());
        assert!(matches!(
            runtime.host().history().last(),
            Some(SceneLoaded { scene, .. }) if scene == "Hud"
        ));
    }
}
