//=========================================================================
// Auto Loader
//=========================================================================
//
// Scene script that changes scene on its own a while after its scene has
// loaded, as splash screens and intros do.
//
// Request chosen:
//   use_loading_screen && loading_screen set
//     ├─ use_transition ──> LoadWithLoadingScreen { effect: Some(..) }
//     └─ otherwise ───────> LoadWithLoadingScreen { effect: None }
//   otherwise
//     ├─ use_transition ──> TransitionTo
//     └─ otherwise ───────> Load (single)
//
// The effect is the explicit one when set, else whichever is active.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::debug;
use serde::{Deserialize, Serialize};

//=== Internal Dependencies ===============================================

use crate::core::globals::GlobalContext;
use crate::core::loading_screen::LoadingScreen;
use crate::core::scene::{SceneHandle, SceneRequest, SceneScript};
use crate::core::transition::{EffectId, EffectSelector};

//=== AutoLoader ==========================================================

/// Loads a scene once its own scene has been up for `delay_seconds`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutoLoader {
    pub delay_seconds: f32,
    pub target: Option<SceneHandle>,
    pub use_transition: bool,
    /// Live effect to play. Not serialized.
    #[serde(skip)]
    pub effect: Option<EffectId>,
    pub use_loading_screen: bool,
    pub loading_screen: Option<LoadingScreen>,

    #[serde(skip)]
    waited: Option<f32>,
}

impl Default for AutoLoader {
    fn default() -> Self {
        Self {
            delay_seconds: 0.0,
            target: None,
            use_transition: true,
            effect: None,
            use_loading_screen: false,
            loading_screen: None,
            waited: None,
        }
    }
}

impl AutoLoader {
    //--- Construction -----------------------------------------------------

    /// Loads `target` with a transition, without delay.
    pub fn new(target: SceneHandle) -> Self {
        Self {
            target: Some(target),
            ..Self::default()
        }
    }

    /// # Panics
    ///
    /// Panics if `seconds` is negative.
    pub fn with_delay(mut self, seconds: f32) -> Self {
        assert!(seconds >= 0.0, "Delay must be non-negative, got {}", seconds);
        self.delay_seconds = seconds;
        self
    }

    pub fn with_transition(mut self, use_transition: bool) -> Self {
        self.use_transition = use_transition;
        self
    }

    /// Plays a specific effect instead of discovering one.
    pub fn with_effect(mut self, effect: EffectId) -> Self {
        self.effect = Some(effect);
        self
    }

    pub fn with_loading_screen(mut self, screen: LoadingScreen) -> Self {
        self.use_loading_screen = true;
        self.loading_screen = Some(screen);
        self
    }

    //--- Queries ----------------------------------------------------------

    /// Whether a request is still due for the current load.
    pub fn is_waiting(&self) -> bool {
        self.waited.is_some()
    }

    /// The request this loader issues, or `None` without a usable target.
    pub fn request(&self) -> Option<SceneRequest> {
        let target = self.target.clone().filter(SceneHandle::is_configured)?;

        let effect = self.use_transition.then(|| {
            self.effect
                .map_or(EffectSelector::Discover, EffectSelector::Explicit)
        });

        let request = match (&self.loading_screen, self.use_loading_screen) {
            (Some(screen), true) => SceneRequest::LoadWithLoadingScreen {
                target,
                screen: screen.clone(),
                effect,
            },
            _ => match effect {
                Some(effect) => SceneRequest::TransitionTo {
                    scene: target,
                    effect,
                },
                None => SceneRequest::load(target),
            },
        };
        Some(request)
    }
}

impl SceneScript for AutoLoader {
    fn on_loaded(&mut self, scene: &str, _context: &mut GlobalContext) {
        let configured = self
            .target
            .as_ref()
            .is_some_and(SceneHandle::is_configured);

        self.waited = if configured {
            Some(0.0)
        } else {
            debug!("Auto loader in '{}' has no target scene", scene);
            None
        };
    }

    fn on_unloaded(&mut self, _scene: &str, _context: &mut GlobalContext) {
        self.waited = None;
    }

    fn update(&mut self, context: &mut GlobalContext) {
        let Some(waited) = self.waited.as_mut() else {
            return;
        };

        if *waited < self.delay_seconds {
            *waited += context.delta_time();
            if *waited < self.delay_seconds {
                return;
            }
        }

        self.waited = None;
        if let Some(request) = self.request() {
            debug!("Auto loader requesting {:?}", request.destination());
            context.request(request);
        }
    }
}

//=== Tests ===============================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::host::LoadSceneMode;

    fn level() -> SceneHandle {
        SceneHandle::named("Level1")
    }

    fn screen() -> LoadingScreen {
        LoadingScreen::new(SceneHandle::named("Loading"), 1.0)
    }

    #[test]
    fn request_branches() {
        let plain = AutoLoader::new(level()).with_transition(false).request();
        assert!(matches!(
            plain,
            Some(SceneRequest::Load {
                mode: LoadSceneMode::Single,
                ..
            })
        ));

        let discovered = AutoLoader::new(level()).request();
        assert!(matches!(
            discovered,
            Some(SceneRequest::TransitionTo {
                effect: EffectSelector::Discover,
                ..
            })
        ));

        let screened = AutoLoader::new(level())
            .with_transition(false)
            .with_loading_screen(screen())
            .request();
        assert!(matches!(
            screened,
            Some(SceneRequest::LoadWithLoadingScreen { effect: None, .. })
        ));

        let screened_with_transition = AutoLoader::new(level())
            .with_loading_screen(screen())
            .request();
        assert!(matches!(
            screened_with_transition,
            Some(SceneRequest::LoadWithLoadingScreen {
                effect: Some(EffectSelector::Discover),
                ..
            })
        ));
    }

    #[test]
    fn loading_screen_flag_without_screen_loads_directly() {
        let mut loader = AutoLoader::new(level());
        loader.use_loading_screen = true;
        assert!(matches!(
            loader.request(),
            Some(SceneRequest::TransitionTo { .. })
        ));
    }

    #[test]
    fn unconfigured_target_does_nothing() {
        assert!(AutoLoader::default().request().is_none());
        assert!(AutoLoader::new(SceneHandle::default()).request().is_none());

        let mut context = GlobalContext::new();
        let mut loader = AutoLoader::default();
        loader.on_loaded("Splash", &mut context);
        loader.update(&mut context);

        assert!(!loader.is_waiting());
        assert!(!context.message_bus.has_messages::<SceneRequest>());
    }

    #[test]
    fn fires_once_after_delay() {
        let mut context = GlobalContext::new();
        context.delta_time = 0.25;
        let mut loader = AutoLoader::new(level()).with_delay(0.5);

        loader.on_loaded("Splash", &mut context);
        loader.update(&mut context);
        assert_eq!(context.message_bus.count::<SceneRequest>(), 0);

        loader.update(&mut context);
        assert_eq!(context.message_bus.count::<SceneRequest>(), 1);

        loader.update(&mut context);
        assert_eq!(context.message_bus.count::<SceneRequest>(), 1);

        // Reloading the scene arms it again.
        loader.on_loaded("Splash", &mut context);
        loader.update(&mut context);
        loader.update(&mut context);
        assert_eq!(context.message_bus.count::<SceneRequest>(), 2);
    }

    #[test]
    fn zero_delay_fires_on_first_update() {
        let mut context = GlobalContext::new();
        let mut loader = AutoLoader::new(level());

        loader.on_loaded("Splash", &mut context);
        loader.update(&mut context);
        assert_eq!(context.message_bus.count::<SceneRequest>(), 1);
    }

    #[test]
    fn explicit_effect_is_kept_out_of_json() {
        let loader = AutoLoader::new(level()).with_delay(2.0);
        let json = serde_json::to_string(&loader).unwrap();
        assert!(!json.contains("effect"));

        let parsed: AutoLoader = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, loader);

        let sparse: AutoLoader = serde_json::from_str(r#"{"target":{"name":"Level1"}}"#).unwrap();
        assert!(sparse.use_transition);
        assert_eq!(sparse.delay_seconds, 0.0);
    }

    #[test]
    #[should_panic(expected = "Delay must be non-negative")]
    fn negative_delay_panics() {
        AutoLoader::new(level()).with_delay(-1.0);
    }
}
