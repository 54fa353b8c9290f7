//=========================================================================
// Transition Effect
//=========================================================================
//
// Timed animation of a single visual parameter between 0 and 1.
//
// 0 = effect invisible (game view fully revealed)
// 1 = effect fully obscuring the game view
//
// Animation lifecycle:
//   animate_transition_to(target, cb)
//     ├─ host inactive ──> value = target, cb() immediately
//     └─ Interpolating ──advance(dt)*──> progress >= 1 (value = target)
//                                          ↓
//                         Settling ──advance(dt)──> cb returned to caller
//
// Starting a new animation abandons the running one; its completion is
// dropped without being called.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::any::Any;
use std::fmt;

//=== Completion ==========================================================

/// Callback invoked once an animation has finished.
pub type Completion = Box<dyn FnOnce()>;

//=== EffectSurface Trait =================================================

/// Maps the transition value onto something visible.
///
/// Concrete effects only implement this mapping; timing and completion
/// handling live in [`TransitionEffect`].
pub trait EffectSurface: fmt::Debug {
    /// Applies a value in `[0, 1]`.
    fn apply(&mut self, value: f32);

    /// Downcasts to `&dyn Any` for type-specific queries.
    fn as_any(&self) -> &dyn Any;

    /// Downcasts to `&mut dyn Any` for type-specific configuration.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

//=== Animation ===========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Interpolating,
    Settling,
}

struct Animation {
    start: f32,
    end: f32,
    progress: f32,
    stage: Stage,
    on_completed: Option<Completion>,
}

impl fmt::Debug for Animation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Animation")
            .field("start", &self.start)
            .field("end", &self.end)
            .field("progress", &self.progress)
            .field("stage", &self.stage)
            .field("has_completion", &self.on_completed.is_some())
            .finish()
    }
}

//=== TransitionEffect ====================================================

/// A visual effect played across a scene switch.
#[derive(Debug)]
pub struct TransitionEffect {
    duration: f32,
    value: f32,
    active: bool,
    surface: Box<dyn EffectSurface>,
    animation: Option<Animation>,
}

impl TransitionEffect {
    //--- Construction -----------------------------------------------------

    /// Creates an active, fully revealed effect.
    ///
    /// # Panics
    ///
    /// Panics if `duration` is negative or not finite.
    pub fn new(duration: f32, surface: impl EffectSurface + 'static) -> Self {
        assert!(
            duration.is_finite() && duration >= 0.0,
            "Transition duration must be non-negative, got {}",
            duration
        );

        let mut effect = Self {
            duration,
            value: 0.0,
            active: true,
            surface: Box::new(surface),
            animation: None,
        };
        effect.surface.apply(effect.value);
        effect
    }

    /// Starts fully obscuring, as effects placed in a freshly loaded scene do.
    pub fn obscured(mut self) -> Self {
        self.write_value(1.0);
        self
    }

    //--- Queries ----------------------------------------------------------

    pub fn duration(&self) -> f32 {
        self.duration
    }

    /// Current value in `[0, 1]`.
    pub fn value(&self) -> f32 {
        self.value
    }

    /// True while the value is still moving towards its target.
    ///
    /// Becomes false as soon as the target is reached, one frame before the
    /// completion callback runs.
    pub fn is_animating(&self) -> bool {
        matches!(
            self.animation,
            Some(Animation {
                stage: Stage::Interpolating,
                ..
            })
        )
    }

    /// Whether the object hosting the effect is active.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Typed access to the surface.
    pub fn surface_as<T: EffectSurface + 'static>(&self) -> Option<&T> {
        self.surface.as_any().downcast_ref::<T>()
    }

    /// Typed mutable access to the surface.
    pub fn surface_as_mut<T: EffectSurface + 'static>(&mut self) -> Option<&mut T> {
        self.surface.as_any_mut().downcast_mut::<T>()
    }

    //--- Control ----------------------------------------------------------

    /// Activates or deactivates the object hosting the effect.
    ///
    /// Deactivation abandons a running animation without calling its
    /// completion.
    pub fn set_active(&mut self, active: bool) {
        self.active = active;
        if !active {
            self.animation = None;
        }
    }

    /// Plays the effect towards obscuring (`true`) or revealing (`false`).
    ///
    /// On an inactive host the value jumps to the target and `on_completed`
    /// runs before this call returns. Otherwise the value restarts from the
    /// opposite endpoint and `on_completed` is handed back by
    /// [`TransitionEffect::advance`] one frame after the target is reached.
    pub fn animate_transition_to(&mut self, target: bool, on_completed: Option<Completion>) {
        if !self.active {
            self.set_to(target);
            if let Some(callback) = on_completed {
                callback();
            }
            return;
        }

        let (start, end) = endpoints(target);
        self.animation = Some(Animation {
            start,
            end,
            progress: 0.0,
            stage: Stage::Interpolating,
            on_completed,
        });
        self.write_value(start);
    }

    /// Sets the value without animating, abandoning a running animation.
    pub fn set_to(&mut self, target: bool) {
        self.animation = None;
        self.write_value(endpoints(target).1);
    }

    //--- Frame Update -----------------------------------------------------

    /// Advances the running animation by one frame.
    ///
    /// Returns the completion callback when it is due. The caller invokes
    /// it, so it may freely touch other effects.
    pub fn advance(&mut self, dt: f32) -> Option<Completion> {
        let duration = self.duration;
        let animation = self.animation.as_mut()?;
        let stage = animation.stage;

        match stage {
            Stage::Interpolating => {
                animation.progress = if duration > 0.0 {
                    animation.progress + dt.max(0.0) / duration
                } else {
                    1.0
                };

                let value = if animation.progress >= 1.0 {
                    animation.stage = Stage::Settling;
                    animation.end
                } else {
                    lerp(animation.start, animation.end, animation.progress)
                };
                self.write_value(value);
                None
            }
            Stage::Settling => self.animation.take().and_then(|done| done.on_completed),
        }
    }

    /// Advances one frame and runs a due completion immediately.
    pub fn tick(&mut self, dt: f32) {
        if let Some(callback) = self.advance(dt) {
            callback();
        }
    }

    //--- Internal Helpers -------------------------------------------------

    fn write_value(&mut self, value: f32) {
        self.value = value.clamp(0.0, 1.0);
        self.surface.apply(self.value);
    }
}

fn endpoints(target: bool) -> (f32, f32) {
    if target {
        (0.0, 1.0)
    } else {
        (1.0, 0.0)
    }
}

fn lerp(start: f32, end: f32, t: f32) -> f32 {
    start + (end - start) * t.clamp(0.0, 1.0)
}

//=== Tests ===============================================================
