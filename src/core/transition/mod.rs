//=========================================================================
// Transition System
//=========================================================================
//
// Visual effects that decorate a scene switch.
//
// Architecture:
//   Effects (registry, per scene)
//     └─ TransitionEffect (timing, completion)
//          └─ Box<dyn EffectSurface> (value -> visible property)
//
//=========================================================================

//=== Module Declarations =================================================

mod effect;
mod effects;
mod fader_script;
mod screen_fader;

//=== Public API ==========================================================

pub use effect::{Completion, EffectSurface, TransitionEffect};
pub use effects::{EffectId, EffectSelector, Effects};
pub use fader_script::ScreenFaderScript;
pub use screen_fader::ScreenFader;
