//=========================================================================
// Scene Sequencer: Library Root
//
// Scene transitions and loading screens on top of a host engine's scene
// API.
//
// Responsibilities:
// - Expose the runtime facade (`SceneRuntime`) and its builder
// - Keep the per-frame state machines in `core`, free of any engine
// - Provide authoring data (`config`) and editor tooling (`editor`)
//
// Typical usage:
// ```
// use scene_sequencer::prelude::*;
//
// let host = SimulatedHost::new()
//     .with_scene("Menu", 0.0)
//     .with_scene("Loading", 0.0)
//     .with_scene("Level1", 0.5);
//
// let mut runtime = SceneRuntimeBuilder::new(host).with_tps(8.0).build();
// runtime.load_scene(&SceneHandle::named("Menu"), LoadSceneMode::Single).unwrap();
//
// let screen = LoadingScreen::new(SceneHandle::named("Loading"), 1.0);
// let progress = runtime
//     .load_with_loading_screen(&screen, &SceneHandle::named("Level1"), None)
//     .unwrap();
//
// while !runtime.systems().loader.is_idle() {
//     runtime.step();
//     assert!(progress.get() <= 1.0);
// }
// assert_eq!(runtime.host().loaded_scenes(), vec!["Level1"]);
// ```
//
//=========================================================================

//--- Public Modules ------------------------------------------------------
//
// `core` contains the host contract, effects, scene handles and the
// loading-screen sequencer. Most applications only need the runtime
// facade and the prelude.
//
pub mod config;
pub mod core;
pub mod editor;
pub mod prelude;

//--- Internal Modules ----------------------------------------------------
//
// `runtime` wires the core systems into a per-frame tick.
//
mod runtime;

//--- Public Exports ------------------------------------------------------

pub use runtime::{SceneRuntime, SceneRuntimeBuilder};
