//=========================================================================
// Editor Tooling
//=========================================================================
//
// Pieces a scene browser is built from, independent of any UI toolkit.
//
// Components:
// - `fold_preferences`: persisted expanded/collapsed state per directory
// - `scene_commands`: open, add, close and play scenes with save prompts
// - `scene_list`: scenes grouped by directory, as rows with button state
//
//=========================================================================

//=== Module Declarations =================================================

mod fold_preferences;
mod scene_commands;
mod scene_list;

//=== Public API ==========================================================

pub use fold_preferences::{FoldPreferences, PreferencesError};
pub use scene_commands::{
    add_scene, play_scene, save_and_close_scene, save_and_load_scene, DiscardChanges, SavePrompt,
};
pub use scene_list::{SceneList, SceneListRow, SceneRow};
