//=========================================================================
// Scene Commands
//=========================================================================
//
// Open, add and close scenes from tooling, asking to save unsaved changes
// first when the host is being edited rather than played.
//
//   host.is_playing()
//     ├─ yes ──> load / unload right away
//     └─ no ───> SavePrompt ──declined──> nothing happens
//                    └─────────accepted──> load / unload
//
//=========================================================================

//=== External Dependencies ===============================================

use log::{debug, info};

//=== Internal Dependencies ===============================================

use crate::core::host::{HostError, LoadSceneMode, SceneHost, SceneInfo};

//=== SavePrompt ==========================================================

/// The "save modified scenes" dialog of the editor.
///
/// Both methods return `false` when the user cancels, in which case the
/// command that asked is abandoned.
pub trait SavePrompt {
    /// Asked before every loaded scene is replaced.
    fn save_current_modified_scenes(&mut self, dirty: &[SceneInfo]) -> bool;

    /// Asked before the given scenes are closed.
    fn save_modified_scenes(&mut self, scenes: &[SceneInfo]) -> bool;
}

/// Prompt that always proceeds without saving, for headless tools.
#[derive(Debug, Default, Clone, Copy)]
pub struct DiscardChanges;

impl SavePrompt for DiscardChanges {
    fn save_current_modified_scenes(&mut self, _dirty: &[SceneInfo]) -> bool {
        true
    }

    fn save_modified_scenes(&mut self, _scenes: &[SceneInfo]) -> bool {
        true
    }
}

//=== Commands ============================================================

/// Opens `scene` in place of every loaded scene.
///
/// Returns `Ok(false)` when the save prompt was cancelled.
pub fn save_and_load_scene<H, P>(host: &mut H, prompt: &mut P, scene: &str) -> Result<bool, HostError>
where
    H: SceneHost + ?Sized,
    P: SavePrompt + ?Sized,
{
    if !host.is_playing() {
        let dirty = dirty_scenes(host);
        if !prompt.save_current_modified_scenes(&dirty) {
            debug!("Opening '{}' cancelled", scene);
            return Ok(false);
        }
    }

    host.load_scene(scene, LoadSceneMode::Single)?;
    info!("Opened '{}'", scene);
    Ok(true)
}

/// Opens `scene` next to the loaded ones.
pub fn add_scene<H: SceneHost + ?Sized>(host: &mut H, scene: &str) -> Result<(), HostError> {
    host.load_scene(scene, LoadSceneMode::Additive)
}

/// Closes `scene` if it is loaded.
///
/// Returns `Ok(false)` when it was not loaded or the save prompt was
/// cancelled.
pub fn save_and_close_scene<H, P>(host: &mut H, prompt: &mut P, scene: &str) -> Result<bool, HostError>
where
    H: SceneHost + ?Sized,
    P: SavePrompt + ?Sized,
{
    let info = host.get_scene_by_name(scene);
    if !info.is_loaded {
        return Ok(false);
    }

    if !host.is_playing() && !prompt.save_modified_scenes(std::slice::from_ref(&info)) {
        debug!("Closing '{}' cancelled", scene);
        return Ok(false);
    }

    host.unload_scene_async(scene)?;
    Ok(true)
}

/// Opens `scene` to enter play mode with it.
///
/// Returns whether the caller should now enter play mode.
pub fn play_scene<H, P>(host: &mut H, prompt: &mut P, scene: &str) -> Result<bool, HostError>
where
    H: SceneHost + ?Sized,
    P: SavePrompt + ?Sized,
{
    if host.is_playing() {
        return Ok(false);
    }
    save_and_load_scene(host, prompt, scene)
}

fn dirty_scenes<H: SceneHost + ?Sized>(host: &H) -> Vec<SceneInfo> {
    (0..host.scene_count())
        .filter_map(|index| host.scene_at(index))
        .filter(|scene| scene.is_dirty)
        .collect()
}

//=== Tests ===============================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::host::SimulatedHost;

    /// Records what it was asked and answers with `accept`.
    #[derive(Default)]
    struct ScriptedPrompt {
        accept: bool,
        asked: Vec<Vec<String>>,
    }

    impl ScriptedPrompt {
        fn answering(accept: bool) -> Self {
            Self {
                accept,
                asked: Vec::new(),
            }
        }

        fn record(&mut self, scenes: &[SceneInfo]) -> bool {
            self.asked.push(scenes.iter().map(|s| s.name.clone()).collect());
            self.accept
        }
    }

    impl SavePrompt for ScriptedPrompt {
        fn save_current_modified_scenes(&mut self, dirty: &[SceneInfo]) -> bool {
            self.record(dirty)
        }

        fn save_modified_scenes(&mut self, scenes: &[SceneInfo]) -> bool {
            self.record(scenes)
        }
    }

    fn editing_host() -> SimulatedHost {
        let mut host = SimulatedHost::new()
            .with_scene("Menu", 0.0)
            .with_scene("Level1", 0.0)
            .with_scene("Hud", 0.0);
        host.set_playing(false);
        host.load_scene("Menu", LoadSceneMode::Single).unwrap();
        host.load_scene("Hud", LoadSceneMode::Additive).unwrap();
        host.mark_dirty("Hud", true).unwrap();
        host
    }

    #[test]
    fn load_asks_about_dirty_scenes_in_edit_mode() {
        let mut host = editing_host();
        let mut prompt = ScriptedPrompt::answering(true);

        assert!(save_and_load_scene(&mut host, &mut prompt, "Level1").unwrap());
        assert_eq!(prompt.asked, vec![vec!["Hud".to_string()]]);
        assert_eq!(host.loaded_scenes(), vec!["Level1"]);
    }

    #[test]
    fn cancelled_prompt_keeps_scenes() {
        let mut host = editing_host();
        let mut prompt = ScriptedPrompt::answering(false);

        assert!(!save_and_load_scene(&mut host, &mut prompt, "Level1").unwrap());
        assert!(!save_and_close_scene(&mut host, &mut prompt, "Hud").unwrap());
        assert_eq!(host.loaded_scenes(), vec!["Menu", "Hud"]);
    }

    #[test]
    fn play_mode_skips_the_prompt() {
        let mut host = editing_host();
        host.set_playing(true);
        let mut prompt = ScriptedPrompt::answering(false);

        assert!(save_and_load_scene(&mut host, &mut prompt, "Level1").unwrap());
        assert!(prompt.asked.is_empty());

        add_scene(&mut host, "Hud").unwrap();
        assert!(save_and_close_scene(&mut host, &mut prompt, "Hud").unwrap());
        assert_eq!(host.loaded_scenes(), vec!["Level1"]);
    }

    #[test]
    fn closing_asks_only_about_that_scene() {
        let mut host = editing_host();
        let mut prompt = ScriptedPrompt::answering(true);

        assert!(save_and_close_scene(&mut host, &mut prompt, "Menu").unwrap());
        assert_eq!(prompt.asked, vec![vec!["Menu".to_string()]]);
        assert_eq!(host.loaded_scenes(), vec!["Hud"]);
    }

    #[test]
    fn closing_an_unloaded_scene_does_nothing() {
        let mut host = editing_host();
        let mut prompt = ScriptedPrompt::default();

        assert!(!save_and_close_scene(&mut host, &mut prompt, "Level1").unwrap());
        assert!(prompt.asked.is_empty());
    }

    #[test]
    fn play_only_from_edit_mode() {
        let mut host = editing_host();
        assert!(play_scene(&mut host, &mut DiscardChanges, "Level1").unwrap());

        host.set_playing(true);
        assert!(!play_scene(&mut host, &mut DiscardChanges, "Menu").unwrap());
        assert_eq!(host.loaded_scenes(), vec!["Level1"]);
    }

    #[test]
    fn unknown_scene_is_a_host_error() {
        let mut host = editing_host();
        let result = add_scene(&mut host, "Missing");
        assert_eq!(result, Err(HostError::UnknownScene("Missing".into())));
    }
}
