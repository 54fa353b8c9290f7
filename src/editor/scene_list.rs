//=========================================================================
// Scene List
//=========================================================================
//
// Row model of the scene browser: every known scene grouped under its
// directory, with what each button may do right now.
//
// Rows:
//   Directory { label, is_open }
//     Scene { display_name, button_label, loaded, can_load, ... }
//     ...
//   Directory { .. }   (closed: its scenes are not listed)
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::BTreeMap;

//=== Internal Dependencies ===============================================

use super::FoldPreferences;
use crate::core::host::SceneHost;
use crate::core::scene::SceneHandle;

/// Prefix stripped from directory labels.
const ASSETS_ROOT: &str = "Assets/";

//=== SceneListRow ========================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SceneListRow {
    Directory {
        /// Directory path, as stored in the fold preferences.
        dir: String,
        label: String,
        is_open: bool,
    },
    Scene(SceneRow),
}

/// One scene and the state of its buttons.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneRow {
    pub name: String,
    /// Name with a `*` when the scene has unsaved changes.
    pub display_name: String,
    pub button_label: String,
    /// Highlighted in the list.
    pub loaded: bool,
    pub can_load: bool,
    /// Add when unloaded, close when loaded.
    pub can_add_or_close: bool,
    pub can_play: bool,
}

//=== SceneList ===========================================================

/// Scene handles grouped by directory.
#[derive(Debug, Clone, Default)]
pub struct SceneList {
    by_dir: BTreeMap<String, Vec<SceneHandle>>,
}

impl SceneList {
    pub fn new<I>(scenes: I) -> Self
    where
        I: IntoIterator<Item = SceneHandle>,
    {
        let mut list = Self::default();
        list.refresh(scenes);
        list
    }

    /// Regroups the list, as after the project's assets changed.
    pub fn refresh<I>(&mut self, scenes: I)
    where
        I: IntoIterator<Item = SceneHandle>,
    {
        self.by_dir.clear();
        for scene in scenes.into_iter().filter(SceneHandle::is_configured) {
            self.by_dir
                .entry(directory_of(scene.path()).to_string())
                .or_default()
                .push(scene);
        }
    }

    pub fn directories(&self) -> impl Iterator<Item = &str> {
        self.by_dir.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.by_dir.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.by_dir.is_empty()
    }

    /// Rows to draw this frame.
    pub fn rows<H: SceneHost + ?Sized>(&self, host: &H, prefs: &mut FoldPreferences) -> Vec<SceneListRow> {
        let only_scene = host.scene_count() == 1;
        let can_play = !host.is_playing();
        let mut rows = Vec::new();

        for (dir, scenes) in &self.by_dir {
            let is_open = prefs.is_dir_open(dir);
            rows.push(SceneListRow::Directory {
                dir: dir.clone(),
                label: dir.strip_prefix(ASSETS_ROOT).unwrap_or(dir).to_string(),
                is_open,
            });
            if !is_open {
                continue;
            }

            for scene in scenes {
                let info = host.get_scene_by_name(scene.name());
                let locked = info.is_loaded && only_scene;
                rows.push(SceneListRow::Scene(SceneRow {
                    name: scene.name().to_string(),
                    display_name: if info.is_dirty {
                        format!("{}*", scene.name())
                    } else {
                        scene.name().to_string()
                    },
                    button_label: format!("{}     ({})", scene.name(), scene.path()),
                    loaded: info.is_loaded,
                    can_load: !locked,
                    can_add_or_close: !locked,
                    can_play,
                }));
            }
        }
        rows
    }
}

fn directory_of(path: &str) -> &str {
    path.rfind('/').map_or("", |i| &path[..i])
}

//=== Tests ===============================================================
