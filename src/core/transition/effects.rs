//=========================================================================
// Effect Registry
//=========================================================================
//
// Owns every live transition effect, tagged with the scene it belongs to.
//
// Effects are spawned by scene content, despawned together with their
// scene, and looked up by id or discovered by selector. Callers that want
// an effect pass the registry explicitly instead of scanning the scene.
//
// Frame update:
//   advance(dt) ──> effect.advance(dt) for every effect
//                      └─ due completions collected
//               ──> completions invoked after the loop
//
//=========================================================================

//=== External Dependencies ===============================================

use log::debug;

//=== Internal Dependencies ===============================================

use super::{Completion, TransitionEffect};

//=== EffectId ============================================================

/// Identifies a spawned transition effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EffectId(u64);

//=== EffectSelector ======================================================

/// How a caller picks the effect to play.
#[derive(Debug, Clone, Copy, Default)]
pub enum EffectSelector {
    /// A specific effect. Falls back to discovery once it has been despawned.
    Explicit(EffectId),

    /// The first active effect in any loaded scene.
    #[default]
    Discover,

    /// Caller-provided lookup.
    Custom(fn(&Effects) -> Option<EffectId>),
}

impl EffectSelector {
    /// Resolves the selector against the live effects.
    pub fn resolve(&self, effects: &Effects) -> Option<EffectId> {
        match *self {
            Self::Explicit(id) if effects.contains(id) => Some(id),
            Self::Explicit(_) | Self::Discover => effects.find_active(),
            Self::Custom(lookup) => lookup(effects),
        }
    }
}

//=== Effects =============================================================

#[derive(Debug)]
struct Entry {
    id: EffectId,
    scene: String,
    effect: TransitionEffect,
}

/// Registry of live transition effects.
#[derive(Debug, Default)]
pub struct Effects {
    next_id: u64,
    entries: Vec<Entry>,
}

impl Effects {
    pub fn new() -> Self {
        Self::default()
    }

    //--- Spawning ---------------------------------------------------------

    /// Adds an effect owned by `scene`.
    pub fn spawn(&mut self, scene: impl Into<String>, effect: TransitionEffect) -> EffectId {
        let id = EffectId(self.next_id);
        self.next_id += 1;

        let scene = scene.into();
        debug!("Spawned transition effect {:?} in scene '{}'", id, scene);
        self.entries.push(Entry { id, scene, effect });
        id
    }

    /// Removes a single effect, dropping any pending completion.
    pub fn despawn(&mut self, id: EffectId) -> Option<TransitionEffect> {
        let index = self.entries.iter().position(|entry| entry.id == id)?;
        Some(self.entries.remove(index).effect)
    }

    /// Removes every effect owned by `scene`. Returns how many were removed.
    pub fn despawn_scene(&mut self, scene: &str) -> usize {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.scene != scene);

        let removed = before - self.entries.len();
        if removed > 0 {
            debug!("Despawned {} transition effect(s) with scene '{}'", removed, scene);
        }
        removed
    }

    //--- Lookup -----------------------------------------------------------

    pub fn contains(&self, id: EffectId) -> bool {
        self.entries.iter().any(|entry| entry.id == id)
    }

    pub fn get(&self, id: EffectId) -> Option<&TransitionEffect> {
        self.entries
            .iter()
            .find(|entry| entry.id == id)
            .map(|entry| &entry.effect)
    }

    pub fn get_mut(&mut self, id: EffectId) -> Option<&mut TransitionEffect> {
        self.entries
            .iter_mut()
            .find(|entry| entry.id == id)
            .map(|entry| &mut entry.effect)
    }

    /// Scene owning the effect.
    pub fn scene_of(&self, id: EffectId) -> Option<&str> {
        self.entries
            .iter()
            .find(|entry| entry.id == id)
            .map(|entry| entry.scene.as_str())
    }

    /// First active effect, in spawn order.
    pub fn find_active(&self) -> Option<EffectId> {
        self.entries
            .iter()
            .find(|entry| entry.effect.is_active())
            .map(|entry| entry.id)
    }

    /// First active effect owned by `scene`.
    pub fn find_active_in(&self, scene: &str) -> Option<EffectId> {
        self.entries
            .iter()
            .find(|entry| entry.scene == scene && entry.effect.is_active())
            .map(|entry| entry.id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    //--- Frame Update -----------------------------------------------------

    /// Advances every effect by one frame and runs due completions.
    pub fn advance(&mut self, dt: f32) {
        let completed: Vec<Completion> = self
            .entries
            .iter_mut()
            .filter_map(|entry| entry.effect.advance(dt))
            .collect();

        for callback in completed {
            callback();
        }
    }
}

//=== Tests ===============================================================
