//=========================================================================
// Simulated Host
//=========================================================================
//
// In-memory implementation of the host scene API.
//
// Scenes are registered up front with the time they take to load in the
// background. Immediate loads complete inside the call; asynchronous loads
// advance in `begin_frame()` and activate on the first frame after they are
// both ready and allowed to.
//
// Frame order:
//   begin_frame(dt)
//     ├─ time += dt
//     ├─ pending loads: elapsed += dt
//     └─ ready && allowed ──> replace loaded scenes ──> broadcast
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::{BTreeMap, HashMap};

use log::{debug, warn};

//=== Internal Dependencies ===============================================

use super::{
    AsyncLoadId, HostError, LoadSceneMode, SceneHost, SceneInfo, SceneLoaded,
    SceneLoadedHub, SceneLoadedSubscription, SubscriptionId,
};

//=== Constants ===========================================================

/// Progress at which a deferred load waits for activation.
pub const READY_TO_ACTIVATE: f32 = 0.9;

//=== Internal Types ======================================================

#[derive(Debug)]
struct LoadedScene {
    name: String,
    dirty: bool,
}

#[derive(Debug)]
struct PendingLoad {
    scene: String,
    elapsed: f32,
    duration: f32,
    allow_activation: bool,
}

impl PendingLoad {
    fn progress(&self) -> f32 {
        if self.duration <= 0.0 {
            return READY_TO_ACTIVATE;
        }
        (self.elapsed / self.duration).min(1.0) * READY_TO_ACTIVATE
    }

    fn is_ready(&self) -> bool {
        self.elapsed >= self.duration
    }
}

//=== SimulatedHost =======================================================

/// Deterministic host scene API for tests, tools and headless runs.
///
/// Notifications, completed loads and activation times are kept until
/// [`clear_history`](Self::clear_history) is called, so long-running hosts
/// should clear them between sessions.
#[derive(Debug)]
pub struct SimulatedHost {
    registry: HashMap<String, f32>,
    loaded: Vec<LoadedScene>,
    pending: BTreeMap<AsyncLoadId, PendingLoad>,
    finished: Vec<AsyncLoadId>,
    activation_requests: HashMap<AsyncLoadId, f32>,
    history: Vec<SceneLoaded>,
    hub: SceneLoadedHub,
    next_op: u64,
    time: f32,
    playing: bool,
}

impl SimulatedHost {
    //--- Construction -----------------------------------------------------

    /// Creates a host with no registered scenes, in play mode.
    pub fn new() -> Self {
        Self {
            registry: HashMap::new(),
            loaded: Vec::new(),
            pending: BTreeMap::new(),
            finished: Vec::new(),
            activation_requests: HashMap::new(),
            history: Vec::new(),
            hub: SceneLoadedHub::new(),
            next_op: 0,
            time: 0.0,
            playing: true,
        }
    }

    /// Registers a scene that takes `load_seconds` to load in the background.
    pub fn with_scene(mut self, name: impl Into<String>, load_seconds: f32) -> Self {
        self.register_scene(name, load_seconds);
        self
    }

    /// Registers a scene that takes `load_seconds` to load in the background.
    pub fn register_scene(&mut self, name: impl Into<String>, load_seconds: f32) {
        let name = name.into();
        if self.registry.insert(name.clone(), load_seconds.max(0.0)).is_some() {
            warn!("Scene '{}' was already registered and has been replaced", name);
        }
    }

    //--- Inspection -------------------------------------------------------

    /// Host time accumulated from `begin_frame()` deltas.
    pub fn time(&self) -> f32 {
        self.time
    }

    /// Names of loaded scenes in load order.
    pub fn loaded_scenes(&self) -> Vec<&str> {
        self.loaded.iter().map(|scene| scene.name.as_str()).collect()
    }

    /// Every scene-loaded notification emitted so far.
    pub fn history(&self) -> &[SceneLoaded] {
        &self.history
    }

    /// Host time at which activation of `op` was allowed.
    pub fn activation_requested_at(&self, op: AsyncLoadId) -> Option<f32> {
        self.activation_requests.get(&op).copied()
    }

    /// Forgets emitted notifications, completed loads and the activation
    /// times of loads no longer in flight.
    ///
    /// `load_progress()` of a forgotten load returns `None` afterwards.
    pub fn clear_history(&mut self) {
        let pending = &self.pending;
        self.activation_requests.retain(|op, _| pending.contains_key(op));
        self.finished.clear();
        self.history.clear();
    }

    /// Number of asynchronous loads still in flight.
    pub fn pending_loads(&self) -> usize {
        self.pending.len()
    }

    //--- Editor State -----------------------------------------------------

    /// Flags a loaded scene as having unsaved changes.
    pub fn mark_dirty(&mut self, name: &str, dirty: bool) -> Result<(), HostError> {
        let scene = self
            .loaded
            .iter_mut()
            .find(|scene| scene.name == name)
            .ok_or_else(|| HostError::SceneNotLoaded(name.to_string()))?;
        scene.dirty = dirty;
        Ok(())
    }

    /// Switches between play mode and edit mode.
    pub fn set_playing(&mut self, playing: bool) {
        self.playing = playing;
    }

    //--- Internal Helpers -------------------------------------------------

    fn ensure_registered(&self, name: &str) -> Result<f32, HostError> {
        self.registry
            .get(name)
            .copied()
            .ok_or_else(|| HostError::UnknownScene(name.to_string()))
    }

    fn complete_load(&mut self, name: &str, mode: LoadSceneMode) {
        match mode {
            LoadSceneMode::Single => self.loaded.clear(),
            LoadSceneMode::Additive => self.loaded.retain(|scene| scene.name != name),
        }
        self.loaded.push(LoadedScene {
            name: name.to_string(),
            dirty: false,
        });

        debug!("Scene '{}' loaded ({:?})", name, mode);

        let event = SceneLoaded::new(name, mode);
        self.history.push(event.clone());
        self.hub.broadcast(event);
    }
}

impl Default for SimulatedHost {
    fn default() -> Self {
        Self::new()
    }
}

//=== SceneHost Implementation ============================================

impl SceneHost for SimulatedHost {
    fn begin_frame(&mut self, dt: f32) {
        self.time += dt;

        for load in self.pending.values_mut() {
            load.elapsed += dt;
        }

        let activating: Vec<AsyncLoadId> = self
            .pending
            .iter()
            .filter(|(_, load)| load.allow_activation && load.is_ready())
            .map(|(&id, _)| id)
            .collect();

        for id in activating {
            if let Some(load) = self.pending.remove(&id) {
                self.finished.push(id);
                self.complete_load(&load.scene, LoadSceneMode::Single);
            }
        }
    }

    fn load_scene(&mut self, name: &str, mode: LoadSceneMode) -> Result<(), HostError> {
        self.ensure_registered(name)?;
        self.complete_load(name, mode);
        Ok(())
    }

    fn load_scene_async(
        &mut self,
        name: &str,
        allow_activation: bool,
    ) -> Result<AsyncLoadId, HostError> {
        let duration = self.ensure_registered(name)?;

        let id = AsyncLoadId::new(self.next_op);
        self.next_op += 1;

        debug!("Async load {:?} of '{}' started ({}s)", id, name, duration);
        self.pending.insert(
            id,
            PendingLoad {
                scene: name.to_string(),
                elapsed: 0.0,
                duration,
                allow_activation,
            },
        );
        if allow_activation {
            self.activation_requests.insert(id, self.time);
        }

        Ok(id)
    }

    fn load_progress(&self, op: AsyncLoadId) -> Option<f32> {
        if let Some(load) = self.pending.get(&op) {
            return Some(load.progress());
        }
        self.finished.contains(&op).then_some(1.0)
    }

    fn allow_activation(&mut self, op: AsyncLoadId) -> Result<(), HostError> {
        let load = self
            .pending
            .get_mut(&op)
            .ok_or(HostError::UnknownOperation(op))?;

        if !load.allow_activation {
            load.allow_activation = true;
            self.activation_requests.insert(op, self.time);
            debug!("Activation of '{}' allowed at {}s", load.scene, self.time);
        }
        Ok(())
    }

    fn unload_scene_async(&mut self, name: &str) -> Result<(), HostError> {
        let index = self
            .loaded
            .iter()
            .position(|scene| scene.name == name)
            .ok_or_else(|| HostError::SceneNotLoaded(name.to_string()))?;

        self.loaded.remove(index);
        debug!("Scene '{}' unloaded", name);
        Ok(())
    }

    fn subscribe(&mut self) -> SceneLoadedSubscription {
        self.hub.subscribe()
    }

    fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.hub.unsubscribe(id)
    }

    fn subscriber_count(&self) -> usize {
        self.hub.len()
    }

    fn get_scene_by_name(&self, name: &str) -> SceneInfo {
        self.loaded
            .iter()
            .find(|scene| scene.name == name)
            .map(|scene| SceneInfo {
                name: scene.name.clone(),
                is_loaded: true,
                is_dirty: scene.dirty,
            })
            .unwrap_or_else(|| SceneInfo::not_loaded(name))
    }

    fn scene_count(&self) -> usize {
        self.loaded.len()
    }

    fn scene_at(&self, index: usize) -> Option<SceneInfo> {
        self.loaded.get(index).map(|scene| SceneInfo {
            name: scene.name.clone(),
            is_loaded: true,
            is_dirty: scene.dirty,
        })
    }

    fn is_playing(&self) -> bool {
        self.playing
    }
}

//=== Tests ===============================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn host() -> SimulatedHost {
        SimulatedHost::new()
            .with_scene("Menu", 0.0)
            .with_scene("Loading", 0.0)
            .with_scene("Level1", 0.5)
    }

    //--- Immediate Loads --------------------------------------------------

    #[test]
    fn single_load_replaces_loaded_scenes() {
        let mut host = host();
        host.load_scene("Menu", LoadSceneMode::Single).unwrap();
        host.load_scene("Loading", LoadSceneMode::Additive).unwrap();
        assert_eq!(host.loaded_scenes(), vec!["Menu", "Loading"]);

        host.load_scene("Level1", LoadSceneMode::Single).unwrap();
        assert_eq!(host.loaded_scenes(), vec!["Level1"]);
        assert_eq!(host.active_scene().as_deref(), Some("Level1"));
    }

    #[test]
    fn unknown_scene_is_rejected() {
        let mut host = host();
        let err = host.load_scene("Nowhere", LoadSceneMode::Single).unwrap_err();
        assert_eq!(err, HostError::UnknownScene("Nowhere".to_string()));
        assert!(host.load_scene_async("Nowhere", false).is_err());
    }

    #[test]
    fn immediate_load_notifies_subscribers() {
        let mut host = host();
        let sub = host.subscribe();

        host.load_scene("Menu", LoadSceneMode::Single).unwrap();

        assert_eq!(sub.drain(), vec![SceneLoaded::new("Menu", LoadSceneMode::Single)]);
        assert_eq!(host.history().len(), 1);
    }

    //--- Deferred Loads ---------------------------------------------------

    #[test]
    fn deferred_load_stops_at_ready_threshold() {
        let mut host = host();
        let op = host.load_scene_async("Level1", false).unwrap();
        assert_eq!(host.load_progress(op), Some(0.0));

        host.begin_frame(0.25);
        let halfway = host.load_progress(op).unwrap();
        assert!((halfway - 0.45).abs() < 1e-6);

        host.begin_frame(0.25);
        host.begin_frame(0.25);
        assert_eq!(host.load_progress(op), Some(READY_TO_ACTIVATE));
        assert!(!host.get_scene_by_name("Level1").is_loaded);
    }

    #[test]
    fn activation_switches_scene_on_next_frame() {
        let mut host = host();
        host.load_scene("Loading", LoadSceneMode::Single).unwrap();
        let sub = host.subscribe();
        let op = host.load_scene_async("Level1", false).unwrap();

        host.begin_frame(0.5);
        assert!(sub.drain().is_empty());

        host.allow_activation(op).unwrap();
        assert_eq!(host.activation_requested_at(op), Some(0.5));
        assert!(sub.drain().is_empty());

        host.begin_frame(0.125);
        assert_eq!(sub.drain(), vec![SceneLoaded::new("Level1", LoadSceneMode::Single)]);
        assert_eq!(host.loaded_scenes(), vec!["Level1"]);
        assert_eq!(host.load_progress(op), Some(1.0));
        assert_eq!(host.pending_loads(), 0);
    }

    #[test]
    fn zero_length_load_is_ready_immediately() {
        let mut host = host();
        let op = host.load_scene_async("Menu", false).unwrap();
        assert_eq!(host.load_progress(op), Some(READY_TO_ACTIVATE));
    }

    #[test]
    fn allowing_unknown_operation_fails() {
        let mut host = host();
        let op = AsyncLoadId::new(42);
        assert_eq!(host.allow_activation(op), Err(HostError::UnknownOperation(op)));
        assert_eq!(host.load_progress(op), None);
    }

    #[test]
    fn clear_history_keeps_loads_in_flight() {
        let mut host = host();
        host.load_scene("Menu", LoadSceneMode::Single).unwrap();
        let done = host.load_scene_async("Loading", true).unwrap();
        host.begin_frame(0.1);
        let running = host.load_scene_async("Level1", true).unwrap();
        assert_eq!(host.history().len(), 2);

        host.clear_history();

        assert!(host.history().is_empty());
        assert_eq!(host.load_progress(done), None);
        assert_eq!(host.activation_requested_at(done), None);
        assert_eq!(host.activation_requested_at(running), Some(0.1));

        host.begin_frame(0.5);
        assert_eq!(host.load_progress(running), Some(1.0));
        assert_eq!(host.history().len(), 1);
        assert_eq!(host.loaded_scenes(), vec!["Level1"]);
    }

    //--- Editor State -----------------------------------------------------

    #[test]
    fn dirty_flag_and_unload() {
        let mut host = host();
        host.load_scene("Menu", LoadSceneMode::Single).unwrap();
        host.mark_dirty("Menu", true).unwrap();
        assert!(host.get_scene_by_name("Menu").is_dirty);

        host.unload_scene_async("Menu").unwrap();
        assert_eq!(host.scene_count(), 0);
        assert!(host.mark_dirty("Menu", true).is_err());
        assert!(host.unload_scene_async("Menu").is_err());
    }
}
