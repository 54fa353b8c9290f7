//=========================================================================
// Host Scene Interface
//=========================================================================
//
// Contract between the sequencing core and the engine that owns scenes.
//
// The core never loads anything itself. It asks the host to load, waits
// for the host's scene-loaded notifications, and polls the progress of
// deferred loads once per frame.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use super::notifications::{SceneLoadedSubscription, SubscriptionId};

//=== LoadSceneMode =======================================================

/// How a loaded scene is combined with the scenes already loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LoadSceneMode {
    /// Unloads every loaded scene and replaces them with the new one.
    #[default]
    Single,

    /// Adds the scene next to the ones already loaded.
    Additive,
}

//=== SceneLoaded =========================================================

/// Notification emitted by the host after a scene finished loading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneLoaded {
    /// Name of the scene that became loaded.
    pub scene: String,

    /// Mode the scene was loaded with.
    pub mode: LoadSceneMode,
}

impl SceneLoaded {
    pub fn new(scene: impl Into<String>, mode: LoadSceneMode) -> Self {
        Self {
            scene: scene.into(),
            mode,
        }
    }
}

//=== SceneInfo ===========================================================

/// Snapshot of a scene as the host sees it.
///
/// Querying a scene that is not loaded yields an info with
/// `is_loaded == false`, the same way an engine returns an invalid scene.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneInfo {
    pub name: String,
    pub is_loaded: bool,
    pub is_dirty: bool,
}

impl SceneInfo {
    /// Info for a scene that is not currently loaded.
    pub fn not_loaded(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_loaded: false,
            is_dirty: false,
        }
    }
}

//=== AsyncLoadId =========================================================

/// Identifies an asynchronous load issued through [`SceneHost::load_scene_async`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AsyncLoadId(u64);

impl AsyncLoadId {
    /// Wraps a host-assigned operation number.
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

//=== HostError ===========================================================

/// Errors raised by the host scene API.
///
/// The core does not validate scene names itself; whatever the host
/// reports is propagated untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostError {
    /// No scene with this name is registered in the host.
    UnknownScene(String),

    /// The asynchronous load does not exist or already finished.
    UnknownOperation(AsyncLoadId),

    /// The scene must be loaded for this operation.
    SceneNotLoaded(String),
}

impl std::fmt::Display for HostError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownScene(name) => write!(f, "Scene '{}' is not registered in the host", name),
            Self::UnknownOperation(id) => write!(f, "Async load {:?} does not exist", id),
            Self::SceneNotLoaded(name) => write!(f, "Scene '{}' is not loaded", name),
        }
    }
}

impl std::error::Error for HostError {}

//=== SceneHost Trait =====================================================

/// Scene-management primitives provided by the host engine.
///
/// Implementations are driven from a single frame loop. Notifications are
/// delivered through subscriptions and read by their owners during their
/// own update, never from inside a host call.
pub trait SceneHost {
    /// Called once at the start of every frame, before any core system runs.
    ///
    /// Hosts that advance on their own can ignore it.
    fn begin_frame(&mut self, _dt: f32) {}

    /// Loads a scene immediately.
    fn load_scene(&mut self, name: &str, mode: LoadSceneMode) -> Result<(), HostError>;

    /// Starts loading a scene in the background, replacing all loaded scenes
    /// once activated.
    ///
    /// With `allow_activation == false` the host prepares the scene but only
    /// switches to it after [`SceneHost::allow_activation`] is called.
    fn load_scene_async(&mut self, name: &str, allow_activation: bool)
        -> Result<AsyncLoadId, HostError>;

    /// Progress of an asynchronous load in `[0, 1]`.
    ///
    /// A deferred load stops at `0.9` until activation is allowed.
    /// Returns `None` for unknown operations.
    fn load_progress(&self, op: AsyncLoadId) -> Option<f32>;

    /// Lets a deferred load switch to its scene.
    fn allow_activation(&mut self, op: AsyncLoadId) -> Result<(), HostError>;

    /// Unloads a loaded scene.
    fn unload_scene_async(&mut self, name: &str) -> Result<(), HostError>;

    /// Registers a new scene-loaded listener.
    fn subscribe(&mut self) -> SceneLoadedSubscription;

    /// Removes a listener. Returns `false` if it was not registered.
    fn unsubscribe(&mut self, id: SubscriptionId) -> bool;

    /// Number of registered scene-loaded listeners.
    fn subscriber_count(&self) -> usize;

    /// Looks a scene up by name.
    fn get_scene_by_name(&self, name: &str) -> SceneInfo;

    /// Number of loaded scenes.
    fn scene_count(&self) -> usize;

    /// Loaded scene at `index`, in load order.
    fn scene_at(&self, index: usize) -> Option<SceneInfo>;

    /// Name of the active scene (the first loaded one).
    fn active_scene(&self) -> Option<String> {
        self.scene_at(0).map(|scene| scene.name)
    }

    /// Whether the host is running the game rather than editing it.
    fn is_playing(&self) -> bool {
        true
    }
}

//=== Tests ===============================================================
