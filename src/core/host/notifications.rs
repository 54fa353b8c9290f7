//=========================================================================
// Scene-Loaded Notifications
//=========================================================================
//
// Subscription list for scene-loaded notifications.
//
// Architecture:
//   host load ──> SceneLoadedHub::broadcast()
//                     ├─ Sender ──> subscription A (sequencer)
//                     ├─ Sender ──> subscription B (handle transition)
//                     └─ Sender ──> subscription C (runtime dispatch)
//
// Each subscriber drains its own receiver during its update, so a
// notification is never handled re-entrantly from inside a host call.
// Unsubscribing drops the sender; receivers that were dropped without
// unsubscribing are pruned on the next broadcast.
//
//=========================================================================

//=== External Dependencies ===============================================

use crossbeam_channel::{unbounded, Receiver, Sender};
use log::debug;

//=== Internal Dependencies ===============================================

use super::SceneLoaded;

//=== SubscriptionId ======================================================

/// Identifies one scene-loaded listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

//=== SceneLoadedSubscription =============================================

/// Receiving end of a scene-loaded listener.
///
/// The owner must hand the id back to the host with
/// [`crate::core::host::SceneHost::unsubscribe`] once it is done listening.
#[derive(Debug)]
pub struct SceneLoadedSubscription {
    id: SubscriptionId,
    receiver: Receiver<SceneLoaded>,
}

impl SceneLoadedSubscription {
    pub fn new(id: SubscriptionId, receiver: Receiver<SceneLoaded>) -> Self {
        Self { id, receiver }
    }

    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Takes every notification received since the last call.
    pub fn drain(&self) -> Vec<SceneLoaded> {
        self.receiver.try_iter().collect()
    }

    /// Returns true if notifications are waiting.
    pub fn has_pending(&self) -> bool {
        !self.receiver.is_empty()
    }
}

//=== SceneLoadedHub ======================================================

/// Process-wide list of scene-loaded listeners owned by a host.
#[derive(Debug, Default)]
pub struct SceneLoadedHub {
    next_id: u64,
    senders: Vec<(SubscriptionId, Sender<SceneLoaded>)>,
}

impl SceneLoadedHub {
    pub fn new() -> Self {
        Self::default()
    }

    //--- Registration -----------------------------------------------------

    /// Registers a new listener.
    pub fn subscribe(&mut self) -> SceneLoadedSubscription {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;

        let (sender, receiver) = unbounded();
        self.senders.push((id, sender));

        debug!("Scene-loaded listener {:?} registered", id);
        SceneLoadedSubscription::new(id, receiver)
    }

    /// Removes a listener. Returns `false` if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.senders.len();
        self.senders.retain(|(existing, _)| *existing != id);

        let removed = self.senders.len() != before;
        if removed {
            debug!("Scene-loaded listener {:?} removed", id);
        }
        removed
    }

    //--- Delivery ---------------------------------------------------------

    /// Sends a notification to every listener.
    pub fn broadcast(&mut self, event: SceneLoaded) {
        self.senders.retain(|(id, sender)| {
            let delivered = sender.send(event.clone()).is_ok();
            if !delivered {
                debug!("Pruning disconnected scene-loaded listener {:?}", id);
            }
            delivered
        });
    }

    /// Number of registered listeners.
    pub fn len(&self) -> usize {
        self.senders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.senders.is_empty()
    }
}

//=== Tests ===============================================================
