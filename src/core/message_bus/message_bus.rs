//=========================================================================
// Message Bus
//=========================================================================
//
// Typed multi-consumer queues, one per message type.
//
// Architecture:
//   scripts ──push<SceneRequest>()──> HashMap<TypeId, Vec<M>>
//                                          ↓
//   runtime ──take<SceneRequest>()──> applied at the tick boundary
//
//   runtime ──push<SceneLoaded>()──> read<SceneLoaded>() by any script
//                                          ↓
//   runtime ──clear<SceneLoaded>()── end of frame
//
//=========================================================================

//=== External Dependencies ===============================================

use std::any::TypeId;
use std::collections::HashMap;

//=== Internal Dependencies ===============================================

use super::message_queue::MessageQueue;

//=== Public API ==========================================================

/// Marker trait for types that can travel on the [`MessageBus`].
pub trait Message: 'static {}

impl<T: 'static> Message for T {}

//=========================================================================

/// Typed message queues shared by scripts and the runtime.
#[derive(Default)]
pub struct MessageBus {
    queues: HashMap<TypeId, Box<dyn MessageQueue>>,
}

impl MessageBus {
    pub fn new() -> Self {
        Self::default()
    }

    //--- Message Operations -----------------------------------------------

    /// Queues a message.
    pub fn push<M: Message>(&mut self, msg: M) {
        let queue = self
            .queues
            .entry(TypeId::of::<M>())
            .or_insert_with(|| Box::new(Vec::<M>::new()));

        if let Some(queue) = queue.as_any_mut().downcast_mut::<Vec<M>>() {
            queue.push(msg);
        }
    }

    /// All queued messages of type `M`, oldest first.
    ///
    /// Reading does not consume; every consumer of the frame sees the same
    /// messages until they are cleared or taken.
    pub fn read<M: Message>(&self) -> &[M] {
        self.queue::<M>().map(|v| v.as_slice()).unwrap_or(&[])
    }

    /// Removes and returns all queued messages of type `M`.
    pub fn take<M: Message>(&mut self) -> Vec<M> {
        self.queues
            .get_mut(&TypeId::of::<M>())
            .and_then(|q| q.as_any_mut().downcast_mut::<Vec<M>>())
            .map(std::mem::take)
            .unwrap_or_default()
    }

    //--- Query API --------------------------------------------------------

    pub fn has_messages<M: Message>(&self) -> bool {
        self.count::<M>() > 0
    }

    pub fn count<M: Message>(&self) -> usize {
        self.queue::<M>().map(|v| v.len()).unwrap_or(0)
    }

    //--- Clearing ---------------------------------------------------------

    /// Clears messages of type `M`, keeping the allocation for the next frame.
    pub fn clear<M: Message>(&mut self) {
        if let Some(queue) = self.queues.get_mut(&TypeId::of::<M>()) {
            queue.clear_queue();
        }
    }

    /// Clears every queue.
    pub fn clear_all(&mut self) {
        for queue in self.queues.values_mut() {
            queue.clear_queue();
        }
    }

    /// Total number of queued messages across all types.
    pub fn total(&self) -> usize {
        self.queues.values().map(|q| q.len()).sum()
    }

    //--- Internal Helpers -------------------------------------------------

    fn queue<M: Message>(&self) -> Option<&Vec<M>> {
        self.queues
            .get(&TypeId::of::<M>())
            .and_then(|q| q.as_any().downcast_ref::<Vec<M>>())
    }
}

impl std::fmt::Debug for MessageBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MessageBus")
            .field("queues", &self.queues.len())
            .field("messages", &self.total())
            .finish()
    }
}

//=========================================================================
// Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::host::{LoadSceneMode, SceneLoaded};

    #[derive(Debug, PartialEq)]
    struct Unload(&'static str);

    #[test]
    fn new_bus_is_empty() {
        let bus = MessageBus::new();
        assert!(!bus.has_messages::<SceneLoaded>());
        assert!(bus.read::<SceneLoaded>().is_empty());
        assert_eq!(bus.total(), 0);
    }

    #[test]
    fn messages_are_read_in_push_order_without_consuming() {
        let mut bus = MessageBus::new();
        bus.push(SceneLoaded::new("Loading", LoadSceneMode::Single));
        bus.push(SceneLoaded::new("Level1", LoadSceneMode::Single));

        let first_reader = bus.read::<SceneLoaded>();
        assert_eq!(first_reader[0].scene, "Loading");
        assert_eq!(first_reader[1].scene, "Level1");

        assert_eq!(bus.read::<SceneLoaded>().len(), 2);
        assert_eq!(bus.count::<SceneLoaded>(), 2);
    }

    #[test]
    fn types_have_separate_queues() {
        let mut bus = MessageBus::new();
        bus.push(Unload("Hud"));
        bus.push(SceneLoaded::new("Menu", LoadSceneMode::Additive));

        assert_eq!(bus.count::<Unload>(), 1);
        assert_eq!(bus.count::<SceneLoaded>(), 1);

        bus.clear::<SceneLoaded>();
        assert_eq!(bus.count::<Unload>(), 1);
        assert_eq!(bus.count::<SceneLoaded>(), 0);
    }

    #[test]
    fn take_drains_only_that_type() {
        let mut bus = MessageBus::new();
        bus.push(Unload("Hud"));
        bus.push(Unload("Menu"));
        bus.push(SceneLoaded::new("Menu", LoadSceneMode::Single));

        assert_eq!(bus.take::<Unload>(), vec![Unload("Hud"), Unload("Menu")]);
        assert!(bus.take::<Unload>().is_empty());
        assert_eq!(bus.count::<SceneLoaded>(), 1);
    }

    #[test]
    fn clear_all_then_reuse() {
        let mut bus = MessageBus::new();
        bus.push(Unload("Hud"));
        bus.push(SceneLoaded::new("Menu", LoadSceneMode::Single));

        bus.clear_all();
        assert_eq!(bus.total(), 0);

        bus.push(Unload("Menu"));
        assert_eq!(bus.read::<Unload>(), &[Unload("Menu")]);
    }
}
