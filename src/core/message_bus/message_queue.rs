//=========================================================================
// Message Queue Trait
//=========================================================================
//
// Type-erased view of a per-type message queue, so queues of different
// message types can share one map.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::any::Any;

//=== Internal Dependencies ===============================================

use super::Message;

//=========================================================================

/// Type-erased queue operations.
pub(super) trait MessageQueue {
    /// Clears all messages while preserving allocated capacity.
    fn clear_queue(&mut self);

    /// Number of queued messages.
    fn len(&self) -> usize;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<M: Message> MessageQueue for Vec<M> {
    fn clear_queue(&mut self) {
        self.clear();
    }

    fn len(&self) -> usize {
        Vec::len(self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
