//=========================================================================
// Message Bus
//=========================================================================
//
// Per-frame queues through which scene scripts talk to the runtime.
//
// Scripts push `SceneRequest`s; the runtime applies them at the next tick
// boundary. The runtime publishes `SceneLoaded` notifications for scripts
// to read during the frame they arrived in.
//
//=========================================================================

//=== Module Declarations =================================================

mod message_bus;
mod message_queue;

//=== Public API ==========================================================

pub use message_bus::{Message, MessageBus};
