//! Public API for the queue system
//!
//! External modules should import from here rather than from the internal
//! modules.

// Core queue
pub use crate::queue::message_queue::MessageQueue;

// Message types and copy outcomes
pub use crate::queue::message::{Message, MessageHeader};
pub use crate::queue::types::{Dequeued, QueueStats};

// Error handling
pub use crate::queue::error::{QueueError, QueueResult};
