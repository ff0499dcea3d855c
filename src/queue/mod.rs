//! Thread-safe FIFO Queue Component
//!
//! An unbounded first-in-first-out queue of text messages shared between a
//! producer and a background consumer.
//!
//! # Overview
//!
//! - **Singly-linked chain**: `head` is the next message out, `tail` the most
//!   recently appended one, so both ends are O(1)
//! - **One lock per queue**: every structural update runs under the queue's
//!   own mutex and is atomic to concurrent callers
//! - **Owned copies**: `enqueue` copies the caller's text; `dequeue` copies it
//!   back out and frees the node
//! - **Empty is not an error**: dequeuing from an empty queue succeeds and
//!   reports that nothing was available
//! - **Blocking consumers**: `wait_pop` suspends until data arrives or the
//!   queue is closed
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐  enqueue   ┌──────────────────────────────────────┐
//! │   Producer   │ ─────────► │ MessageQueue            Mutex+Condvar │
//! └──────────────┘            │  head ─► [n1] ─► [n2] ─► [n3] ◄─ tail │
//!                             └──────────────────┬───────────────────┘
//!                                                │ dequeue / wait_pop
//!                                                ▼
//!                                        ┌──────────────┐
//!                                        │    Worker    │
//!                                        └──────────────┘
//! ```
//!
//! # Example Usage
//!
//! ```rust
//! use threadtest::queue::MessageQueue;
//! use std::sync::Arc;
//! use std::thread;
//!
//! let queue = Arc::new(MessageQueue::new("main"));
//!
//! let producer = {
//!     let queue = Arc::clone(&queue);
//!     thread::spawn(move || {
//!         for i in 0..=10 {
//!             queue.enqueue(&format!("TestMessage: {}", i)).unwrap();
//!         }
//!     })
//! };
//! producer.join().unwrap();
//!
//! let mut received = Vec::new();
//! while let Some(message) = queue.pop().unwrap() {
//!     received.push(message.into_text());
//! }
//! assert_eq!(received.len(), 11);
//! assert_eq!(received[0], "TestMessage: 0");
//! ```

pub mod api;
mod error;
mod internal;
mod message;
mod message_queue;
mod types;

pub use error::{QueueError, QueueResult};
pub use message::{Message, MessageHeader};
pub use message_queue::MessageQueue;
pub use types::{Dequeued, QueueStats};

#[cfg(test)]
mod tests;
