//! Message Types for the FIFO queue
//!
//! A message is an owned copy of the text handed to `enqueue`, plus a header
//! filled in by the queue. The queue never keeps a reference to caller
//! memory.

use crate::queue::error::{QueueError, QueueResult};
use crate::queue::types::Dequeued;
use std::time::SystemTime;

/// Header information populated when a message is enqueued
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageHeader {
    /// Per-queue sequence number, starting at 1
    pub sequence: u64,
    /// Time the message was appended to the queue
    pub enqueued_at: SystemTime,
}

/// A queued text payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub header: MessageHeader,
    text: String,
}

impl Message {
    /// Copy `text` into a new message
    ///
    /// Payloads must fit the NUL-terminated destination contract of
    /// [`MessageQueue::dequeue`](crate::queue::MessageQueue::dequeue), so an
    /// interior NUL byte is rejected. The copy reserves its memory fallibly.
    pub(crate) fn copy_from(text: &str, sequence: u64) -> QueueResult<Self> {
        if let Some(position) = text.bytes().position(|b| b == 0) {
            return Err(QueueError::invalid_argument(format!(
                "message text contains a NUL byte at offset {}",
                position
            )));
        }

        let mut owned = reserve_text(text.len())?;
        owned.push_str(text);

        Ok(Self {
            header: MessageHeader {
                sequence,
                enqueued_at: SystemTime::now(),
            },
            text: owned,
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn sequence(&self) -> u64 {
        self.header.sequence
    }

    /// Payload length in bytes
    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn into_text(self) -> String {
        self.text
    }

    /// Copy the payload into a fixed destination with `strncpy` semantics
    ///
    /// Exactly `min(len, out.len())` payload bytes are written and the rest
    /// of `out` is zero-filled. Nothing is written past `out.len()`. When the
    /// payload is as long as the buffer or longer, no terminator fits, and
    /// the returned [`Dequeued`] says so.
    pub(crate) fn copy_into(&self, out: &mut [u8]) -> Dequeued {
        let bytes = self.text.as_bytes();
        let written = bytes.len().min(out.len());

        out[..written].copy_from_slice(&bytes[..written]);
        out[written..].fill(0);

        Dequeued {
            sequence: self.header.sequence,
            written,
            truncated: bytes.len() > out.len(),
            terminated: bytes.len() < out.len(),
        }
    }
}

// The only source of `AllocationFailure`
fn reserve_text(requested: usize) -> QueueResult<String> {
    let mut owned = String::new();
    owned
        .try_reserve_exact(requested)
        .map_err(|e| QueueError::AllocationFailure {
            requested,
            reason: e.to_string(),
        })?;
    Ok(owned)
}
