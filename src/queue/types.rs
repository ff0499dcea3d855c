//! Type definitions for the queue system

/// Result of copying one message into a caller buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dequeued {
    /// Sequence number of the removed message
    pub sequence: u64,
    /// Payload bytes written into the buffer
    pub written: usize,
    /// The payload was longer than the buffer and was cut short
    pub truncated: bool,
    /// A NUL byte follows the payload inside the buffer
    pub terminated: bool,
}

/// Point-in-time counters for a queue
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueStats {
    /// Messages currently held
    pub depth: usize,
    /// Payload bytes currently held
    pub payload_bytes: usize,
    /// Messages accepted since creation
    pub enqueued_total: u64,
    /// Messages removed since creation
    pub dequeued_total: u64,
    pub closed: bool,
}
