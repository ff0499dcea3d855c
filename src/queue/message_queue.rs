//! Thread-safe FIFO message queue
//!
//! One mutex guards the whole node chain of a queue instance; every
//! structural read or write happens with it held, and nothing sleeps, logs
//! or performs I/O inside the critical section. A condition variable tied to
//! the same mutex lets consumers block until a message arrives or the queue
//! is closed; a second one wakes pollers sleeping until close.

use crate::core::sync::handle_mutex_poison;
use crate::queue::error::{QueueError, QueueResult};
use crate::queue::internal::NodeChain;
use crate::queue::message::Message;
use crate::queue::types::{Dequeued, QueueStats};
use std::fmt::Write as _;
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError, TryLockError};
use std::time::Duration;

#[derive(Debug)]
struct QueueState {
    chain: NodeChain,
    next_sequence: u64,
    enqueued_total: u64,
    dequeued_total: u64,
    closed: bool,
}

/// Unbounded FIFO queue of text messages
///
/// Share it between threads with `Arc<MessageQueue>`. Every queue owns its
/// own lock, so unrelated queues never contend.
///
/// # Example
///
/// ```rust
/// use threadtest::queue::MessageQueue;
///
/// let queue = MessageQueue::new("main");
/// queue.enqueue("TestMessage: 0").unwrap();
///
/// let mut buffer = [0u8; 255];
/// let outcome = queue.dequeue(&mut buffer).unwrap().expect("one message");
/// assert_eq!(&buffer[..outcome.written], b"TestMessage: 0");
///
/// // An empty queue is not an error
/// assert!(queue.dequeue(&mut buffer).unwrap().is_none());
/// ```
#[derive(Debug)]
pub struct MessageQueue {
    queue_id: String,
    state: Mutex<QueueState>,
    available: Condvar,
    closed_signal: Condvar,
}

impl MessageQueue {
    pub fn new(queue_id: impl Into<String>) -> Self {
        Self {
            queue_id: queue_id.into(),
            state: Mutex::new(QueueState {
                chain: NodeChain::new(),
                next_sequence: 1,
                enqueued_total: 0,
                dequeued_total: 0,
                closed: false,
            }),
            available: Condvar::new(),
            closed_signal: Condvar::new(),
        }
    }

    pub fn queue_id(&self) -> &str {
        &self.queue_id
    }

    fn lock_state(&self) -> QueueResult<MutexGuard<'_, QueueState>> {
        handle_mutex_poison(self.state.lock(), QueueError::internal)
    }

    // Read-only accessors look through poison rather than fail
    fn peek_state(&self) -> MutexGuard<'_, QueueState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn observe<T>(&self, operation: &str, result: QueueResult<T>) -> QueueResult<T> {
        if let Err(e) = &result {
            e.report(operation, &self.queue_id);
        }
        result
    }

    /// Append a copy of `text` at the tail
    ///
    /// Returns the sequence number assigned to the new message.
    pub fn enqueue(&self, text: &str) -> QueueResult<u64> {
        let result = self.append(text);
        if let Ok(sequence) = &result {
            log::info!(
                "New message queued! (queue: {}, sequence: {})",
                self.queue_id,
                sequence
            );
        }
        self.observe("enqueue", result)
    }

    fn append(&self, text: &str) -> QueueResult<u64> {
        let mut state = self.lock_state()?;
        if state.closed {
            return Err(QueueError::Closed {
                queue_id: self.queue_id.clone(),
            });
        }

        let sequence = state.next_sequence;
        let next_sequence = sequence
            .checked_add(1)
            .ok_or_else(|| QueueError::internal("sequence counter exhausted"))?;
        let message = Message::copy_from(text, sequence)?;

        state.chain.push_back(message);
        state.next_sequence = next_sequence;
        state.enqueued_total += 1;
        drop(state);

        self.available.notify_one();
        Ok(sequence)
    }

    /// Remove the head message, copying its text into `out`
    ///
    /// Returns `Ok(None)` without touching `out` when the queue is empty.
    /// Otherwise exactly `min(len, out.len())` bytes are copied, the rest of
    /// `out` is zero-filled, and the node is freed. The outcome reports
    /// truncation and whether a terminating NUL fit.
    pub fn dequeue(&self, out: &mut [u8]) -> QueueResult<Option<Dequeued>> {
        let result = if out.is_empty() {
            Err(QueueError::invalid_argument(
                "destination buffer has zero capacity",
            ))
        } else {
            self.remove_head_into(out)
        };

        if let Ok(Some(outcome)) = &result {
            log::info!(
                "Message dequeued! (queue: {}, sequence: {}, truncated: {})",
                self.queue_id,
                outcome.sequence,
                outcome.truncated
            );
        }
        self.observe("dequeue", result)
    }

    /// Remove the head message and hand it over whole
    pub fn pop(&self) -> QueueResult<Option<Message>> {
        let result = self.remove_head();
        if let Ok(Some(message)) = &result {
            self.log_removed(message);
        }
        self.observe("pop", result)
    }

    fn remove_head(&self) -> QueueResult<Option<Message>> {
        let mut state = self.lock_state()?;
        let message = state.chain.pop_front();
        if message.is_some() {
            state.dequeued_total += 1;
        }
        Ok(message)
    }

    // The copy and the node release both happen before the lock is dropped
    fn remove_head_into(&self, out: &mut [u8]) -> QueueResult<Option<Dequeued>> {
        let mut state = self.lock_state()?;
        Ok(state.chain.pop_front().map(|message| {
            state.dequeued_total += 1;
            message.copy_into(out)
        }))
    }

    /// Block until a message is available, the queue closes, or `timeout`
    /// elapses
    ///
    /// Returns `Ok(None)` on timeout and once the queue is closed and
    /// drained. The lock is released while waiting.
    pub fn wait_pop(&self, timeout: Duration) -> QueueResult<Option<Message>> {
        let result = self.wait_for_head(timeout);
        if let Ok(Some(message)) = &result {
            self.log_removed(message);
        }
        self.observe("wait_pop", result)
    }

    fn wait_for_head(&self, timeout: Duration) -> QueueResult<Option<Message>> {
        let state = self.lock_state()?;
        let (mut state, _) = handle_mutex_poison(
            self.available
                .wait_timeout_while(state, timeout, |s| s.chain.is_empty() && !s.closed),
            QueueError::internal,
        )?;

        let message = state.chain.pop_front();
        if message.is_some() {
            state.dequeued_total += 1;
        }
        Ok(message)
    }

    fn log_removed(&self, message: &Message) {
        log::info!(
            "Message dequeued! (queue: {}, sequence: {})",
            self.queue_id,
            message.sequence()
        );
    }

    /// Stop accepting messages and wake every blocked consumer
    ///
    /// Messages already queued stay available to `dequeue`, `pop` and
    /// `wait_pop`. Closing twice is harmless.
    pub fn close(&self) -> QueueResult<()> {
        let mut state = self.observe("close", self.lock_state())?;
        let was_closed = std::mem::replace(&mut state.closed, true);
        let remaining = state.chain.len();
        drop(state);

        self.available.notify_all();
        self.closed_signal.notify_all();
        if !was_closed {
            log::debug!(
                "Queue '{}' closed with {} message(s) remaining",
                self.queue_id,
                remaining
            );
        }
        Ok(())
    }

    /// Sleep for `timeout` unless the queue is closed first
    ///
    /// Returns `true` once the queue is closed, immediately if it already
    /// is. Enqueues do not end the wait; they signal a separate condition.
    pub fn wait_closed(&self, timeout: Duration) -> QueueResult<bool> {
        let result = self.lock_state().and_then(|state| {
            handle_mutex_poison(
                self.closed_signal
                    .wait_timeout_while(state, timeout, |s| !s.closed),
                QueueError::internal,
            )
            .map(|(state, _)| state.closed)
        });
        self.observe("wait_closed", result)
    }

    pub fn is_closed(&self) -> bool {
        self.peek_state().closed
    }

    pub fn len(&self) -> usize {
        self.peek_state().chain.len()
    }

    pub fn is_empty(&self) -> bool {
        self.peek_state().chain.is_empty()
    }

    pub fn stats(&self) -> QueueStats {
        let state = self.peek_state();
        QueueStats {
            depth: state.chain.len(),
            payload_bytes: state.chain.payload_bytes(),
            enqueued_total: state.enqueued_total,
            dequeued_total: state.dequeued_total,
            closed: state.closed,
        }
    }

    #[cfg(test)]
    pub(crate) fn poison_for_test(&self) {
        let _guard = self.state.lock();
        panic!("poisoning queue lock");
    }

    /// Render the queued messages for diagnostics
    ///
    /// Best-effort only: if another thread holds the lock the dump reports
    /// `QUEUE [BUSY]` instead of waiting, so it never blocks producers or
    /// consumers. The result is a snapshot and may be stale immediately.
    pub fn dump(&self) -> String {
        let state = match self.state.try_lock() {
            Ok(guard) => guard,
            Err(TryLockError::Poisoned(poisoned)) => poisoned.into_inner(),
            Err(TryLockError::WouldBlock) => return "QUEUE [BUSY]\n".to_string(),
        };

        let mut out = String::from("QUEUE [START]\n");
        for message in state.chain.iter() {
            let enqueued_at: chrono::DateTime<chrono::Local> = message.header.enqueued_at.into();
            let _ = writeln!(
                out,
                "Queue data: {} (sequence {}, queued {})",
                message.text(),
                message.sequence(),
                enqueued_at.format("%H:%M:%S%.3f")
            );
        }
        drop(state);
        out.push_str("QUEUE [END]\n");
        out
    }
}
