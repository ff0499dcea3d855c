//! Background consumer for a message queue
//!
//! A worker runs on its own thread and takes messages off one queue until
//! that queue is closed and drained. Two strategies are available:
//!
//! - **Poll**: non-blocking `dequeue` into a fixed buffer, then sleep for a
//!   fixed interval (cut short when the queue is closed)
//! - **Wait** (default): block in `wait_pop` so a message is handled as soon
//!   as it is enqueued
//!
//! Every non-empty message is passed to a [`MessageHandler`].

mod handler;

pub use handler::{LogHandler, MessageHandler};

use crate::queue::{MessageQueue, QueueError, QueueResult};
use std::fmt;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Capacity of the buffer used by the polling strategy
pub const MAX_MESSAGE_LENGTH: usize = 255;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Upper bound on a single `wait_pop`; the loop simply waits again
pub const DEFAULT_WAIT_TIMEOUT: Duration = Duration::from_secs(1);

const WORKER_THREAD_NAME: &str = "queue-worker";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsumeStrategy {
    Poll { interval: Duration },
    Wait { timeout: Duration },
}

impl Default for ConsumeStrategy {
    fn default() -> Self {
        ConsumeStrategy::Wait {
            timeout: DEFAULT_WAIT_TIMEOUT,
        }
    }
}

impl fmt::Display for ConsumeStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConsumeStrategy::Poll { interval } => write!(f, "poll every {:?}", interval),
            ConsumeStrategy::Wait { timeout } => write!(f, "wait (timeout {:?})", timeout),
        }
    }
}

/// Totals collected by a worker over its lifetime
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkerReport {
    /// Messages taken off the queue, empty ones included
    pub received: u64,
    /// Queue operations that returned an error
    pub failures: u64,
}

pub struct Worker<H> {
    queue: Arc<MessageQueue>,
    strategy: ConsumeStrategy,
    handler: H,
}

impl<H: MessageHandler> Worker<H> {
    pub fn new(queue: Arc<MessageQueue>, strategy: ConsumeStrategy, handler: H) -> Self {
        Self {
            queue,
            strategy,
            handler,
        }
    }

    /// Consume on the calling thread until the queue is closed and empty
    ///
    /// Failures are already logged by the queue; they are counted and the
    /// loop carries on, except for `InternalFailure` which stops it because
    /// a poisoned queue never recovers.
    pub fn run(mut self) -> WorkerReport {
        log::debug!(
            "Worker started on queue '{}' ({})",
            self.queue.queue_id(),
            self.strategy
        );

        let report = match self.strategy {
            ConsumeStrategy::Poll { interval } => self.poll(interval),
            ConsumeStrategy::Wait { timeout } => self.wait(timeout),
        };

        log::debug!(
            "Worker on queue '{}' stopped: {} received, {} failure(s)",
            self.queue.queue_id(),
            report.received,
            report.failures
        );
        report
    }

    fn poll(&mut self, interval: Duration) -> WorkerReport {
        let mut report = WorkerReport::default();
        let mut buffer = [0u8; MAX_MESSAGE_LENGTH];

        loop {
            buffer.fill(0);
            match self.queue.dequeue(&mut buffer) {
                Ok(Some(outcome)) => {
                    report.received += 1;
                    if outcome.written > 0 {
                        let text = String::from_utf8_lossy(&buffer[..outcome.written]);
                        self.handler.handle(&text);
                    }
                }
                Ok(None) if self.is_drained() => break,
                Ok(None) => {}
                Err(e) => {
                    report.failures += 1;
                    if is_fatal(&e) {
                        break;
                    }
                }
            }

            // Returns at once on a closed queue, so it drains back to back
            if let Err(e) = self.queue.wait_closed(interval) {
                report.failures += 1;
                if is_fatal(&e) {
                    break;
                }
            }
        }
        report
    }

    fn wait(&mut self, timeout: Duration) -> WorkerReport {
        let mut report = WorkerReport::default();

        loop {
            match self.queue.wait_pop(timeout) {
                Ok(Some(message)) => {
                    report.received += 1;
                    if !message.is_empty() {
                        self.handler.handle(message.text());
                    }
                }
                Ok(None) if self.is_drained() => break,
                Ok(None) => {}
                Err(e) => {
                    report.failures += 1;
                    if is_fatal(&e) {
                        break;
                    }
                    // Avoid spinning on a repeating failure
                    if self.queue.wait_closed(timeout).is_err() {
                        break;
                    }
                }
            }
        }
        report
    }
}

impl<H: MessageHandler + 'static> Worker<H> {
    /// Start the worker on a dedicated thread
    pub fn spawn(self) -> QueueResult<WorkerHandle> {
        let queue = Arc::clone(&self.queue);
        let thread = thread::Builder::new()
            .name(WORKER_THREAD_NAME.to_string())
            .spawn(move || self.run())
            .map_err(|e| QueueError::internal(format!("failed to spawn worker thread: {}", e)))?;

        Ok(WorkerHandle { queue, thread })
    }
}

impl<H> Worker<H> {
    // Closed is checked first: once closed, the queue can only shrink
    fn is_drained(&self) -> bool {
        self.queue.is_closed() && self.queue.is_empty()
    }
}

fn is_fatal(error: &QueueError) -> bool {
    matches!(error, QueueError::InternalFailure { .. })
}

/// Handle to a running worker thread
///
/// Dropping the handle detaches the thread; it keeps consuming for as long
/// as the queue stays open.
#[derive(Debug)]
pub struct WorkerHandle {
    queue: Arc<MessageQueue>,
    thread: JoinHandle<WorkerReport>,
}

impl WorkerHandle {
    pub fn is_finished(&self) -> bool {
        self.thread.is_finished()
    }

    /// Close the queue, let the worker drain it, and join the thread
    pub fn shutdown(self) -> QueueResult<WorkerReport> {
        // Join even if closing failed: a poisoned queue stops the worker too
        let closed = self.queue.close();
        let report = self
            .thread
            .join()
            .map_err(|_| QueueError::internal("worker thread panicked"))?;
        closed?;
        Ok(report)
    }
}
