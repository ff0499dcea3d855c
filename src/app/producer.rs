//! Message producers driven by the main task

use crate::queue::MessageQueue;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

pub const TEST_MESSAGE_COUNT: usize = 11;
pub const HEARTBEAT_MESSAGES: [&str; 2] = ["still", "alive"];

/// Enqueue "TestMessage: 0" through "TestMessage: 10"
///
/// Failures are logged by the queue and do not stop the sequence. Returns
/// the number of messages accepted.
pub fn seed_test_messages(queue: &MessageQueue) -> usize {
    (0..TEST_MESSAGE_COUNT)
        .filter(|index| queue.enqueue(&format!("TestMessage: {}", index)).is_ok())
        .count()
}

/// Enqueue one "still" / "alive" pair
pub fn send_heartbeat(queue: &MessageQueue) -> usize {
    HEARTBEAT_MESSAGES
        .iter()
        .filter(|text| queue.enqueue(text).is_ok())
        .count()
}

/// Send a heartbeat every `period` until shutdown is signalled
///
/// The first heartbeat goes out one full period after the call. Returns
/// the number of heartbeats sent.
pub async fn run_heartbeat(
    queue: Arc<MessageQueue>,
    period: Duration,
    mut shutdown_rx: broadcast::Receiver<()>,
) -> u64 {
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut sent = 0;

    loop {
        tokio::select! {
            _ = shutdown_rx.recv() => {
                log::debug!("Heartbeat stopped after {} beat(s)", sent);
                break;
            }
            _ = ticker.tick() => {
                send_heartbeat(&queue);
                sent += 1;
            }
        }
    }
    sent
}
