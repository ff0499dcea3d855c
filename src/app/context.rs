//! Application context shared by the producer and the worker

use crate::app::cli::Settings;
use crate::queue::MessageQueue;
use std::sync::Arc;

pub const MAIN_QUEUE_ID: &str = "main";

/// Resolved settings plus the queue they apply to
///
/// Built once at startup and passed down explicitly.
#[derive(Debug, Clone)]
pub struct AppContext {
    pub settings: Settings,
    pub queue: Arc<MessageQueue>,
}

impl AppContext {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            queue: Arc::new(MessageQueue::new(MAIN_QUEUE_ID)),
        }
    }
}
