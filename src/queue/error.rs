//! Queue Error Types

use crate::core::error_handling::ContextualError;
use crate::core::logging::DebugLevel;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueueError {
    #[error("Invalid argument: {reason}")]
    InvalidArgument { reason: String },

    #[error("Allocation failed while copying a {requested} byte message: {reason}")]
    AllocationFailure { requested: usize, reason: String },

    #[error("Internal failure: {message}")]
    InternalFailure { message: String },

    #[error("Queue '{queue_id}' is closed")]
    Closed { queue_id: String },

    #[error("Unknown queue failure")]
    Unknown,
}

impl QueueError {
    pub(crate) fn invalid_argument(reason: impl Into<String>) -> Self {
        QueueError::InvalidArgument {
            reason: reason.into(),
        }
    }

    pub(crate) fn internal(message: impl Into<String>) -> Self {
        QueueError::InternalFailure {
            message: message.into(),
        }
    }

    /// Severity at which this failure is reported
    pub fn severity(&self) -> DebugLevel {
        match self {
            QueueError::InvalidArgument { .. } | QueueError::Closed { .. } => DebugLevel::Warning,
            QueueError::AllocationFailure { .. }
            | QueueError::InternalFailure { .. }
            | QueueError::Unknown => DebugLevel::Critical,
        }
    }

    /// Emit the diagnostic line for a failed operation
    pub(crate) fn report(&self, operation: &str, queue_id: &str) {
        match self.severity() {
            DebugLevel::Warning => {
                log::warn!("Error! Bad parameter(s): {} on '{}': {}", operation, queue_id, self)
            }
            _ => crate::critical!("{} on '{}' failed: {}", operation, queue_id, self),
        }
    }
}

impl ContextualError for QueueError {
    fn is_user_actionable(&self) -> bool {
        matches!(self, QueueError::InvalidArgument { .. })
    }

    fn user_message(&self) -> Option<String> {
        match self {
            QueueError::InvalidArgument { reason } => Some(reason.clone()),
            _ => None,
        }
    }
}

/// Result type for queue operations
pub type QueueResult<T> = Result<T, QueueError>;
