//! Generic error handling utilities
//!
//! Fatal errors are reported once at critical severity. User-actionable
//! errors (bad configuration, bad arguments) show their own message; system
//! errors show the failing operation and keep the details at debug level.

/// Errors that can tell user-actionable failures from system failures
///
/// When `is_user_actionable()` returns `true`, `user_message()` should return
/// `Some(message)`; otherwise it should return `None`.
pub trait ContextualError: std::error::Error {
    fn is_user_actionable(&self) -> bool;

    fn user_message(&self) -> Option<String>;
}

/// Log an error with a detail level that depends on who can act on it
pub fn log_error_with_context<E: ContextualError + std::fmt::Debug>(
    error: &E,
    operation_context: &str,
) {
    match error.user_message() {
        Some(user_msg) if error.is_user_actionable() => {
            crate::critical!("FATAL: {}", user_msg);
        }
        _ => {
            crate::critical!("FATAL: {} failed", operation_context);
        }
    }
    log::debug!("DETAIL: {}", error);
    log::debug!("DEBUG_DETAILS: {:?}", error);
}
