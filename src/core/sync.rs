//! Synchronization utilities for mutex poisoning
//!
//! A panic while a queue lock is held poisons it. Callers convert the poison
//! into their own error type instead of propagating the panic.

use std::sync::LockResult;

/// Convert a poisoned lock result into an application error
///
/// Works for anything returned as a `LockResult`, including the
/// `(guard, timeout)` pair produced by `Condvar::wait_timeout_while`.
///
/// # Examples
/// ```
/// use std::sync::Mutex;
/// use threadtest::core::sync::handle_mutex_poison;
/// use threadtest::queue::QueueError;
///
/// let mutex = Mutex::new(42);
/// let guard = handle_mutex_poison(mutex.lock(), |message| {
///     QueueError::InternalFailure { message }
/// })
/// .unwrap();
/// assert_eq!(*guard, 42);
/// ```
pub fn handle_mutex_poison<T, E>(
    result: LockResult<T>,
    error_constructor: impl FnOnce(String) -> E,
) -> Result<T, E> {
    result.map_err(|poison_err| {
        error_constructor(format!(
            "Internal synchronisation error (mutex poisoned). A panic occurred while holding a lock: {}",
            poison_err
        ))
    })
}
