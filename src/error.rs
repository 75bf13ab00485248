//! Error types returned by the lifecycle handle.
//!
//! This module defines two small enums:
//!
//! - [`SpawnError`] — returned when a task cannot be admitted.
//! - [`WaitError`] — returned when a timed wait for the dead state elapses.
//!
//! Both are expected, recoverable outcomes rather than faults: rejection is
//! routine near shutdown, and a timed-out wait is purely observational. The
//! core emits no logs itself; the `as_label` / `as_message` helpers give the
//! supervisor stable strings to log or count from.

use std::time::Duration;

use thiserror::Error;

/// # Task admission errors.
///
/// Returned by [`Lifeline::spawn`](crate::Lifeline::spawn) and
/// [`Lifeline::spawn_fn`](crate::Lifeline::spawn_fn) when the handle no
/// longer accepts tasks. The task callable is never invoked in that case.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SpawnError {
    /// Shutdown has been initiated; the handle is dying or already dead.
    #[error("lifecycle is shutting down; task was not started")]
    AlreadyShuttingDown,
}

impl SpawnError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use lifeline::SpawnError;
    ///
    /// let err = SpawnError::AlreadyShuttingDown;
    /// assert_eq!(err.as_label(), "spawn_after_shutdown");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            SpawnError::AlreadyShuttingDown => "spawn_after_shutdown",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            SpawnError::AlreadyShuttingDown => {
                "lifecycle is shutting down; task was not started".to_string()
            }
        }
    }
}

/// # Timed-wait errors.
///
/// Returned by [`Lifeline::wait`](crate::Lifeline::wait) when the deadline
/// elapses before every task has finished. The handle's state is unaffected:
/// tasks keep running, and a later wait can still observe a clean death.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WaitError {
    /// The deadline elapsed while at least one task was still running.
    #[error("timed out after {timeout:?} waiting for all tasks to finish")]
    Timeout {
        /// The deadline that was exceeded.
        timeout: Duration,
    },
}

impl WaitError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use lifeline::WaitError;
    /// use std::time::Duration;
    ///
    /// let err = WaitError::Timeout { timeout: Duration::from_secs(1) };
    /// assert_eq!(err.as_label(), "wait_timeout");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            WaitError::Timeout { .. } => "wait_timeout",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            WaitError::Timeout { timeout } => {
                format!("wait timed out after {timeout:?}; tasks still running")
            }
        }
    }
}
