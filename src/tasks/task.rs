//! # Task abstraction.
//!
//! This module defines the [`Task`] trait: an async unit of work that runs
//! under a [`Lifeline`](crate::Lifeline) and stops cooperatively.
//!
//! A task receives the shutdown [`Latch`] and should periodically check it to
//! stop promptly once shutdown begins. How quickly it does so is its own
//! business; the lifeline only waits.

use async_trait::async_trait;

use crate::latch::Latch;

/// # Asynchronous, cooperatively stopping unit.
///
/// A `Task` has an async [`run`](Task::run) method that receives the shutdown
/// [`Latch`]. Implementors should regularly check it (or await it) and return
/// promptly during shutdown.
///
/// The return value is `()`: the lifeline neither observes nor propagates
/// task outcomes. Fallible bodies handle their own errors.
///
/// # Example
/// ```
/// use async_trait::async_trait;
/// use lifeline::{Latch, Task};
///
/// struct Demo;
///
/// #[async_trait]
/// impl Task for Demo {
///     async fn run(&self, signal: Latch) {
///         if signal.is_set() {
///             return;
///         }
///         // do work...
///     }
/// }
/// ```
#[async_trait]
pub trait Task: Send + Sync + 'static {
    /// Executes the task until completion or cooperative shutdown.
    ///
    /// Implementations should check `signal.is_set()` (or await
    /// `signal.wait()`) and exit quickly once shutdown begins.
    async fn run(&self, signal: Latch);
}
