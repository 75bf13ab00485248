//! # Function-backed task (`TaskFn`)
//!
//! [`TaskFn`] wraps a closure `F: Fn(Latch) -> Fut`, producing a fresh future
//! per run. Each run owns its own state; if runs need shared state, capture
//! an `Arc<...>` explicitly inside the closure.
//!
//! ## Example
//! ```rust
//! use lifeline::{Latch, TaskFn, TaskRef};
//!
//! let t: TaskRef = TaskFn::arc(|signal: Latch| async move {
//!     if signal.is_set() {
//!         return;
//!     }
//!     // do work...
//! });
//! ```

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;

use crate::latch::Latch;
use crate::tasks::task::Task;

/// Shared handle to a task (`Arc<dyn Task>`), suitable for spawning.
pub type TaskRef = Arc<dyn Task>;

/// Function-backed task implementation.
///
/// Wraps a closure that *creates* a new future per run.
#[derive(Debug)]
pub struct TaskFn<F> {
    f: F,
}

impl<F> TaskFn<F> {
    /// Creates a new function-backed task.
    ///
    /// Prefer [`TaskFn::arc`] when you immediately need a [`TaskRef`].
    pub fn new(f: F) -> Self {
        Self { f }
    }

    /// Creates the task and returns it as a shared handle.
    pub fn arc(f: F) -> Arc<Self> {
        Arc::new(Self::new(f))
    }
}

#[async_trait]
impl<F, Fut> Task for TaskFn<F>
where
    F: Fn(Latch) -> Fut + Send + Sync + 'static, // Fn, not FnMut
    Fut: Future<Output = ()> + Send + 'static,
{
    async fn run(&self, signal: Latch) {
        (self.f)(signal).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn runs_closure_with_signal() {
        let count = Arc::new(AtomicUsize::new(0));
        let c = count.clone();
        let t: TaskRef = TaskFn::arc(move |signal: Latch| {
            let c = c.clone();
            async move {
                assert!(!signal.is_set());
                c.fetch_add(1, Ordering::SeqCst);
            }
        });

        // Each run produces a fresh future.
        t.run(Latch::new()).await;
        t.run(Latch::new()).await;
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }
}
