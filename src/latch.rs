//! # One-shot broadcast latch.
//!
//! [`Latch`] is a clonable, set-once signal: any number of observers can wait
//! on it, concurrently and repeatedly, and all of them unblock as soon as it
//! is set. Once set it stays set forever, so late waiters return immediately.
//!
//! Internally this wraps a [`CancellationToken`]; clones share state, so a
//! `Latch` can be handed to tasks and supervisors alike as a cheap handle.
//!
//! ## Example
//! ```rust
//! use lifeline::Latch;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let latch = Latch::new();
//!     let observer = latch.clone();
//!
//!     assert!(!observer.is_set());
//!     latch.set();
//!
//!     observer.wait().await; // already set, returns immediately
//!     assert!(observer.is_set());
//! }
//! ```

use std::time::Duration;

use tokio_util::sync::CancellationToken;

/// A one-shot broadcast signal.
///
/// Supports idempotent [`set`](Latch::set), non-blocking
/// [`is_set`](Latch::is_set), and waiting with or without a deadline.
#[derive(Clone, Debug, Default)]
pub struct Latch {
    token: CancellationToken,
}

impl Latch {
    /// Creates a new, unset latch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Trips the latch, waking every current and future waiter.
    ///
    /// Idempotent: further calls are no-ops.
    pub fn set(&self) {
        self.token.cancel();
    }

    /// Returns true if the latch has been set.
    pub fn is_set(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Resolves once the latch is set.
    ///
    /// Resolves immediately if it already is; can be awaited by any number
    /// of observers, any number of times.
    pub async fn wait(&self) {
        self.token.cancelled().await;
    }

    /// Waits for the latch up to `timeout`.
    ///
    /// Returns `true` if the latch was (or became) set before the deadline,
    /// `false` if the deadline elapsed first. The readiness check runs before
    /// the deadline check, so a zero or already-elapsed timeout still reports
    /// `true` when the latch is already set.
    pub async fn wait_timeout(&self, timeout: Duration) -> bool {
        tokio::time::timeout(timeout, self.token.cancelled())
            .await
            .is_ok()
    }
}
