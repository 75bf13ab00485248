//! # Lifecycle handle: spawn, signal shutdown, wait for death.
//!
//! The [`Lifeline`] ties a group of tokio tasks to one termination signal and
//! one completion signal. A supervisor spawns any number of tasks under the
//! handle, later broadcasts "begin shutdown" without waiting, and learns,
//! by polling or by a timed wait, when every spawned task has actually
//! finished.
//!
//! ## State machine
//!
//! | State | Entered when                  | Spawn allowed? | dying latch | dead latch |
//! |-------|-------------------------------|----------------|-------------|------------|
//! | Alive | handle creation               | yes            | unset       | unset      |
//! | Dying | [`shutdown`] called           | no             | set         | unset      |
//! | Dead  | Dying and no tasks left alive | no             | set         | set        |
//!
//! Transitions are monotonic and each occurs at most once. The handle reaches
//! Dead automatically, not via an explicit call: the dead condition is
//! re-checked both when shutdown is initiated and whenever a task finishes,
//! because either event can be the one that makes it true.
//!
//! [`shutdown`]: Lifeline::shutdown
//!
//! ## Cooperative stop
//!
//! Stopping is entirely cooperative. The handle never aborts a task; it only
//! trips the shutdown latch the task received. A task that ignores it keeps
//! the handle Dying forever, which a supervisor observes as a
//! [`WaitError::Timeout`] and can escalate on.
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use lifeline::{Latch, Lifeline};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let life = Lifeline::new();
//!
//!     life.spawn_fn(|signal: Latch| async move {
//!         // do work until asked to stop
//!         signal.wait().await;
//!     })?;
//!
//!     life.shutdown();
//!     life.wait(Duration::from_secs(1)).await?;
//!     Ok(())
//! }
//! ```

use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use crate::error::{SpawnError, WaitError};
use crate::latch::Latch;
use crate::state::State;
use crate::tasks::TaskRef;

/// Bookkeeping guarded by the admission mutex.
#[derive(Debug)]
struct Shared {
    /// True once shutdown has been initiated.
    dying: bool,
    /// Tasks spawned and not yet finished.
    num_alive: usize,
}

#[derive(Debug)]
struct Inner {
    shared: Mutex<Shared>,
    /// Tripped exactly once, when shutdown is initiated.
    dying: Latch,
    /// Tripped exactly once, when dying and the last task has finished.
    dead: Latch,
}

impl Inner {
    /// Locks the shared bookkeeping, absorbing poison.
    ///
    /// A panicking task poisons the mutex when its completion guard unlocks
    /// during unwind. Every critical section here is straight-line and leaves
    /// the state consistent, so the poisoned value is safe to keep using.
    fn shared(&self) -> MutexGuard<'_, Shared> {
        self.shared.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Lifecycle handle for a group of cooperatively stopping tasks.
///
/// Clonable; clones share the same state machine. All operations are safe
/// under arbitrary concurrent calls from any mix of clones.
///
/// See the [module docs](self) for the state machine and an example.
#[derive(Clone, Debug)]
pub struct Lifeline {
    inner: Arc<Inner>,
}

impl Default for Lifeline {
    fn default() -> Self {
        Self::new()
    }
}

impl Lifeline {
    /// Creates a handle in the Alive state with no tasks.
    ///
    /// Fully initialized and immediately usable; both latches exist from the
    /// start, there is no lazy setup on first observation.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner {
                shared: Mutex::new(Shared {
                    dying: false,
                    num_alive: 0,
                }),
                dying: Latch::new(),
                dead: Latch::new(),
            }),
        }
    }

    /// Spawns a task under this handle.
    ///
    /// Fails with [`SpawnError::AlreadyShuttingDown`] if the handle is Dying
    /// or Dead; the task is never started in that case. Otherwise the task
    /// begins running on the tokio runtime and the call returns without
    /// waiting for it.
    ///
    /// The admission check and the live-count increment are one atomic step
    /// relative to [`shutdown`](Lifeline::shutdown): a task is either counted
    /// before shutdown is observable, and must then finish before the handle
    /// goes Dead, or it is rejected outright.
    ///
    /// Completion bookkeeping runs even if the task body panics, so a
    /// faulting task cannot keep the handle Dying forever.
    ///
    /// # Panics
    /// Panics if called outside a tokio runtime, as `tokio::spawn` does.
    pub fn spawn(&self, task: TaskRef) -> Result<(), SpawnError> {
        let done = self.admit()?;
        let signal = self.inner.dying.clone();
        tokio::spawn(async move {
            let _done = done;
            task.run(signal).await;
        });
        Ok(())
    }

    /// Spawns a closure-backed task under this handle.
    ///
    /// Convenience over [`spawn`](Lifeline::spawn) for one-shot closures. The
    /// closure receives the shutdown [`Latch`] and is not invoked at all when
    /// admission is rejected.
    ///
    /// # Panics
    /// Panics if called outside a tokio runtime, as `tokio::spawn` does.
    pub fn spawn_fn<F, Fut>(&self, f: F) -> Result<(), SpawnError>
    where
        F: FnOnce(Latch) -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let done = self.admit()?;
        let fut = f(self.inner.dying.clone());
        tokio::spawn(async move {
            let _done = done;
            fut.await;
        });
        Ok(())
    }

    /// Initiates shutdown: trips the shutdown latch and stops admitting
    /// tasks.
    ///
    /// Idempotent and non-blocking; it does not wait for any task to finish.
    /// If no tasks are outstanding (including the common case of none ever
    /// spawned), the handle transitions straight through to Dead in the same
    /// logical step.
    pub fn shutdown(&self) {
        let now_dead = {
            let mut shared = self.inner.shared();
            if shared.dying {
                return;
            }
            shared.dying = true;
            // Tripped while the lock is held: a concurrently finishing task
            // re-checks the dead condition under this same lock, so it can
            // never trip the dead latch before the dying latch is set.
            // `Latch::set` only schedules wakers and runs no observer code
            // inline, so holding the lock across it cannot deadlock.
            self.inner.dying.set();
            shared.num_alive == 0
        };
        if now_dead {
            self.inner.dead.set();
        }
    }

    /// Returns the shutdown signal.
    ///
    /// Tasks (or any other observer) wait on it to learn that shutdown has
    /// begun; once set it stays set, so late and repeated waiters unblock
    /// immediately. Treat the returned latch as read-only: trip it via
    /// [`shutdown`](Lifeline::shutdown), not directly, or admission control
    /// will not engage.
    pub fn dying(&self) -> Latch {
        self.inner.dying.clone()
    }

    /// Returns the terminal signal, set once every spawned task has finished
    /// after shutdown was initiated.
    ///
    /// Same one-shot, multi-observer semantics as [`dying`](Lifeline::dying).
    pub fn dead(&self) -> Latch {
        self.inner.dead.clone()
    }

    /// Returns true while shutdown has not been initiated.
    ///
    /// Advisory: the handle may go Dying immediately after this returns
    /// true. Use it only to decide whether to *begin* stopping, never as a
    /// guarantee that a subsequent [`spawn`](Lifeline::spawn) will succeed.
    pub fn is_alive(&self) -> bool {
        !self.inner.shared().dying
    }

    /// Returns true once shutdown was initiated and every task has finished.
    pub fn is_dead(&self) -> bool {
        let shared = self.inner.shared();
        shared.dying && shared.num_alive == 0
    }

    /// Returns the current state, derived from the internal bookkeeping.
    pub fn state(&self) -> State {
        let shared = self.inner.shared();
        match (shared.dying, shared.num_alive) {
            (false, _) => State::Alive,
            (true, 0) => State::Dead,
            (true, _) => State::Dying,
        }
    }

    /// Returns the number of tasks currently spawned and not yet finished.
    ///
    /// Advisory, like [`is_alive`](Lifeline::is_alive).
    pub fn live_tasks(&self) -> usize {
        self.inner.shared().num_alive
    }

    /// Waits until the handle is Dead, up to `timeout`.
    ///
    /// Returns [`WaitError::Timeout`] when the deadline elapses first. A
    /// timed-out wait is purely observational: it cancels nothing, and a
    /// later call can still see a clean death once stuck tasks finish. A
    /// zero or already-elapsed timeout still succeeds when the handle is
    /// already Dead.
    pub async fn wait(&self, timeout: Duration) -> Result<(), WaitError> {
        if self.inner.dead.wait_timeout(timeout).await {
            Ok(())
        } else {
            Err(WaitError::Timeout { timeout })
        }
    }

    /// Admits one task: rejects when dying, otherwise counts it and returns
    /// the guard that will uncount it.
    fn admit(&self) -> Result<CompletionGuard, SpawnError> {
        let mut shared = self.inner.shared();
        if shared.dying {
            return Err(SpawnError::AlreadyShuttingDown);
        }
        shared.num_alive += 1;
        Ok(CompletionGuard {
            inner: Arc::clone(&self.inner),
        })
    }
}

/// Decrements the live count when dropped and performs the dead-check.
///
/// Held across the task body inside the spawned wrapper, so the bookkeeping
/// runs strictly after the body has returned or unwound: a panicking task
/// still counts as finished rather than hanging the handle in Dying.
struct CompletionGuard {
    inner: Arc<Inner>,
}

impl Drop for CompletionGuard {
    fn drop(&mut self) {
        let now_dead = {
            let mut shared = self.inner.shared();
            shared.num_alive -= 1;
            shared.dying && shared.num_alive == 0
        };
        if now_dead {
            // Lock released first; waking observers may immediately
            // re-acquire it.
            self.inner.dead.set();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tasks::{TaskFn, TaskRef};
    use std::sync::atomic::{AtomicBool, Ordering};

    const SECOND: Duration = Duration::from_secs(1);

    #[tokio::test]
    async fn tasks_observe_shutdown_and_finish() {
        let life = Lifeline::new();
        let ran_a = Arc::new(AtomicBool::new(false));
        let ran_b = Arc::new(AtomicBool::new(false));

        for flag in [ran_a.clone(), ran_b.clone()] {
            life.spawn_fn(move |signal| async move {
                flag.store(true, Ordering::SeqCst);
                signal.wait().await;
            })
            .unwrap();
        }
        assert_eq!(life.live_tasks(), 2);

        life.shutdown();
        life.wait(SECOND).await.unwrap();

        assert!(ran_a.load(Ordering::SeqCst));
        assert!(ran_b.load(Ordering::SeqCst));
        assert_eq!(life.live_tasks(), 0);
    }

    #[tokio::test]
    async fn shutdown_without_tasks_is_immediately_dead() {
        let life = Lifeline::new();
        life.shutdown();

        assert!(life.is_dead());
        assert!(life.dying().is_set());
        assert!(life.dead().is_set());
        assert_eq!(life.state(), State::Dead);

        // Zero timeout still reports success once dead.
        life.wait(Duration::ZERO).await.unwrap();
    }

    #[tokio::test]
    async fn spawn_after_shutdown_is_rejected() {
        let life = Lifeline::new();
        life.shutdown();

        let ran = Arc::new(AtomicBool::new(false));
        let flag = ran.clone();
        let err = life
            .spawn_fn(move |_signal| async move {
                flag.store(true, Ordering::SeqCst);
            })
            .unwrap_err();

        assert_eq!(err, SpawnError::AlreadyShuttingDown);
        assert!(!ran.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn spawn_while_dying_is_rejected() {
        let life = Lifeline::new();
        let gate = Latch::new();

        let g = gate.clone();
        life.spawn_fn(move |_signal| async move { g.wait().await })
            .unwrap();
        life.shutdown();
        assert_eq!(life.state(), State::Dying);

        let task: TaskRef = TaskFn::arc(|_signal: Latch| async {});
        assert_eq!(life.spawn(task).unwrap_err(), SpawnError::AlreadyShuttingDown);

        gate.set();
        life.wait(SECOND).await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn wait_times_out_on_stuck_task_then_recovers() {
        let life = Lifeline::new();
        let gate = Latch::new();

        let g = gate.clone();
        life.spawn_fn(move |_signal| async move { g.wait().await })
            .unwrap();
        life.shutdown();

        let err = life.wait(SECOND).await.unwrap_err();
        assert_eq!(err, WaitError::Timeout { timeout: SECOND });
        assert!(!life.is_dead());
        assert_eq!(life.state(), State::Dying);

        // A timed-out wait cancels nothing; once the stuck task is released
        // the handle still reaches a clean death.
        gate.set();
        life.wait(SECOND).await.unwrap();
        assert!(life.is_dead());
    }

    #[tokio::test(start_paused = true)]
    async fn no_premature_death_with_outstanding_tasks() {
        let life = Lifeline::new();
        let gates: Vec<Latch> = (0..3).map(|_| Latch::new()).collect();

        for gate in &gates {
            let g = gate.clone();
            life.spawn_fn(move |_signal| async move { g.wait().await })
                .unwrap();
        }
        life.shutdown();
        assert!(!life.is_dead());

        // Completion order differs from spawn order; the terminal signal
        // must hold off until the very last task.
        for gate in [&gates[2], &gates[0]] {
            gate.set();
            assert!(life.wait(Duration::from_millis(10)).await.is_err());
            assert!(!life.dead().is_set());
        }
        gates[1].set();
        life.wait(SECOND).await.unwrap();
        assert!(life.dead().is_set());
    }

    #[tokio::test]
    async fn shutdown_is_idempotent() {
        let life = Lifeline::new();
        life.shutdown();
        life.shutdown();
        life.shutdown();

        assert!(life.is_dead());
        life.wait(Duration::ZERO).await.unwrap();
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn concurrent_shutdown_is_a_single_transition() {
        let life = Lifeline::new();
        let gate = Latch::new();

        let g = gate.clone();
        life.spawn_fn(move |_signal| async move { g.wait().await })
            .unwrap();

        let callers: Vec<_> = (0..8)
            .map(|_| {
                let l = life.clone();
                tokio::spawn(async move { l.shutdown() })
            })
            .collect();
        for c in callers {
            c.await.unwrap();
        }

        // Still dying: the outstanding task pins the handle short of dead.
        assert_eq!(life.state(), State::Dying);
        assert!(!life.dead().is_set());

        gate.set();
        life.wait(SECOND).await.unwrap();
    }

    #[tokio::test]
    async fn state_observation_is_monotonic() {
        let life = Lifeline::new();
        assert_eq!(life.state(), State::Alive);
        assert!(life.is_alive());
        assert!(!life.is_dead());

        let gate = Latch::new();
        let g = gate.clone();
        life.spawn_fn(move |_signal| async move { g.wait().await })
            .unwrap();

        life.shutdown();
        assert_eq!(life.state(), State::Dying);
        assert!(!life.is_alive());
        assert!(!life.is_dead());

        gate.set();
        life.wait(SECOND).await.unwrap();
        assert_eq!(life.state(), State::Dead);
        assert!(!life.is_alive());
        assert!(life.is_dead());

        // Repeated observation never regresses.
        assert_eq!(life.state(), State::Dead);
    }

    #[tokio::test]
    async fn panicking_task_still_counts_as_finished() {
        let life = Lifeline::new();
        life.spawn_fn(|_signal| async {
            panic!("task blew up");
        })
        .unwrap();

        life.shutdown();
        life.wait(SECOND).await.unwrap();
        assert!(life.is_dead());
        assert_eq!(life.live_tasks(), 0);
    }

    #[tokio::test]
    async fn trait_backed_task_runs_under_handle() {
        let life = Lifeline::new();
        let ran = Arc::new(AtomicBool::new(false));

        let flag = ran.clone();
        let task: TaskRef = TaskFn::arc(move |signal: Latch| {
            let flag = flag.clone();
            async move {
                flag.store(true, Ordering::SeqCst);
                signal.wait().await;
            }
        });
        life.spawn(task).unwrap();

        life.shutdown();
        life.wait(SECOND).await.unwrap();
        assert!(ran.load(Ordering::SeqCst));
    }
}
