//! # lifeline
//!
//! **Lifeline** is a lifecycle handle for groups of async tasks that stop
//! cooperatively.
//!
//! One [`Lifeline`] covers one logical unit of work (a server, a connection,
//! a batch). A supervisor spawns any number of tokio tasks under it,
//! broadcasts "begin shutdown" without waiting, and then learns, by polling
//! or by a timed wait, when every spawned task has actually finished.
//!
//! ## Architecture
//! ```text
//! supervisor ──spawn──► Lifeline ──tokio::spawn──► task body
//!                          │                          │
//!                          │◄── live count +1         │ awaits dying latch
//!   shutdown() ──────────► │                          │
//!     trips dying latch ───┼──────────────────────────►│ task returns
//!                          │◄── live count −1 ◄────────┘
//!                          │    (dying && count == 0)
//!                          ▼
//!                     dead latch set ──► wait() / is_dead() / dead()
//! ```
//!
//! The handle has three observable states, `Alive → Dying → Dead`, and moves
//! through them monotonically:
//!
//! - **Alive**: tasks may be spawned.
//! - **Dying**: [`Lifeline::shutdown`] was called; the shutdown [`Latch`] is
//!   set and no further task is admitted, but some are still running.
//! - **Dead**: every spawned task has finished; the terminal latch is set.
//!
//! Stopping is cooperative: the handle never aborts a task, it only trips the
//! latch each task received. Tasks that ignore it keep the handle Dying,
//! which a [`Lifeline::wait`] call surfaces as a timeout.
//!
//! ## Features
//! | Area          | Description                                             | Key types                        |
//! |---------------|---------------------------------------------------------|----------------------------------|
//! | **Lifecycle** | Spawn, broadcast shutdown, await group completion.      | [`Lifeline`], [`State`]          |
//! | **Signals**   | One-shot broadcast latch, multi-observer, timed waits.  | [`Latch`]                        |
//! | **Tasks**     | Define tasks as closures or trait impls.                | [`Task`], [`TaskFn`], [`TaskRef`]|
//! | **Errors**    | Typed, recoverable admission and wait errors.           | [`SpawnError`], [`WaitError`]    |
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
//!     // A worker that runs until shutdown begins.
//!     life.spawn_fn(|signal: Latch| async move {
//!         while !signal.is_set() {
//!             // do a slice of work...
//!             tokio::task::yield_now().await;
//!         }
//!     })?;
//!
//!     life.shutdown();
//!     life.wait(Duration::from_secs(1)).await?;
//!     assert!(life.is_dead());
//!     Ok(())
//! }
//! ```

mod error;
mod latch;
mod lifeline;
mod state;
mod tasks;

// ---- Public re-exports ----

pub use error::{SpawnError, WaitError};
pub use latch::Latch;
pub use lifeline::Lifeline;
pub use state::State;
pub use tasks::{Task, TaskFn, TaskRef};
