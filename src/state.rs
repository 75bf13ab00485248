//! Lifecycle states.

use std::fmt;

/// Observable state of a [`Lifeline`](crate::Lifeline).
///
/// Transitions are monotonic: `Alive → Dying → Dead`, each at most once,
/// never backward. The state is derived on read from the handle's internal
/// bookkeeping, so it can never drift from what the signals report.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum State {
    /// Shutdown has not been requested; new tasks may be spawned.
    Alive,
    /// Shutdown was requested; some tasks are still running.
    Dying,
    /// Shutdown was requested and every spawned task has finished.
    Dead,
}

impl State {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_str(&self) -> &'static str {
        match self {
            State::Alive => "alive",
            State::Dying => "dying",
            State::Dead => "dead",
        }
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
