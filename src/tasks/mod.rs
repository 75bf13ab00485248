//! # Task abstractions.
//!
//! This module provides the task-facing types:
//! - [`Task`] - trait for implementing async, cooperatively stopping tasks
//! - [`TaskFn`] - function-based task implementation
//! - [`TaskRef`] - shared reference to a task (`Arc<dyn Task>`)

mod task;
mod task_fn;

pub use task::Task;
pub use task_fn::{TaskFn, TaskRef};
