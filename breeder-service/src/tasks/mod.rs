//! Delayed breeder creation and its status tracking
//!
//! - [`TaskTracker`]: concurrent map of task id to [`TaskState`]
//! - [`DelayedCreationWorker`]: schedules the deferred persistence and the
//!   eviction sweep, and drains outstanding work on shutdown

mod tracker;
mod worker;

pub use tracker::{TaskEntry, TaskState, TaskStatusResponse, TaskTracker};
pub use worker::DelayedCreationWorker;
