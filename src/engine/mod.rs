//! Pipeline engine: the coordinator and the worker pool it drives.

pub mod coordinator;
pub mod worker;

pub use coordinator::{Coordinator, CoordinatorConfig, RunOutcome};
pub use worker::Worker;
