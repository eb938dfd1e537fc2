//! Core data model.
//!
//! A task is one immutable unit of work. It is created by the coordinator
//! during preload, handed to exactly one worker, and dropped once that
//! worker is done with it.

use std::fmt;

use serde::Serialize;

/// Task identifier. Positive, unique, assigned in increasing order.
pub type TaskId = u64;

/// Worker identifier, 1-based.
pub type WorkerId = usize;

// ---------------------------------------------------------------------------
// Task
// ---------------------------------------------------------------------------

/// A unit of work drained from the task source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub id: TaskId,
    /// Opaque label. Only used for audit output.
    pub description: String,
    /// Integer payload fed to the transform.
    pub value: i64,
}

impl Task {
    pub fn new(id: TaskId, description: impl Into<String>, value: i64) -> Self {
        Self {
            id,
            description: description.into(),
            value,
        }
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Task[id={}, description='{}', data={}]",
            self.id, self.description, self.value
        )
    }
}

/// Generate `count` tasks with ids `1..=count`, in ascending order.
///
/// Each task carries `id * 100` as its payload.
pub fn preload_tasks(count: usize) -> Vec<Task> {
    (1..=count as u64)
        .map(|id| Task::new(id, format!("Process data item {id}"), id as i64 * 100))
        .collect()
}

// ---------------------------------------------------------------------------
// Result line
// ---------------------------------------------------------------------------

/// One completed task, rendered as a result sink line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskResult {
    pub task_id: TaskId,
    pub worker_id: WorkerId,
    pub original: i64,
    pub processed: i64,
}

impl fmt::Display for TaskResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Task {} processed by Worker-{} | Original: {} | Processed: {}",
            self.task_id, self.worker_id, self.original, self.processed
        )
    }
}

// ---------------------------------------------------------------------------
// Worker lifecycle
// ---------------------------------------------------------------------------

/// Worker lifecycle: Starting -> Running -> Draining -> Terminated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    Starting,
    Running,
    Draining,
    Terminated,
}

impl WorkerState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Starting => "starting",
            Self::Running => "running",
            Self::Draining => "draining",
            Self::Terminated => "terminated",
        }
    }
}

impl fmt::Display for WorkerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a worker reports once, at termination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WorkerReport {
    pub worker_id: WorkerId,
    /// Tasks whose result line reached the result sink.
    pub tasks_processed: usize,
    /// Tasks abandoned after a compute or emit failure.
    pub tasks_failed: usize,
}

impl WorkerReport {
    /// Tasks this worker pulled from the source, successful or not.
    pub fn tasks_attempted(&self) -> usize {
        self.tasks_processed + self.tasks_failed
    }
}
