//! Audit events emitted by the coordinator and workers.
//!
//! Every entry in the audit log is one of these. `Display` renders the
//! operator-facing message; the audit log adds the timestamp.

use std::fmt;

use crate::model::{Task, TaskId, WorkerId};

#[derive(Debug, Clone)]
pub enum AuditEvent {
    SystemStarted,
    TaskEnqueued {
        task_id: TaskId,
    },
    WorkersLaunching {
        count: usize,
    },
    WorkerStarted {
        worker_id: WorkerId,
    },
    TaskProcessing {
        worker_id: WorkerId,
        task: Task,
    },
    TaskCompleted {
        worker_id: WorkerId,
        task_id: TaskId,
    },
    ComputeFailed {
        worker_id: WorkerId,
        task_id: TaskId,
        error: String,
    },
    EmitFailed {
        worker_id: WorkerId,
        task_id: TaskId,
        error: String,
    },
    QueueDrained {
        worker_id: WorkerId,
    },
    WorkerFinished {
        worker_id: WorkerId,
        tasks_processed: usize,
    },
    WorkersCompleted,
    WaitFailed {
        error: String,
    },
    SystemShutdown,
}

impl fmt::Display for AuditEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SystemStarted => f.write_str("System initialization started"),
            Self::TaskEnqueued { task_id } => write!(f, "Task {task_id} added to queue"),
            Self::WorkersLaunching { count } => write!(f, "Starting {count} workers"),
            Self::WorkerStarted { worker_id } => write!(f, "Worker-{worker_id} started"),
            Self::TaskProcessing { worker_id, task } => {
                write!(f, "Worker-{worker_id} processing {task}")
            }
            Self::TaskCompleted { worker_id, task_id } => {
                write!(f, "Worker-{worker_id} completed Task {task_id}")
            }
            Self::ComputeFailed {
                worker_id,
                task_id,
                error,
            } => write!(
                f,
                "ERROR: Worker-{worker_id} failed to process Task {task_id}: {error}"
            ),
            Self::EmitFailed {
                worker_id,
                task_id,
                error,
            } => write!(
                f,
                "ERROR: Worker-{worker_id} failed to write result for Task {task_id}: {error}"
            ),
            Self::QueueDrained { worker_id } => {
                write!(f, "Worker-{worker_id} found empty queue, finishing")
            }
            Self::WorkerFinished {
                worker_id,
                tasks_processed,
            } => write!(
                f,
                "Worker-{worker_id} finished after processing {tasks_processed} tasks"
            ),
            Self::WorkersCompleted => f.write_str("All workers completed"),
            Self::WaitFailed { error } => write!(f, "ERROR: worker pool wait failed: {error}"),
            Self::SystemShutdown => f.write_str("System shutdown complete"),
        }
    }
}
