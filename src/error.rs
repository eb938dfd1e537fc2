//! Error types for dataproc-rs.

use std::path::PathBuf;

use thiserror::Error;

use crate::model::TaskId;
use crate::transform::TransformError;

#[derive(Debug, Error)]
pub enum Error {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("task queue full (capacity {capacity}), cannot enqueue task {task_id}")]
    QueueFull { capacity: usize, task_id: TaskId },

    #[error("task queue closed, cannot enqueue task {task_id}")]
    QueueClosed { task_id: TaskId },

    #[error("cannot open {} for writing: {source}", path.display())]
    SinkOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{sink} write failed: {source}")]
    SinkWrite {
        sink: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("{0} sink still shared, cannot close while appends may be in flight")]
    SinkInUse(&'static str),

    #[error("transform failed: {source}")]
    Transform {
        task_id: TaskId,
        #[source]
        source: TransformError,
    },

    #[error("worker pool wait failed: {0}")]
    WorkerJoin(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, Error>;
