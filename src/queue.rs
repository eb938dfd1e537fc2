//! Bounded, closable task queue between the coordinator and the worker pool.
//!
//! The producer half is owned by the coordinator and consumed by `close`,
//! so enqueue-after-close and double close cannot be expressed. The
//! consumer half is cloned into every worker; `dequeue` yields `None`
//! once the producer is closed and the buffer is drained, and keeps
//! yielding `None` after that.

use std::sync::Arc;

use tokio::sync::{Mutex, mpsc};
use tracing::debug;

use crate::error::{Error, Result};
use crate::model::Task;

/// Create a task queue that holds up to `capacity` tasks.
///
/// Size `capacity` to the total number of tasks so preload never fills
/// the buffer. A zero capacity is rounded up to one.
pub fn channel(capacity: usize) -> (TaskProducer, TaskSource) {
    let capacity = capacity.max(1);
    let (tx, rx) = mpsc::channel(capacity);
    (
        TaskProducer {
            tx,
            capacity,
            enqueued: 0,
        },
        TaskSource {
            rx: Arc::new(Mutex::new(rx)),
        },
    )
}

/// Writing half. Exactly one exists per queue.
#[derive(Debug)]
pub struct TaskProducer {
    tx: mpsc::Sender<Task>,
    capacity: usize,
    enqueued: usize,
}

impl TaskProducer {
    /// Insert a task without waiting.
    ///
    /// Fails with [`Error::QueueFull`] when the buffer is at capacity.
    pub fn enqueue(&mut self, task: Task) -> Result<()> {
        let task_id = task.id;
        match self.tx.try_send(task) {
            Ok(()) => {
                self.enqueued += 1;
                debug!(task_id, "task enqueued");
                Ok(())
            }
            Err(mpsc::error::TrySendError::Full(_)) => Err(Error::QueueFull {
                capacity: self.capacity,
                task_id,
            }),
            Err(mpsc::error::TrySendError::Closed(_)) => Err(Error::QueueClosed { task_id }),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn enqueued(&self) -> usize {
        self.enqueued
    }

    /// Close the queue. Returns how many tasks were enqueued.
    ///
    /// Buffered tasks stay available to consumers; once they are drained
    /// every `dequeue` returns `None`.
    pub fn close(self) -> usize {
        debug!(enqueued = self.enqueued, "task queue closed");
        self.enqueued
    }
}

/// Reading half, shared by all workers.
#[derive(Debug, Clone)]
pub struct TaskSource {
    rx: Arc<Mutex<mpsc::Receiver<Task>>>,
}

impl TaskSource {
    /// Wait for the next task.
    ///
    /// Blocks the calling worker only while the queue is empty but still
    /// open. Returns `None` once closed and drained.
    pub async fn dequeue(&self) -> Option<Task> {
        let mut rx = self.rx.lock().await;
        rx.recv().await
    }
}
