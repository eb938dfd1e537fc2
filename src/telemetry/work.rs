//! Span helpers for workers and the tasks they execute.

use tracing::Span;
use uuid::Uuid;

use crate::model::{TaskId, WorkerId, WorkerState};

/// Span covering one whole pipeline run.
pub fn start_run_span(run_id: &Uuid, workers: usize, tasks: usize) -> Span {
    tracing::info_span!(
        "pipeline.run",
        "run.id" = %run_id,
        "run.workers" = workers,
        "run.tasks" = tasks,
    )
}

/// Span covering a worker from start to termination.
///
/// `worker.state` is declared empty and filled in by
/// [`record_state_transition`].
pub fn start_worker_span(worker_id: WorkerId) -> Span {
    tracing::info_span!(
        "pipeline.worker",
        "worker.id" = worker_id,
        "worker.state" = tracing::field::Empty,
    )
}

/// Span covering one task inside a worker.
pub fn start_task_span(worker_id: WorkerId, task_id: TaskId) -> Span {
    tracing::info_span!(
        "pipeline.task",
        "worker.id" = worker_id,
        "task.id" = task_id,
    )
}

/// Record a worker state transition on its span.
pub fn record_state_transition(span: &Span, from: WorkerState, to: WorkerState) {
    span.record("worker.state", to.as_str());
    span.in_scope(|| {
        tracing::info!(from = from.as_str(), to = to.as_str(), "state_transition");
    });
}
