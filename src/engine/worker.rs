//! Worker loop: fetch a task, compute its result, emit it, repeat.
//!
//! The only way out of the loop is an exhausted queue. A failed compute or
//! a failed result write abandons that task and moves on to the next.

use std::sync::Arc;
use std::time::Instant;

use opentelemetry::KeyValue;
use tokio::io::AsyncWrite;
use tracing::{Instrument, info, warn};

use crate::audit::AuditLog;
use crate::error::{Error, Result};
use crate::event::AuditEvent;
use crate::model::{Task, TaskResult, WorkerId, WorkerReport, WorkerState};
use crate::queue::TaskSource;
use crate::sink::ResultSink;
use crate::telemetry::metrics;
use crate::telemetry::work::{record_state_transition, start_task_span, start_worker_span};
use crate::transform::{DelayRange, Transform, simulate_work};

/// One member of the worker pool.
pub struct Worker<R, A> {
    id: WorkerId,
    source: TaskSource,
    results: Arc<ResultSink<R>>,
    audit: Arc<AuditLog<A>>,
    transform: Arc<dyn Transform>,
    delay: DelayRange,
}

impl<R, A> Worker<R, A>
where
    R: AsyncWrite + Unpin + Send,
    A: AsyncWrite + Unpin + Send,
{
    pub fn new(
        id: WorkerId,
        source: TaskSource,
        results: Arc<ResultSink<R>>,
        audit: Arc<AuditLog<A>>,
        transform: Arc<dyn Transform>,
        delay: DelayRange,
    ) -> Self {
        Self {
            id,
            source,
            results,
            audit,
            transform,
            delay,
        }
    }

    /// Drain the source until it is closed and empty, then report.
    pub async fn run(self) -> WorkerReport {
        let span = start_worker_span(self.id);
        let lifecycle = span.clone();

        async move {
            let mut report = WorkerReport {
                worker_id: self.id,
                tasks_processed: 0,
                tasks_failed: 0,
            };

            self.audit
                .record(AuditEvent::WorkerStarted { worker_id: self.id })
                .await;
            record_state_transition(&lifecycle, WorkerState::Starting, WorkerState::Running);

            while let Some(task) = self.source.dequeue().await {
                let task_span = start_task_span(self.id, task.id);
                if self.process(task).instrument(task_span).await {
                    report.tasks_processed += 1;
                } else {
                    report.tasks_failed += 1;
                }
            }

            record_state_transition(&lifecycle, WorkerState::Running, WorkerState::Draining);
            self.audit
                .record(AuditEvent::QueueDrained { worker_id: self.id })
                .await;

            record_state_transition(&lifecycle, WorkerState::Draining, WorkerState::Terminated);
            self.audit
                .record(AuditEvent::WorkerFinished {
                    worker_id: self.id,
                    tasks_processed: report.tasks_processed,
                })
                .await;
            info!(
                processed = report.tasks_processed,
                failed = report.tasks_failed,
                "worker finished"
            );

            report
        }
        .instrument(span)
        .await
    }

    /// Handle one task. Returns whether its result line was written.
    async fn process(&self, task: Task) -> bool {
        let task_id = task.id;
        let started = Instant::now();
        self.audit
            .record(AuditEvent::TaskProcessing {
                worker_id: self.id,
                task: task.clone(),
            })
            .await;

        let result = match self.compute(&task).await {
            Ok(result) => result,
            Err(e) => {
                warn!(error = %e, "task compute failed");
                metrics::tasks_failed().add(1, &[KeyValue::new("stage", "compute")]);
                self.audit
                    .record(AuditEvent::ComputeFailed {
                        worker_id: self.id,
                        task_id,
                        error: e.to_string(),
                    })
                    .await;
                return false;
            }
        };

        if let Err(e) = self.results.append(&result.to_string()).await {
            warn!(error = %e, "result write failed");
            metrics::tasks_failed().add(1, &[KeyValue::new("stage", "emit")]);
            self.audit
                .record(AuditEvent::EmitFailed {
                    worker_id: self.id,
                    task_id,
                    error: e.to_string(),
                })
                .await;
            return false;
        }

        let duration_ms = started.elapsed().as_secs_f64() * 1000.0;
        metrics::task_duration_ms().record(duration_ms, &[]);
        metrics::tasks_completed().add(1, &[KeyValue::new("worker", self.id as i64)]);
        info!(processed = result.processed, duration_ms, "task completed");
        self.audit
            .record(AuditEvent::TaskCompleted {
                worker_id: self.id,
                task_id,
            })
            .await;
        true
    }

    async fn compute(&self, task: &Task) -> Result<TaskResult> {
        simulate_work(self.delay).await;
        let processed = self
            .transform
            .apply(task.id, task.value)
            .map_err(|source| Error::Transform {
                task_id: task.id,
                source,
            })?;
        Ok(TaskResult {
            task_id: task.id,
            worker_id: self.id,
            original: task.value,
            processed,
        })
    }
}
