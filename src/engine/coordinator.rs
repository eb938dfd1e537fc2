//! Coordinator: preload the queue, run the worker pool, close the sinks.

use std::sync::Arc;

use tokio::io::AsyncWrite;
use tracing::{Instrument, error, info};
use uuid::Uuid;

use crate::audit::AuditLog;
use crate::config::PipelineConfig;
use crate::error::{Error, Result};
use crate::event::AuditEvent;
use crate::model::{Task, WorkerReport};
use crate::queue;
use crate::sink::ResultSink;
use crate::telemetry::metrics;
use crate::telemetry::work::start_run_span;
use crate::transform::{DelayRange, Transform};

use super::worker::Worker;

/// Settings that shape a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoordinatorConfig {
    /// Number of workers launched. Must be positive.
    pub workers: usize,
    /// Simulated work delay drawn per task.
    pub delay: DelayRange,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            workers: 5,
            delay: DelayRange::default(),
        }
    }
}

impl TryFrom<&PipelineConfig> for CoordinatorConfig {
    type Error = Error;

    fn try_from(config: &PipelineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            workers: config.workers,
            delay: config.delay()?,
        })
    }
}

/// What a finished run hands back.
#[derive(Debug)]
pub struct RunOutcome<R, A> {
    pub run_id: Uuid,
    /// Tasks placed on the queue.
    pub enqueued: usize,
    /// One report per worker, in launch order.
    pub reports: Vec<WorkerReport>,
    /// The closed result sink's writer.
    pub results: R,
    /// The closed audit log's writer.
    pub audit: A,
}

impl<R, A> RunOutcome<R, A> {
    /// Result lines written, summed over worker reports.
    pub fn processed(&self) -> usize {
        self.reports.iter().map(|r| r.tasks_processed).sum()
    }

    pub fn failed(&self) -> usize {
        self.reports.iter().map(|r| r.tasks_failed).sum()
    }
}

/// Owns the queue and sink lifetimes for a single run.
pub struct Coordinator {
    config: CoordinatorConfig,
    transform: Arc<dyn Transform>,
}

impl Coordinator {
    pub fn new(config: CoordinatorConfig, transform: impl Transform + 'static) -> Result<Self> {
        if config.workers == 0 {
            return Err(Error::Config("worker pool size must be positive".to_string()));
        }
        Ok(Self {
            config,
            transform: Arc::new(transform),
        })
    }

    /// Run `tasks` through the worker pool.
    ///
    /// The queue is sized to `tasks`, filled, and closed before any worker
    /// starts. Sinks are closed only after every worker has been joined,
    /// and are closed even when the join fails.
    ///
    /// # Errors
    ///
    /// Setup errors (queue misuse) abort before workers launch. A worker
    /// that panics surfaces as [`Error::WorkerJoin`] after shutdown.
    pub async fn run<R, A>(
        &self,
        tasks: Vec<Task>,
        results: ResultSink<R>,
        audit: AuditLog<A>,
    ) -> Result<RunOutcome<R, A>>
    where
        R: AsyncWrite + Unpin + Send + 'static,
        A: AsyncWrite + Unpin + Send + 'static,
    {
        let run_id = Uuid::new_v4();
        let span = start_run_span(&run_id, self.config.workers, tasks.len());
        self.run_inner(run_id, tasks, results, audit)
            .instrument(span)
            .await
    }

    async fn run_inner<R, A>(
        &self,
        run_id: Uuid,
        tasks: Vec<Task>,
        results: ResultSink<R>,
        audit: AuditLog<A>,
    ) -> Result<RunOutcome<R, A>>
    where
        R: AsyncWrite + Unpin + Send + 'static,
        A: AsyncWrite + Unpin + Send + 'static,
    {
        audit.record(AuditEvent::SystemStarted).await;

        // Preload, then close: every task is visible before any worker runs.
        let (mut producer, source) = queue::channel(tasks.len());
        for task in tasks {
            let task_id = task.id;
            producer.enqueue(task)?;
            audit.record(AuditEvent::TaskEnqueued { task_id }).await;
        }
        let enqueued = producer.close();
        metrics::tasks_enqueued().add(enqueued as u64, &[]);
        info!(enqueued, workers = self.config.workers, "queue loaded");

        let results = Arc::new(results);
        let audit = Arc::new(audit);

        audit
            .record(AuditEvent::WorkersLaunching {
                count: self.config.workers,
            })
            .await;

        let handles: Vec<_> = (1..=self.config.workers)
            .map(|worker_id| {
                let worker = Worker::new(
                    worker_id,
                    source.clone(),
                    Arc::clone(&results),
                    Arc::clone(&audit),
                    Arc::clone(&self.transform),
                    self.config.delay,
                );
                tokio::spawn(worker.run())
            })
            .collect();
        drop(source);

        let mut reports = Vec::with_capacity(handles.len());
        let mut wait_error = None;
        for handle in handles {
            match handle.await {
                Ok(report) => reports.push(report),
                Err(e) => {
                    error!(error = %e, "worker did not terminate cleanly");
                    audit
                        .record(AuditEvent::WaitFailed {
                            error: e.to_string(),
                        })
                        .await;
                    wait_error.get_or_insert(Error::WorkerJoin(e.to_string()));
                }
            }
        }

        if wait_error.is_none() {
            audit.record(AuditEvent::WorkersCompleted).await;
            info!(
                processed = reports.iter().map(|r| r.tasks_processed).sum::<usize>(),
                "all workers completed"
            );
        }

        let results = match Arc::try_unwrap(results) {
            Ok(sink) => sink.close().await,
            Err(_) => Err(Error::SinkInUse("results")),
        };
        audit.record(AuditEvent::SystemShutdown).await;
        let audit = match Arc::try_unwrap(audit) {
            Ok(log) => log.close().await,
            Err(_) => Err(Error::SinkInUse("audit")),
        };

        if let Some(e) = wait_error {
            // Return the wait error; close failures only get logged.
            if let Err(close) = &results {
                error!(error = %close, "result sink close failed after wait error");
            }
            if let Err(close) = &audit {
                error!(error = %close, "audit log close failed after wait error");
            }
            return Err(e);
        }

        Ok(RunOutcome {
            run_id,
            enqueued,
            reports,
            results: results?,
            audit: audit?,
        })
    }
}
