//! Metric instruments for pipeline runs.
//!
//! Instruments come from the globally registered `MeterProvider`; without
//! one they are no-ops.

use opentelemetry::metrics::{Counter, Histogram, Meter};

fn meter() -> Meter {
    opentelemetry::global::meter("dataproc-rs")
}

/// Counter: tasks placed on the queue during preload.
pub fn tasks_enqueued() -> Counter<u64> {
    meter()
        .u64_counter("dataproc.tasks.enqueued")
        .with_description("Number of tasks enqueued")
        .build()
}

/// Counter: tasks whose result line was written.
/// Labels: `worker`.
pub fn tasks_completed() -> Counter<u64> {
    meter()
        .u64_counter("dataproc.tasks.completed")
        .with_description("Number of tasks completed")
        .build()
}

/// Counter: abandoned tasks.
/// Labels: `stage` ("compute" | "emit").
pub fn tasks_failed() -> Counter<u64> {
    meter()
        .u64_counter("dataproc.tasks.failed")
        .with_description("Number of tasks abandoned after a failure")
        .build()
}

/// Histogram: time from dequeue to result written, in milliseconds.
pub fn task_duration_ms() -> Histogram<f64> {
    meter()
        .f64_histogram("dataproc.task.duration_ms")
        .with_description("Task processing duration in milliseconds")
        .with_unit("ms")
        .build()
}
