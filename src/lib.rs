//! # dataproc-rs
//!
//! In-process producer/consumer pipeline. A coordinator preloads a bounded
//! task queue, a fixed pool of tokio workers drains it, and every result
//! and diagnostic goes through a mutex-guarded, append-only sink.
//!
//! Tracing and optional OpenTelemetry export cover the run itself; the
//! audit log is the operator-facing record of what each worker did.

pub mod audit;
pub mod config;
pub mod engine;
pub mod error;
pub mod event;
pub mod model;
pub mod queue;
pub mod sink;
pub mod summary;
pub mod telemetry;
pub mod transform;
