//! Integration tests for telemetry initialization and span helpers.

use dataproc_rs::model::WorkerState;
use dataproc_rs::telemetry::{self, TelemetryConfig};

#[test]
fn telemetry_initializes_without_endpoint() {
    // A global subscriber can only be set once per process; a second
    // init returning Err is acceptable here.
    let guard = telemetry::init_telemetry(TelemetryConfig {
        endpoint: None,
        service_name: "dataproc-test".to_string(),
        log_level: "debug".to_string(),
    });
    if let Ok(guard) = guard {
        assert!(!guard.is_exporting());
    }
}

#[test]
fn worker_span_records_lifecycle() {
    let span = telemetry::work::start_worker_span(1);
    telemetry::work::record_state_transition(&span, WorkerState::Starting, WorkerState::Running);
    telemetry::work::record_state_transition(&span, WorkerState::Running, WorkerState::Draining);
    telemetry::work::record_state_transition(
        &span,
        WorkerState::Draining,
        WorkerState::Terminated,
    );
}

#[test]
fn run_and_task_spans_create() {
    let run = telemetry::work::start_run_span(&uuid::Uuid::new_v4(), 5, 20);
    let _enter = run.enter();
    let _task = telemetry::work::start_task_span(2, 7);
}

#[test]
fn metric_instruments_are_noop_without_provider() {
    telemetry::metrics::tasks_enqueued().add(3, &[]);
    telemetry::metrics::tasks_failed().add(1, &[opentelemetry::KeyValue::new("stage", "emit")]);
    telemetry::metrics::task_duration_ms().record(12.5, &[]);
}
