//! Tracing and OpenTelemetry setup for pipeline runs.
//!
//! Always installs a `tracing-subscriber` fmt layer filtered by
//! `RUST_LOG` (falling back to the configured level). With an OTLP
//! endpoint, worker and task spans, pipeline metrics, and log events
//! are exported there as well.

pub mod metrics;
pub mod work;

use opentelemetry_sdk::Resource;
use opentelemetry_sdk::logs::SdkLoggerProvider;
use opentelemetry_sdk::metrics::SdkMeterProvider;
use opentelemetry_sdk::trace::SdkTracerProvider;

use crate::error::{Error, Result};

/// Configuration for telemetry initialization.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// Optional OTLP endpoint (e.g. "http://localhost:4317").
    /// When `None`, only the fmt layer is installed.
    pub endpoint: Option<String>,
    /// The service name reported in telemetry signals.
    pub service_name: String,
    /// Filter directive used when `RUST_LOG` is unset (e.g. "info").
    pub log_level: String,
}

/// Flushes and shuts down OTel providers on drop.
///
/// Hold it until the pipeline run has finished.
#[derive(Default)]
pub struct TelemetryGuard {
    providers: Option<OtlpProviders>,
}

struct OtlpProviders {
    tracer: SdkTracerProvider,
    meter: SdkMeterProvider,
    logger: SdkLoggerProvider,
}

impl TelemetryGuard {
    /// Whether spans and metrics are being exported.
    pub fn is_exporting(&self) -> bool {
        self.providers.is_some()
    }
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        if let Some(p) = self.providers.take() {
            let _ = p.logger.shutdown();
            let _ = p.meter.shutdown();
            let _ = p.tracer.shutdown();
        }
    }
}

/// Install the global tracing subscriber.
///
/// # Errors
///
/// Fails if the log level is not a valid filter directive, an OTLP
/// exporter cannot be built, or a global subscriber is already set.
pub fn init_telemetry(config: TelemetryConfig) -> Result<TelemetryGuard> {
    use opentelemetry::trace::TracerProvider as _;
    use tracing_subscriber::EnvFilter;
    use tracing_subscriber::layer::SubscriberExt as _;
    use tracing_subscriber::util::SubscriberInitExt as _;

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .map_err(|e| Error::Config(format!("invalid log level {:?}: {e}", config.log_level)))?;

    let Some(endpoint) = config.endpoint else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .try_init()
            .map_err(|e| Error::Other(format!("failed to init tracing subscriber: {e}")))?;
        return Ok(TelemetryGuard::default());
    };

    let providers = build_otlp_providers(&endpoint, config.service_name)?;
    opentelemetry::global::set_meter_provider(providers.meter.clone());

    let trace_layer =
        tracing_opentelemetry::layer().with_tracer(providers.tracer.tracer("dataproc-rs"));
    let log_layer = opentelemetry_appender_tracing::layer::OpenTelemetryTracingBridge::new(
        &providers.logger,
    );

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().compact())
        .with(trace_layer)
        .with(log_layer)
        .try_init()
        .map_err(|e| Error::Other(format!("failed to init tracing subscriber: {e}")))?;

    Ok(TelemetryGuard {
        providers: Some(providers),
    })
}

fn build_otlp_providers(endpoint: &str, service_name: String) -> Result<OtlpProviders> {
    use opentelemetry_otlp::WithExportConfig as _;

    let resource = Resource::builder().with_service_name(service_name).build();

    let spans = opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .with_endpoint(endpoint)
        .build()
        .map_err(|e| Error::Other(format!("failed to create OTLP span exporter: {e}")))?;
    let tracer = SdkTracerProvider::builder()
        .with_batch_exporter(spans)
        .with_resource(resource.clone())
        .build();

    let metrics = opentelemetry_otlp::MetricExporter::builder()
        .with_tonic()
        .with_endpoint(endpoint)
        .build()
        .map_err(|e| Error::Other(format!("failed to create OTLP metric exporter: {e}")))?;
    let meter = SdkMeterProvider::builder()
        .with_periodic_exporter(metrics)
        .with_resource(resource.clone())
        .build();

    let logs = opentelemetry_otlp::LogExporter::builder()
        .with_tonic()
        .with_endpoint(endpoint)
        .build()
        .map_err(|e| Error::Other(format!("failed to create OTLP log exporter: {e}")))?;
    let logger = SdkLoggerProvider::builder()
        .with_batch_exporter(logs)
        .with_resource(resource)
        .build();

    Ok(OtlpProviders {
        tracer,
        meter,
        logger,
    })
}
