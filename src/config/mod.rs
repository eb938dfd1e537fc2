//! Typed pipeline configuration.
//!
//! Loaded once at startup from environment variables or a TOML file.
//! Everything has a default; only malformed values fail.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::transform::DelayRange;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    /// Size of the worker pool. Must be positive.
    pub workers: usize,
    /// Number of tasks preloaded into the queue.
    pub tasks: usize,
    pub delay_min_ms: u64,
    pub delay_max_ms: u64,
    pub results_path: PathBuf,
    pub log_path: PathBuf,
    pub otel_endpoint: Option<String>,
    pub log_level: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            workers: 5,
            tasks: 20,
            delay_min_ms: 50,
            delay_max_ms: 150,
            results_path: PathBuf::from("results.txt"),
            log_path: PathBuf::from("processing.log"),
            otel_endpoint: None,
            log_level: "info".to_string(),
        }
    }
}

impl PipelineConfig {
    /// Load configuration from environment variables.
    ///
    /// In local dev, call `dotenvy::dotenv().ok()` before this.
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();
        let config = Self {
            workers: parsed_var("PIPELINE_WORKERS")?.unwrap_or(defaults.workers),
            tasks: parsed_var("PIPELINE_TASKS")?.unwrap_or(defaults.tasks),
            delay_min_ms: parsed_var("PIPELINE_DELAY_MIN_MS")?.unwrap_or(defaults.delay_min_ms),
            delay_max_ms: parsed_var("PIPELINE_DELAY_MAX_MS")?.unwrap_or(defaults.delay_max_ms),
            results_path: std::env::var_os("PIPELINE_RESULTS_FILE")
                .map(PathBuf::from)
                .unwrap_or(defaults.results_path),
            log_path: std::env::var_os("PIPELINE_LOG_FILE")
                .map(PathBuf::from)
                .unwrap_or(defaults.log_path),
            otel_endpoint: std::env::var("OTEL_ENDPOINT").ok(),
            log_level: std::env::var("LOG_LEVEL").unwrap_or(defaults.log_level),
        };
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file. Missing keys take defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("cannot read config file {}: {e}", path.display()))
        })?;
        let config: Self = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("bad config file {}: {e}", path.display())))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the pipeline cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.workers == 0 {
            return Err(Error::Config("worker pool size must be positive".to_string()));
        }
        self.delay()?;
        Ok(())
    }

    pub fn delay(&self) -> Result<DelayRange> {
        DelayRange::from_millis(self.delay_min_ms, self.delay_max_ms)
    }
}

fn parsed_var<T>(name: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| Error::Config(format!("invalid {name}={raw:?}: {e}"))),
        Err(std::env::VarError::NotPresent) => Ok(None),
        Err(e) => Err(Error::Config(format!("invalid {name}: {e}"))),
    }
}
