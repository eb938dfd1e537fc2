//! Post-run reporting over the files a run leaves behind.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;
use uuid::Uuid;

use crate::engine::RunOutcome;
use crate::error::Result;
use crate::model::WorkerReport;

/// Plain-text summary of a finished run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub results_path: PathBuf,
    pub log_path: PathBuf,
    /// Lines found in the results file.
    pub total_results: usize,
}

impl Summary {
    /// Count result lines in `results_path`.
    pub async fn load(results_path: &Path, log_path: &Path) -> Result<Self> {
        let bytes = tokio::fs::read(results_path).await?;
        Ok(Self {
            results_path: results_path.to_path_buf(),
            log_path: log_path.to_path_buf(),
            total_results: count_lines(&bytes),
        })
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Processing Summary ===")?;
        writeln!(f, "Results written to: {}", self.results_path.display())?;
        writeln!(f, "Total results processed: {}", self.total_results)?;
        writeln!(f, "Processing log written to: {}", self.log_path.display())?;
        writeln!(f)?;
        writeln!(f, "Each result line shows:")?;
        writeln!(f, "  Original:  the task payload (task id x 100)")?;
        writeln!(f, "  Processed: original x 2 + task id")?;
        write!(f, "  e.g. Task 5: Original 500 -> Processed 1005")
    }
}

/// Newline-terminated records in `bytes`.
pub fn count_lines(bytes: &[u8]) -> usize {
    bytes.iter().filter(|&&b| b == b'\n').count()
}

/// Machine-readable run report.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub run_id: Uuid,
    pub enqueued: usize,
    pub processed: usize,
    pub failed: usize,
    pub workers: Vec<WorkerReport>,
}

impl<R, A> From<&RunOutcome<R, A>> for RunReport {
    fn from(outcome: &RunOutcome<R, A>) -> Self {
        Self {
            run_id: outcome.run_id,
            enqueued: outcome.enqueued,
            processed: outcome.processed(),
            failed: outcome.failed(),
            workers: outcome.reports.clone(),
        }
    }
}
