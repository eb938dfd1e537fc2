//! Timestamped audit log shared by the coordinator and all workers.

use chrono::Local;
use tokio::io::AsyncWrite;
use tracing::{debug, error};

use crate::error::Result;
use crate::event::AuditEvent;
use crate::sink::{FileWriter, LineSink};

/// Millisecond-precision local time, e.g. `2024-05-01 13:04:05.123`.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// Append-only diagnostic log. Entries are `[<timestamp>] <message>`.
#[derive(Debug)]
pub struct AuditLog<W> {
    sink: LineSink<W>,
}

impl<W> AuditLog<W>
where
    W: AsyncWrite + Unpin + Send,
{
    pub fn new(writer: W) -> Self {
        Self {
            sink: LineSink::new("audit", writer),
        }
    }

    /// Record an event.
    ///
    /// The timestamp is taken before waiting on the lock. A failed write
    /// is reported to tracing and otherwise ignored.
    pub async fn record(&self, event: AuditEvent) {
        let entry = format!("[{}] {event}", Local::now().format(TIMESTAMP_FORMAT));
        debug!(target: "dataproc::audit", "{event}");
        if let Err(e) = self.sink.append(&entry).await {
            error!(error = %e, "failed to write audit entry");
        }
    }

    pub async fn close(self) -> Result<W> {
        self.sink.close().await
    }
}

impl AuditLog<FileWriter> {
    pub async fn create(path: &std::path::Path) -> Result<Self> {
        Ok(Self {
            sink: LineSink::<FileWriter>::create("audit", path).await?,
        })
    }
}
