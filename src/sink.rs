//! Append-only, mutex-guarded line sinks.
//!
//! Each `append` writes one record and flushes it while holding the
//! sink's lock, so concurrent records never interleave. Ordering between
//! racing appenders is whatever order they win the lock in.
//!
//! The writer must not hold bytes back across calls: a record whose write
//! fails is dropped, and nothing may replay it behind a later record.

use std::path::Path;

use tokio::fs::File;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::Mutex;

use crate::error::{Error, Result};

/// Sink backed by a truncated file on disk.
///
/// Unbuffered on our side. `tokio::fs::File` discards its staging buffer
/// once a write completes, failed or not.
pub type FileWriter = File;

/// Result lines, one per completed task.
pub type ResultSink<W> = LineSink<W>;

/// Serialized writer of newline-terminated records.
#[derive(Debug)]
pub struct LineSink<W> {
    name: &'static str,
    writer: Mutex<W>,
}

impl<W> LineSink<W>
where
    W: AsyncWrite + Unpin + Send,
{
    pub fn new(name: &'static str, writer: W) -> Self {
        Self {
            name,
            writer: Mutex::new(writer),
        }
    }

    /// Write `line` plus a terminator and flush before returning.
    pub async fn append(&self, line: &str) -> Result<()> {
        let mut record = String::with_capacity(line.len() + 1);
        record.push_str(line);
        record.push('\n');

        let mut writer = self.writer.lock().await;
        writer
            .write_all(record.as_bytes())
            .await
            .map_err(|source| Error::SinkWrite {
                sink: self.name,
                source,
            })?;
        writer.flush().await.map_err(|source| Error::SinkWrite {
            sink: self.name,
            source,
        })
    }

    /// Shut the writer down and hand it back.
    ///
    /// Takes `self` by value: a sink still shared with a worker cannot be
    /// closed.
    pub async fn close(self) -> Result<W> {
        let mut writer = self.writer.into_inner();
        writer.shutdown().await.map_err(|source| Error::SinkWrite {
            sink: self.name,
            source,
        })?;
        Ok(writer)
    }
}

impl LineSink<FileWriter> {
    /// Create (or truncate) `path` and wrap it in a sink.
    pub async fn create(name: &'static str, path: &Path) -> Result<Self> {
        let file = File::create(path).await.map_err(|source| Error::SinkOpen {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::new(name, file))
    }
}
