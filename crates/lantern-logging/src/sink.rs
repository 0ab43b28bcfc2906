//! Byte destinations for serialised log lines.
//!
//! Emission is fire-and-forget: the request path never waits for a line to be
//! durably written, and write failures are swallowed rather than surfaced to
//! the request being handled. Ordering of bytes is the destination's concern.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::Mutex;

use crate::error::{LoggingError, LoggingResult};

/// Destination for one serialised record per call.
pub trait LogSink: Send + Sync {
    /// Write a single serialised record. Must not block request handling on
    /// durability and must not panic on IO failure.
    fn write(&self, line: &str);
}

/// Sink writing one line per record to standard output.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutSink;

impl LogSink for StdoutSink {
    fn write(&self, line: &str) {
        let stdout = std::io::stdout();
        let mut handle = stdout.lock();
        let _ = writeln!(handle, "{line}");
    }
}

/// Sink writing one line per record to standard error.
#[derive(Debug, Default, Clone, Copy)]
pub struct StderrSink;

impl LogSink for StderrSink {
    fn write(&self, line: &str) {
        let stderr = std::io::stderr();
        let mut handle = stderr.lock();
        let _ = writeln!(handle, "{line}");
    }
}

/// Sink appending one line per record to a file.
#[derive(Debug)]
pub struct FileSink {
    writer: Mutex<BufWriter<File>>,
}

impl FileSink {
    /// Open `path` for appending, creating it when absent.
    ///
    /// # Errors
    ///
    /// Returns [`LoggingError::SinkOpen`] when the file cannot be opened.
    pub fn open(path: impl AsRef<Path>) -> LoggingResult<Self> {
        let path = path.as_ref();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|source| LoggingError::SinkOpen {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(Self {
            writer: Mutex::new(BufWriter::new(file)),
        })
    }
}

impl LogSink for FileSink {
    fn write(&self, line: &str) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(writer, "{line}");
        }
    }
}
