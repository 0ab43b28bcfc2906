//! In-memory sink capturing emitted records for assertions.

use std::sync::{Arc, Mutex};

use lantern_logging::sink::LogSink;
use serde_json::Value;

/// Sink that parses every written line into a JSON value and keeps it.
///
/// Lines that fail to parse are kept verbatim as JSON strings so tests can
/// still see them.
#[derive(Debug, Default)]
pub struct CaptureSink {
    records: Mutex<Vec<Value>>,
}

impl CaptureSink {
    /// New empty sink behind an [`Arc`], ready to hand to logger options.
    #[must_use]
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Snapshot of every captured record, in emission order.
    ///
    /// # Panics
    ///
    /// Panics when a writer panicked while holding the capture lock.
    #[must_use]
    pub fn records(&self) -> Vec<Value> {
        self.records.lock().expect("capture lock").clone()
    }

    /// The `msg` field of every captured record, in emission order.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.records()
            .iter()
            .filter_map(|record| record["msg"].as_str().map(str::to_string))
            .collect()
    }

    /// The `level` field of every captured record, in emission order.
    #[must_use]
    pub fn levels(&self) -> Vec<String> {
        self.records()
            .iter()
            .filter_map(|record| record["level"].as_str().map(str::to_string))
            .collect()
    }

    /// Number of captured records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.lock().expect("capture lock").len()
    }

    /// Whether nothing was captured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every captured record.
    pub fn clear(&self) {
        self.records.lock().expect("capture lock").clear();
    }
}

impl LogSink for CaptureSink {
    fn write(&self, line: &str) {
        let value = serde_json::from_str(line)
            .unwrap_or_else(|_| Value::String(line.to_string()));
        if let Ok(mut records) = self.records.lock() {
            records.push(value);
        }
    }
}
