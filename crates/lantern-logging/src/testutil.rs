//! In-crate recording sink for unit tests.
//!
//! Unit tests cannot use `lantern-test-support`: the dev-dependency cycle
//! would link a second instantiation of this crate and the sink trait would
//! not unify. Integration tests under `tests/` use the shared crate instead.

use std::sync::{Arc, Mutex};

use serde_json::Value;

use crate::sink::LogSink;

pub(crate) struct MemorySink {
    records: Mutex<Vec<Value>>,
}

impl MemorySink {
    pub(crate) fn shared() -> Arc<Self> {
        Arc::new(Self {
            records: Mutex::new(Vec::new()),
        })
    }

    pub(crate) fn records(&self) -> Vec<Value> {
        self.records.lock().expect("memory sink lock").clone()
    }

    pub(crate) fn messages(&self) -> Vec<String> {
        self.records()
            .iter()
            .filter_map(|record| record["msg"].as_str().map(str::to_string))
            .collect()
    }
}

impl LogSink for MemorySink {
    fn write(&self, line: &str) {
        let value =
            serde_json::from_str(line).unwrap_or_else(|_| Value::String(line.to_string()));
        self.records.lock().expect("memory sink lock").push(value);
    }
}
