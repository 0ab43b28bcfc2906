//! Default JSON-line logging engine.
//!
//! One record becomes one JSON object line: `level`, `time` (RFC 3339 UTC),
//! `msg`, then child bindings, then call-site fields. Field serializers run
//! before emission; redacted fields are overwritten last.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use serde_json::Value;

use crate::level::Level;
use crate::port::{Bindings, DeriveConfig, LoggerPort};
use crate::serializer::SerializerMap;
use crate::sink::LogSink;

/// Value substituted for redacted fields.
const REDACTED: &str = "[Redacted]";

/// Reserved record fields that bindings and call fields may not displace.
const RESERVED_FIELDS: [&str; 3] = ["level", "time", "msg"];

/// Default [`LoggerPort`] implementation writing JSON lines to a sink.
///
/// Instances are immutable; [`LoggerPort::child`] and [`LoggerPort::derive`]
/// return new instances sharing the same sink.
#[derive(Clone)]
pub struct EventLogger {
    shared: Arc<EngineShared>,
    level: Level,
    serializers: SerializerMap,
    bindings: Bindings,
}

struct EngineShared {
    sink: Arc<dyn LogSink>,
    redact: HashSet<String>,
}

impl EventLogger {
    /// Engine emitting at `level` and above into `sink`.
    #[must_use]
    pub fn new(sink: Arc<dyn LogSink>, level: Level) -> Self {
        Self {
            shared: Arc::new(EngineShared {
                sink,
                redact: HashSet::new(),
            }),
            level,
            serializers: SerializerMap::new(),
            bindings: Bindings::new(),
        }
    }

    /// Replace the serializer map applied to emitted fields.
    #[must_use]
    pub fn with_serializers(mut self, serializers: SerializerMap) -> Self {
        self.serializers = serializers;
        self
    }

    /// Overwrite the named top-level fields with a redaction marker.
    #[must_use]
    pub fn with_redaction(self, fields: impl IntoIterator<Item = String>) -> Self {
        Self {
            shared: Arc::new(EngineShared {
                sink: Arc::clone(&self.shared.sink),
                redact: fields.into_iter().collect(),
            }),
            ..self
        }
    }

    /// Level at and above which this instance emits.
    #[must_use]
    pub const fn level(&self) -> Level {
        self.level
    }

    fn serialize_bindings(&self, bindings: Bindings) -> Bindings {
        bindings
            .into_iter()
            .map(|(field, value)| {
                let value = self.serializers.apply(&field, value);
                (field, value)
            })
            .collect()
    }
}

impl LoggerPort for EventLogger {
    fn enabled(&self, level: Level) -> bool {
        level >= self.level
    }

    fn log(&self, level: Level, message: &str, fields: &[(&str, Value)]) {
        if !self.enabled(level) {
            return;
        }

        let mut record = Bindings::new();
        record.insert("level".to_string(), Value::String(level.as_str().into()));
        record.insert("time".to_string(), Value::String(Utc::now().to_rfc3339()));
        record.insert("msg".to_string(), Value::String(message.into()));
        for (field, value) in &self.bindings {
            if !RESERVED_FIELDS.contains(&field.as_str()) {
                record.insert(field.clone(), value.clone());
            }
        }
        for (field, value) in fields {
            if !RESERVED_FIELDS.contains(field) {
                let value = self.serializers.apply(field, value.clone());
                record.insert((*field).to_string(), value);
            }
        }
        for field in &self.shared.redact {
            if record.contains_key(field) {
                record.insert(field.clone(), Value::String(REDACTED.into()));
            }
        }

        if let Ok(line) = serde_json::to_string(&Value::Object(record)) {
            self.shared.sink.write(&line);
        }
    }

    fn child(&self, bindings: Bindings) -> Arc<dyn LoggerPort> {
        let mut merged = self.bindings.clone();
        merged.extend(self.serialize_bindings(bindings));
        Arc::new(Self {
            shared: Arc::clone(&self.shared),
            level: self.level,
            serializers: self.serializers.clone(),
            bindings: merged,
        })
    }

    fn derive(&self, config: DeriveConfig) -> Arc<dyn LoggerPort> {
        let derived = Self {
            shared: Arc::clone(&self.shared),
            level: config.level.unwrap_or(self.level),
            serializers: config.serializers,
            bindings: self.bindings.clone(),
        };
        let mut merged = derived.bindings.clone();
        merged.extend(derived.serialize_bindings(config.bindings));
        Arc::new(Self {
            bindings: merged,
            ..derived
        })
    }
}
