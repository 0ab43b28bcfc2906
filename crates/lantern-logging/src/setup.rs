//! Logger defaulting and structural validation.
//!
//! [`materialize`] turns whatever the caller supplied — nothing, `Disabled`,
//! an options struct, a Rust-native [`LoggerPort`] instance, or a logger
//! assembled from dynamic parts — into the root logger used for every
//! registration scope.
//!
//! Policy for the malformed-vs-absent boundary: `Default` and `Disabled` fall
//! back silently (default engine / no-op port); a [`LoggerParts`] value missing
//! required slots is a hard [`LoggingError::InvalidLogger`] naming every
//! missing member. Native trait implementations need no validation — the type
//! system already guarantees the capability set.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use serde_json::Value;

use crate::engine::EventLogger;
use crate::error::{LoggingError, LoggingResult};
use crate::level::Level;
use crate::port::{Bindings, LoggerPort, NoopLogger};
use crate::request_id::DEFAULT_REQUEST_ID_LABEL;
use crate::serializer::SerializerMap;
use crate::sink::{FileSink, LogSink, StdoutSink};

/// Slots a [`LoggerParts`] value must fill to pass validation.
const REQUIRED_MEMBERS: [&str; 2] = ["fatal", "child"];

/// Emission slot for one severity of a dynamically assembled logger.
pub type EmitFn = Arc<dyn Fn(&str, &Bindings) + Send + Sync>;

/// Child-derivation slot for a dynamically assembled logger.
pub type ChildFn = Arc<dyn Fn(&Bindings) -> LoggerParts + Send + Sync>;

/// Logger supplied by the caller, in order of decreasing specificity.
#[derive(Default)]
pub enum LoggerSetting {
    /// Nothing supplied: the default JSON engine at [`Level::Info`] on stdout.
    #[default]
    Default,
    /// Logging switched off: a no-op port with the full capability set.
    Disabled,
    /// Construct the default engine from options.
    Options(LoggerOptions),
    /// A Rust-native port implementation, used as-is.
    Instance(Arc<dyn LoggerPort>),
    /// A logger assembled from parts, validated structurally.
    Parts(LoggerParts),
}

/// Options for constructing the default engine.
#[derive(Default)]
pub struct LoggerOptions {
    /// Emission threshold; defaults to [`Level::Info`].
    pub level: Option<Level>,
    /// Explicit destination; wins over `file`.
    pub sink: Option<Arc<dyn LogSink>>,
    /// File destination opened in append mode.
    pub file: Option<PathBuf>,
    /// Root serializer map.
    pub serializers: SerializerMap,
    /// Top-level fields overwritten with a redaction marker.
    pub redact: Vec<String>,
    /// Record field carrying the correlation id; defaults to `"reqId"`.
    pub request_id_label: Option<String>,
}

/// Per-capability slots for a logger assembled at runtime (for example an
/// adapter bridging an embedding's callback table).
///
/// Missing severity slots degrade to no-ops; missing required slots (`fatal`
/// and `child`) fail validation.
#[derive(Default, Clone)]
pub struct LoggerParts {
    /// Emission slot for [`Level::Fatal`]; required.
    pub fatal: Option<EmitFn>,
    /// Emission slot for [`Level::Error`].
    pub error: Option<EmitFn>,
    /// Emission slot for [`Level::Warn`].
    pub warn: Option<EmitFn>,
    /// Emission slot for [`Level::Info`].
    pub info: Option<EmitFn>,
    /// Emission slot for [`Level::Debug`].
    pub debug: Option<EmitFn>,
    /// Emission slot for [`Level::Trace`].
    pub trace: Option<EmitFn>,
    /// Child-derivation slot; required.
    pub child: Option<ChildFn>,
}

impl LoggerParts {
    /// Empty parts; fill slots before materialising.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Required members absent from this value, in declaration order.
    #[must_use]
    pub fn missing_members(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.fatal.is_none() {
            missing.push(REQUIRED_MEMBERS[0]);
        }
        if self.child.is_none() {
            missing.push(REQUIRED_MEMBERS[1]);
        }
        missing
    }

    fn slot(&self, level: Level) -> Option<&EmitFn> {
        match level {
            Level::Trace => self.trace.as_ref(),
            Level::Debug => self.debug.as_ref(),
            Level::Info => self.info.as_ref(),
            Level::Warn => self.warn.as_ref(),
            Level::Error => self.error.as_ref(),
            Level::Fatal => self.fatal.as_ref(),
        }
    }
}

/// Root logger plus the configuration the resolver needs as its floor.
pub struct RootLogger {
    /// Port every registration scope derives from.
    pub port: Arc<dyn LoggerPort>,
    /// Root-configured level, the floor for route resolution.
    pub level: Level,
    /// Root-declared serializer map, the base for route resolution.
    pub serializers: SerializerMap,
    /// Record field carrying the correlation id.
    pub request_id_label: String,
}

impl fmt::Debug for RootLogger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RootLogger")
            .field("level", &self.level)
            .field("request_id_label", &self.request_id_label)
            .finish_non_exhaustive()
    }
}

/// Materialise the caller's logger setting into the root logger.
///
/// # Errors
///
/// Returns [`LoggingError::InvalidLogger`] when a [`LoggerSetting::Parts`]
/// value is missing required slots, or [`LoggingError::SinkOpen`] when a file
/// destination cannot be opened. Both are fatal to setup: the server must not
/// silently fall back when handed a malformed logger.
pub fn materialize(setting: LoggerSetting) -> LoggingResult<RootLogger> {
    match setting {
        LoggerSetting::Default => Ok(RootLogger {
            port: Arc::new(EventLogger::new(Arc::new(StdoutSink), Level::Info)),
            level: Level::Info,
            serializers: SerializerMap::new(),
            request_id_label: DEFAULT_REQUEST_ID_LABEL.to_string(),
        }),
        LoggerSetting::Disabled => Ok(RootLogger {
            port: Arc::new(NoopLogger),
            level: Level::Info,
            serializers: SerializerMap::new(),
            request_id_label: DEFAULT_REQUEST_ID_LABEL.to_string(),
        }),
        LoggerSetting::Options(options) => {
            let level = options.level.unwrap_or_default();
            let sink: Arc<dyn LogSink> = match (options.sink, options.file) {
                (Some(sink), _) => sink,
                (None, Some(path)) => Arc::new(FileSink::open(path)?),
                (None, None) => Arc::new(StdoutSink),
            };
            let port = EventLogger::new(sink, level)
                .with_serializers(options.serializers.clone())
                .with_redaction(options.redact);
            Ok(RootLogger {
                port: Arc::new(port),
                level,
                serializers: options.serializers,
                request_id_label: options
                    .request_id_label
                    .unwrap_or_else(|| DEFAULT_REQUEST_ID_LABEL.to_string()),
            })
        }
        LoggerSetting::Instance(port) => Ok(RootLogger {
            port,
            level: Level::Info,
            serializers: SerializerMap::new(),
            request_id_label: DEFAULT_REQUEST_ID_LABEL.to_string(),
        }),
        LoggerSetting::Parts(parts) => {
            let missing = parts.missing_members();
            if !missing.is_empty() {
                return Err(LoggingError::InvalidLogger { missing });
            }
            Ok(RootLogger {
                port: Arc::new(PartsLogger {
                    parts,
                    bindings: Bindings::new(),
                }),
                level: Level::Info,
                serializers: SerializerMap::new(),
                request_id_label: DEFAULT_REQUEST_ID_LABEL.to_string(),
            })
        }
    }
}

/// Port adapter over validated [`LoggerParts`].
///
/// Unfilled severity slots are silent; strictness applies only at setup.
/// Children returned by the `child` slot are wrapped leniently because the
/// slot signature cannot surface a setup error mid-request.
struct PartsLogger {
    parts: LoggerParts,
    bindings: Bindings,
}

impl LoggerPort for PartsLogger {
    fn enabled(&self, level: Level) -> bool {
        self.parts.slot(level).is_some()
    }

    fn log(&self, level: Level, message: &str, fields: &[(&str, Value)]) {
        if let Some(emit) = self.parts.slot(level) {
            let mut merged = self.bindings.clone();
            for (field, value) in fields {
                merged.insert((*field).to_string(), value.clone());
            }
            emit(message, &merged);
        }
    }

    fn child(&self, bindings: Bindings) -> Arc<dyn LoggerPort> {
        let mut merged = self.bindings.clone();
        merged.extend(bindings);
        let parts = self
            .parts
            .child
            .as_ref()
            .map_or_else(|| self.parts.clone(), |derive| derive(&merged));
        Arc::new(Self {
            parts,
            bindings: merged,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    fn recording_parts(seen: Arc<Mutex<Vec<String>>>) -> LoggerParts {
        let mut parts = LoggerParts::new();
        let sink = Arc::clone(&seen);
        parts.fatal = Some(Arc::new(move |message: &str, _fields: &Bindings| {
            sink.lock().expect("lock").push(message.to_string());
        }));
        parts.child = Some(Arc::new(|_bindings: &Bindings| LoggerParts::new()));
        parts
    }

    #[test]
    fn default_setting_yields_info_engine() -> LoggingResult<()> {
        let root = materialize(LoggerSetting::Default)?;
        assert_eq!(root.level, Level::Info);
        assert_eq!(root.request_id_label, "reqId");
        assert!(root.port.enabled(Level::Info));
        assert!(!root.port.enabled(Level::Debug));
        Ok(())
    }

    #[test]
    fn disabled_setting_yields_callable_noop() -> LoggingResult<()> {
        let root = materialize(LoggerSetting::Disabled)?;
        root.port.trace("t", &[]);
        root.port.debug("d", &[]);
        root.port.info("i", &[]);
        root.port.warn("w", &[]);
        root.port.error("e", &[]);
        root.port.fatal("f", &[]);
        root.port.child(Bindings::new()).info("still callable", &[]);
        assert!(!root.port.enabled(Level::Fatal));
        Ok(())
    }

    #[test]
    fn parts_missing_child_fail_with_member_name() {
        let mut parts = LoggerParts::new();
        parts.fatal = Some(Arc::new(|_message: &str, _fields: &Bindings| {}));

        let err = materialize(LoggerSetting::Parts(parts)).expect_err("must fail");
        match err {
            LoggingError::InvalidLogger { missing } => {
                assert_eq!(missing, vec!["child"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn parts_missing_everything_list_all_members() {
        let err = materialize(LoggerSetting::Parts(LoggerParts::new())).expect_err("must fail");
        match err {
            LoggingError::InvalidLogger { missing } => {
                assert_eq!(missing, vec!["fatal", "child"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn valid_parts_dispatch_to_slots() -> LoggingResult<()> {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let root = materialize(LoggerSetting::Parts(recording_parts(Arc::clone(&seen))))?;

        root.port.fatal("boom", &[]);
        root.port.info("silent", &[]);
        assert_eq!(*seen.lock().expect("lock"), vec!["boom".to_string()]);
        assert!(root.port.enabled(Level::Fatal));
        assert!(!root.port.enabled(Level::Info));
        Ok(())
    }

    #[test]
    fn options_honor_level_and_label() -> LoggingResult<()> {
        let root = materialize(LoggerSetting::Options(LoggerOptions {
            level: Some(Level::Debug),
            request_id_label: Some("correlationId".to_string()),
            ..LoggerOptions::default()
        }))?;
        assert_eq!(root.level, Level::Debug);
        assert_eq!(root.request_id_label, "correlationId");
        assert!(root.port.enabled(Level::Debug));
        Ok(())
    }
}
