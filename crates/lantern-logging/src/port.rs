//! Abstract logger capability set.
//!
//! The core never names a concrete logging engine: everything downstream of
//! registration works against [`LoggerPort`]. The default implementation lives
//! in [`crate::engine`]; [`NoopLogger`] backs the disabled case; externally
//! assembled loggers enter through [`crate::setup::LoggerParts`].

use std::sync::Arc;

use serde_json::Value;

use crate::level::Level;
use crate::serializer::SerializerMap;

/// Static fields merged into every record emitted by a logger instance.
pub type Bindings = serde_json::Map<String, Value>;

/// Configuration applied when deriving a logger for a resolved route.
#[derive(Debug, Default, Clone)]
pub struct DeriveConfig {
    /// Effective level for the derived logger; `None` keeps the parent's.
    pub level: Option<Level>,
    /// Merged serializer map for the derived logger.
    pub serializers: SerializerMap,
    /// Static fields bound to the derived logger.
    pub bindings: Bindings,
}

/// Capability set every logger exposes: six severity methods plus `child`.
///
/// Implementations are shared immutable state; all methods take `&self` and
/// derivation never mutates the receiver, so read-only instances are fine.
pub trait LoggerPort: Send + Sync {
    /// Whether records at `level` would be emitted.
    fn enabled(&self, level: Level) -> bool;

    /// Emit one record. Fields are `(name, value)` pairs serialised by the
    /// engine; emission is fire-and-forget.
    fn log(&self, level: Level, message: &str, fields: &[(&str, Value)]);

    /// Derive a child logger with `bindings` merged into every record.
    fn child(&self, bindings: Bindings) -> Arc<dyn LoggerPort>;

    /// Derive a logger re-bound with route-resolved configuration.
    ///
    /// Engines that own their threshold and serializer map apply all of
    /// `config`; the default falls back to [`LoggerPort::child`], keeping
    /// external implementations' own filtering in charge.
    fn derive(&self, config: DeriveConfig) -> Arc<dyn LoggerPort> {
        self.child(config.bindings)
    }

    /// Emit at [`Level::Trace`].
    fn trace(&self, message: &str, fields: &[(&str, Value)]) {
        self.log(Level::Trace, message, fields);
    }

    /// Emit at [`Level::Debug`].
    fn debug(&self, message: &str, fields: &[(&str, Value)]) {
        self.log(Level::Debug, message, fields);
    }

    /// Emit at [`Level::Info`].
    fn info(&self, message: &str, fields: &[(&str, Value)]) {
        self.log(Level::Info, message, fields);
    }

    /// Emit at [`Level::Warn`].
    fn warn(&self, message: &str, fields: &[(&str, Value)]) {
        self.log(Level::Warn, message, fields);
    }

    /// Emit at [`Level::Error`].
    fn error(&self, message: &str, fields: &[(&str, Value)]) {
        self.log(Level::Error, message, fields);
    }

    /// Emit at [`Level::Fatal`].
    fn fatal(&self, message: &str, fields: &[(&str, Value)]) {
        self.log(Level::Fatal, message, fields);
    }
}

/// Logger with the full capability set and no output.
///
/// Returned when logging is disabled so callers never branch on "is logging
/// enabled".
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopLogger;

impl LoggerPort for NoopLogger {
    fn enabled(&self, _level: Level) -> bool {
        false
    }

    fn log(&self, _level: Level, _message: &str, _fields: &[(&str, Value)]) {}

    fn child(&self, _bindings: Bindings) -> Arc<dyn LoggerPort> {
        Arc::new(Self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn noop_logger_exposes_full_capability_set() {
        let logger = NoopLogger;
        logger.trace("t", &[]);
        logger.debug("d", &[]);
        logger.info("i", &[("k", json!(1))]);
        logger.warn("w", &[]);
        logger.error("e", &[]);
        logger.fatal("f", &[]);
        let child = logger.child(Bindings::new());
        child.info("from child", &[]);
        assert!(!child.enabled(Level::Fatal));
    }

    #[test]
    fn default_derive_falls_back_to_child() {
        let logger = NoopLogger;
        let derived = logger.derive(DeriveConfig {
            level: Some(Level::Trace),
            ..DeriveConfig::default()
        });
        assert!(!derived.enabled(Level::Trace));
    }
}
