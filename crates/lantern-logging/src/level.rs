//! Verbosity levels shared across the logging subsystem.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use serde::Serialize;

use crate::error::LoggingError;

/// Verbosity threshold applied to log emission.
///
/// Ordering follows severity: `Trace < Debug < Info < Warn < Error < Fatal`.
/// A logger configured at some level emits records at that level and above.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    /// Finest-grained diagnostic detail.
    Trace,
    /// Developer-facing diagnostic detail.
    Debug,
    /// Normal operational events.
    Info,
    /// Degraded but recoverable conditions.
    Warn,
    /// Operational failures.
    Error,
    /// Unrecoverable failures; the process is expected to stop.
    Fatal,
}

impl Level {
    /// Stable lowercase name used in emitted records.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
            Self::Fatal => "fatal",
        }
    }
}

impl Default for Level {
    fn default() -> Self {
        Self::Info
    }
}

impl Display for Level {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = LoggingError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "trace" => Ok(Self::Trace),
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warn" => Ok(Self::Warn),
            "error" => Ok(Self::Error),
            "fatal" => Ok(Self::Fatal),
            other => Err(LoggingError::InvalidLevel {
                value: other.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_order_by_severity() {
        assert!(Level::Trace < Level::Debug);
        assert!(Level::Debug < Level::Info);
        assert!(Level::Info < Level::Warn);
        assert!(Level::Warn < Level::Error);
        assert!(Level::Error < Level::Fatal);
    }

    #[test]
    fn level_round_trips_through_names() -> Result<(), LoggingError> {
        for level in [
            Level::Trace,
            Level::Debug,
            Level::Info,
            Level::Warn,
            Level::Error,
            Level::Fatal,
        ] {
            assert_eq!(level.as_str().parse::<Level>()?, level);
        }
        Ok(())
    }

    #[test]
    fn unknown_level_name_is_rejected() {
        let err = "verbose".parse::<Level>().expect_err("must fail");
        assert_eq!(err.to_string(), "invalid log level");
    }

    #[test]
    fn default_level_is_info() {
        assert_eq!(Level::default(), Level::Info);
    }
}
