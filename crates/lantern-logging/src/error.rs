//! Error types for logging setup and registration.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result alias for logging operations.
pub type LoggingResult<T> = Result<T, LoggingError>;

/// Errors raised while materialising loggers or building the registry.
///
/// Setup errors are fatal to startup; nothing here is produced on the
/// per-request path.
#[derive(Debug, Error)]
pub enum LoggingError {
    /// A user-supplied logger failed structural validation.
    #[error("invalid logger: missing required members: {}", missing.join(", "))]
    InvalidLogger {
        /// Every required member absent from the supplied logger.
        missing: Vec<&'static str>,
    },
    /// A level name could not be parsed.
    #[error("invalid log level")]
    InvalidLevel {
        /// Offending level string.
        value: String,
    },
    /// The configured log destination could not be opened.
    #[error("failed to open log destination")]
    SinkOpen {
        /// Destination path that failed to open.
        path: PathBuf,
        /// Underlying IO error.
        source: io::Error,
    },
    /// A scope or route referenced a registration handle from another builder.
    #[error("unknown registration scope")]
    UnknownScope {
        /// Index carried by the foreign handle.
        index: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_logger_names_every_missing_member() {
        let err = LoggingError::InvalidLogger {
            missing: vec!["fatal", "child"],
        };
        let message = err.to_string();
        assert!(message.contains("fatal"));
        assert!(message.contains("child"));
    }

    #[test]
    fn sink_open_preserves_source() {
        let err = LoggingError::SinkOpen {
            path: PathBuf::from("/var/log/lantern.log"),
            source: io::Error::other("disk full"),
        };
        assert_eq!(err.to_string(), "failed to open log destination");
        assert!(std::error::Error::source(&err).is_some());
    }
}
