#![forbid(unsafe_code)]
#![deny(
    warnings,
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]

//! Request-scoped structured logging for the Lantern HTTP stack.
//!
//! The crate builds a tree of registration scopes (root, nested plugin, route),
//! resolves each route's effective log level and serializer map exactly once at
//! registration time, and derives one child logger per inbound request bound to
//! a correlation identifier. Lifecycle events (`incoming request`,
//! `request completed`, error records) are emitted around handler execution by
//! [`RequestLifecycle`].
//!
//! Layout: `level.rs` (verbosity levels), `port.rs` (the abstract logger
//! capability set), `engine.rs` (the default JSON-line implementation),
//! `sink.rs` (byte destinations), `serializer.rs` (per-field value
//! transforms), `context.rs` (registration tree + frozen registry),
//! `resolver.rs` (effective configuration walk), `request_id.rs` (correlation
//! identifiers), `lifecycle.rs` (start/end events), `current.rs`
//! (process-wide and per-request accessors), `setup.rs` (logger defaulting and
//! structural validation).

pub mod context;
pub mod current;
pub mod engine;
pub mod error;
pub mod level;
pub mod lifecycle;
pub mod port;
pub mod request_id;
mod resolver;
pub mod serializer;
pub mod setup;
pub mod sink;
#[cfg(test)]
mod testutil;

pub use context::{
    Logging, LoggingBuilder, ResolvedRoute, RouteConfig, RouteId, ScopeConfig, ScopeId,
};
pub use current::{
    current_request_id, current_request_log, process_logger, set_process_logger, with_request_log,
};
pub use engine::EventLogger;
pub use error::{LoggingError, LoggingResult};
pub use level::Level;
pub use lifecycle::{RequestLifecycle, RequestLog, RequestOutcome};
pub use port::{Bindings, DeriveConfig, LoggerPort, NoopLogger};
pub use request_id::{
    DEFAULT_REQUEST_ID_HEADER, DEFAULT_REQUEST_ID_LABEL, IdGenerator, IdHeader, RequestIdConfig,
    RequestIdProvider,
};
pub use serializer::{SerializerFn, SerializerMap};
pub use setup::{LoggerOptions, LoggerParts, LoggerSetting, RootLogger, materialize};
pub use sink::{FileSink, LogSink, StderrSink, StdoutSink};
