//! Tower glue between the HTTP transport and the logging lifecycle.
//!
//! The transport itself (socket accept, routing) lives elsewhere; this crate
//! only provides the seam: a per-route layer that invokes the lifecycle hooks
//! around the inner service, scopes the task-local request logger, and echoes
//! the correlation id on the response.

pub mod layer;

pub use layer::{RequestFailure, RequestId, RequestLoggingLayer, RequestLoggingService};
