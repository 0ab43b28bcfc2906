//! Process-wide and per-request logger accessors.
//!
//! The process logger is installed once at startup and readable from anywhere
//! outside a request. The request-scoped logger lives in task-local storage,
//! valid only within the request flow that entered it.

use std::future::Future;
use std::sync::Arc;

use once_cell::sync::OnceCell;

use crate::port::{LoggerPort, NoopLogger};

static PROCESS_LOGGER: OnceCell<Arc<dyn LoggerPort>> = OnceCell::new();

/// Install the process-wide root logger. The first installation wins; later
/// calls are ignored.
pub fn set_process_logger(logger: Arc<dyn LoggerPort>) {
    let _ = PROCESS_LOGGER.set(logger);
}

/// Process-wide root logger, for use outside any request. Falls back to a
/// no-op port before installation.
#[must_use]
pub fn process_logger() -> Arc<dyn LoggerPort> {
    PROCESS_LOGGER
        .get()
        .map_or_else(|| Arc::new(NoopLogger) as Arc<dyn LoggerPort>, Arc::clone)
}

#[derive(Clone)]
struct ActiveRequest {
    id: Arc<str>,
    log: Arc<dyn LoggerPort>,
}

tokio::task_local! {
    static ACTIVE_REQUEST: ActiveRequest;
}

/// Execute `fut` with the request-scoped logger and id available downstream.
pub async fn with_request_log<Fut, T>(
    id: impl Into<String>,
    log: Arc<dyn LoggerPort>,
    fut: Fut,
) -> T
where
    Fut: Future<Output = T>,
{
    let active = ActiveRequest {
        id: Arc::from(id.into()),
        log,
    };
    ACTIVE_REQUEST.scope(active, fut).await
}

/// Request-scoped child logger for the current flow, if inside one.
#[must_use]
pub fn current_request_log() -> Option<Arc<dyn LoggerPort>> {
    ACTIVE_REQUEST.try_with(|active| Arc::clone(&active.log)).ok()
}

/// Correlation id for the current flow, if inside one.
#[must_use]
pub fn current_request_id() -> Option<String> {
    ACTIVE_REQUEST
        .try_with(|active| active.id.as_ref().to_string())
        .ok()
}
