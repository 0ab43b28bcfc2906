//! Automatic lifecycle events around request handling.
//!
//! One child logger is derived per inbound request from the matching route's
//! pre-resolved logger, bound to the correlation id. The start hook emits
//! `incoming request`; the end hook emits `request completed` or error records
//! depending on the terminal outcome. Consuming [`RequestLog`] by value makes
//! the end transition happen at most once per request; duplicate finalize
//! attempts are the transport's to report.

use std::sync::Arc;
use std::time::Instant;

use http::{HeaderMap, Method};
use serde_json::json;

use crate::context::ResolvedRoute;
use crate::level::Level;
use crate::port::{Bindings, LoggerPort};
use crate::request_id::RequestIdProvider;

/// Per-request logging state, exclusively owned by one request's flow.
pub struct RequestLog {
    id: String,
    log: Arc<dyn LoggerPort>,
    started_at: Instant,
}

impl RequestLog {
    /// Correlation id assigned to this request.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Request-scoped child logger; the one handlers must use.
    #[must_use]
    pub fn logger(&self) -> Arc<dyn LoggerPort> {
        Arc::clone(&self.log)
    }

    /// Monotonic instant captured at request start.
    #[must_use]
    pub const fn started_at(&self) -> Instant {
        self.started_at
    }
}

/// Terminal outcome of request processing, reported by the transport.
#[derive(Debug, Clone)]
pub struct RequestOutcome {
    status: u16,
    error: Option<String>,
    handled: bool,
}

impl RequestOutcome {
    /// Request finished without an error object.
    #[must_use]
    pub const fn success(status: u16) -> Self {
        Self {
            status,
            error: None,
            handled: false,
        }
    }

    /// Request failed and no custom error handler consumed the error.
    #[must_use]
    pub const fn failure(status: u16, message: String) -> Self {
        Self {
            status,
            error: Some(message),
            handled: false,
        }
    }

    /// Request failed but a custom error handler consumed the error; its own
    /// logging calls are the only record.
    #[must_use]
    pub const fn handled_failure(status: u16, message: String) -> Self {
        Self {
            status,
            error: Some(message),
            handled: true,
        }
    }

    /// Final response status code.
    #[must_use]
    pub const fn status(&self) -> u16 {
        self.status
    }
}

/// Start/end hooks the transport invokes around handler execution.
pub struct RequestLifecycle {
    provider: RequestIdProvider,
    id_label: String,
    disabled: bool,
}

impl RequestLifecycle {
    pub(crate) fn new(provider: RequestIdProvider, id_label: String, disabled: bool) -> Self {
        Self {
            provider,
            id_label,
            disabled,
        }
    }

    /// Record field carrying the correlation id.
    #[must_use]
    pub fn id_label(&self) -> &str {
        &self.id_label
    }

    /// Header consulted for inbound correlation ids, when enabled.
    #[must_use]
    pub fn header_name(&self) -> Option<&str> {
        self.provider.header_name()
    }

    /// Whether automatic lifecycle events are suppressed server-wide.
    #[must_use]
    pub const fn disabled(&self) -> bool {
        self.disabled
    }

    /// Assign a correlation id, derive the request-scoped child logger, and
    /// emit `incoming request` unless lifecycle logging is disabled.
    #[must_use]
    pub fn on_request_start(
        &self,
        route: &ResolvedRoute,
        method: &Method,
        path: &str,
        headers: &HeaderMap,
    ) -> RequestLog {
        let id = self.provider.assign(headers);
        let mut bindings = Bindings::new();
        bindings.insert(self.id_label.clone(), json!(id));
        let log = route.logger().child(bindings);

        if !self.disabled {
            log.info(
                "incoming request",
                &[("req", json!({ "method": method.as_str(), "url": path }))],
            );
        }

        RequestLog {
            id,
            log,
            started_at: Instant::now(),
        }
    }

    /// Emit the end-of-request records for `outcome`.
    ///
    /// Unhandled errors with a 5xx status produce an error-severity record
    /// carrying the error message before the completion record; unhandled 4xx
    /// errors log the message at informational severity. Handled errors add
    /// nothing beyond the completion record.
    pub fn on_request_end(&self, request: RequestLog, outcome: &RequestOutcome) {
        if self.disabled {
            return;
        }

        let response_time = request.started_at.elapsed().as_secs_f64() * 1000.0;
        let server_error = outcome.status >= 500;

        if !outcome.handled {
            if let Some(message) = &outcome.error {
                let severity = if server_error {
                    Level::Error
                } else {
                    Level::Info
                };
                request.log.log(severity, message, &[]);
            }
        }

        let completion_severity = if server_error && !outcome.handled {
            Level::Error
        } else {
            Level::Info
        };
        request.log.log(
            completion_severity,
            "request completed",
            &[
                ("res", json!({ "statusCode": outcome.status })),
                ("responseTime", json!(response_time)),
            ],
        );
    }
}
