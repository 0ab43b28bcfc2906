//! Per-route request-logging middleware.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context as TaskContext, Poll};

use http::{HeaderName, HeaderValue, Request};
use lantern_logging::{Logging, RequestOutcome, RouteId, with_request_log};

/// Correlation id assigned to the request, readable from request extensions
/// before the task-local scope is entered.
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

/// Terminal failure reported by a handler or error handler through response
/// extensions.
///
/// When absent, the outcome is derived from the status code alone. `handled`
/// marks errors a custom error handler already consumed; the lifecycle logger
/// then emits no error-severity record of its own.
#[derive(Debug, Clone)]
pub struct RequestFailure {
    message: String,
    handled: bool,
}

impl RequestFailure {
    /// Failure no error handler consumed.
    #[must_use]
    pub fn unhandled(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            handled: false,
        }
    }

    /// Failure a custom error handler consumed.
    #[must_use]
    pub fn handled(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            handled: true,
        }
    }
}

/// Wraps one route's service with the request-logging lifecycle.
#[derive(Clone)]
pub struct RequestLoggingLayer {
    logging: Arc<Logging>,
    route: RouteId,
}

impl RequestLoggingLayer {
    /// Layer for the route registered as `route` in `logging`.
    #[must_use]
    pub const fn new(logging: Arc<Logging>, route: RouteId) -> Self {
        Self { logging, route }
    }
}

impl<S> tower::Layer<S> for RequestLoggingLayer {
    type Service = RequestLoggingService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RequestLoggingService {
            inner,
            logging: Arc::clone(&self.logging),
            route: self.route,
        }
    }
}

/// Service produced by [`RequestLoggingLayer`].
#[derive(Clone)]
pub struct RequestLoggingService<S> {
    inner: S,
    logging: Arc<Logging>,
    route: RouteId,
}

impl<S, B> tower::Service<Request<B>> for RequestLoggingService<S>
where
    S: tower::Service<Request<B>, Response = axum::response::Response> + Clone + Send + 'static,
    S::Future: Send + 'static,
    S::Error: Send,
    B: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut TaskContext<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<B>) -> Self::Future {
        let logging = Arc::clone(&self.logging);
        let method = req.method().clone();
        let path = req.uri().path().to_string();

        // Start synchronously: the id and child logger exist before the
        // handler runs, even when lifecycle logging is disabled.
        let request_log = logging.lifecycle().on_request_start(
            logging.route(self.route),
            &method,
            &path,
            req.headers(),
        );
        let id = request_log.id().to_string();
        req.extensions_mut().insert(RequestId(id.clone()));
        let echo_header = logging.lifecycle().header_name().map(str::to_string);
        let log = request_log.logger();
        let fut = self.inner.call(req);

        Box::pin(async move {
            let mut response = with_request_log(id.clone(), log, fut).await?;

            if let Some(name) = echo_header {
                if let (Ok(name), Ok(value)) = (
                    HeaderName::from_bytes(name.as_bytes()),
                    HeaderValue::from_str(&id),
                ) {
                    response.headers_mut().insert(name, value);
                }
            }

            let status = response.status().as_u16();
            let outcome = response.extensions().get::<RequestFailure>().map_or_else(
                || RequestOutcome::success(status),
                |failure| {
                    if failure.handled {
                        RequestOutcome::handled_failure(status, failure.message.clone())
                    } else {
                        RequestOutcome::failure(status, failure.message.clone())
                    }
                },
            );
            // Consuming the request log here is the finalize-once guard: the
            // end transition cannot run twice for one request.
            logging.lifecycle().on_request_end(request_log, &outcome);
            Ok(response)
        })
    }
}
