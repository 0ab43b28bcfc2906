//! Correlation identifiers for inbound requests.
//!
//! Precedence: a configured generator always wins, then the configured header
//! when present on the request, then a process-local atomic counter. Counter
//! ids are unique among concurrently active requests; reuse across process
//! restarts is documented behaviour, not a defect.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use http::HeaderMap;
use uuid::Uuid;

/// Header consulted for an inbound correlation id unless reconfigured.
pub const DEFAULT_REQUEST_ID_HEADER: &str = "request-id";

/// Record field carrying the correlation id unless reconfigured.
pub const DEFAULT_REQUEST_ID_LABEL: &str = "reqId";

/// Custom id generator; authoritative when configured, regardless of headers.
pub type IdGenerator = Arc<dyn Fn(&HeaderMap) -> String + Send + Sync>;

/// Where to read an inbound correlation id from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdHeader {
    /// Read the named header when present.
    Name(String),
    /// Never read headers; always generate.
    Disabled,
}

impl Default for IdHeader {
    fn default() -> Self {
        Self::Name(DEFAULT_REQUEST_ID_HEADER.to_string())
    }
}

/// Configuration for [`RequestIdProvider`].
#[derive(Default, Clone)]
pub struct RequestIdConfig {
    /// Header source for inbound ids.
    pub header: IdHeader,
    /// Generator overriding both header extraction and the counter.
    pub generator: Option<IdGenerator>,
}

/// Assigns one correlation id per inbound request.
pub struct RequestIdProvider {
    config: RequestIdConfig,
    counter: AtomicU64,
}

impl RequestIdProvider {
    /// Provider honouring `config`.
    #[must_use]
    pub fn new(config: RequestIdConfig) -> Self {
        Self {
            config,
            counter: AtomicU64::new(0),
        }
    }

    /// Header name consulted for inbound ids, when extraction is enabled.
    #[must_use]
    pub fn header_name(&self) -> Option<&str> {
        match &self.config.header {
            IdHeader::Name(name) => Some(name),
            IdHeader::Disabled => None,
        }
    }

    /// Resolve the correlation id for one inbound request.
    pub fn assign(&self, headers: &HeaderMap) -> String {
        if let Some(generator) = &self.config.generator {
            return generator(headers);
        }
        if let IdHeader::Name(name) = &self.config.header {
            if let Some(value) = headers.get(name.as_str()).and_then(|v| v.to_str().ok()) {
                return value.to_string();
            }
        }
        let sequence = self.counter.fetch_add(1, Ordering::Relaxed) + 1;
        format!("req-{sequence}")
    }

    /// Ready-made generator producing v4 UUIDs.
    #[must_use]
    pub fn uuid_generator() -> IdGenerator {
        Arc::new(|_headers| Uuid::new_v4().to_string())
    }
}

impl Default for RequestIdProvider {
    fn default() -> Self {
        Self::new(RequestIdConfig::default())
    }
}
