//! Registration scopes and the frozen logging registry.
//!
//! Registration builds an arena-backed tree of context nodes (root, nested
//! plugin scopes, routes). [`LoggingBuilder::build`] freezes the tree,
//! resolves every route's effective configuration exactly once, and returns an
//! immutable [`Logging`] registry that is read-only shared state for the rest
//! of the process — no locking is needed at request time because no writer
//! exists after the registration phase.

use std::fmt;
use std::sync::Arc;

use http::Method;

use crate::error::{LoggingError, LoggingResult};
use crate::level::Level;
use crate::lifecycle::RequestLifecycle;
use crate::port::{Bindings, DeriveConfig, LoggerPort};
use crate::request_id::{RequestIdConfig, RequestIdProvider};
use crate::resolver;
use crate::serializer::SerializerMap;
use crate::setup::{LoggerSetting, RootLogger, materialize};

/// Handle to a registration scope within one builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScopeId(pub(crate) usize);

/// Handle to a registered route within one registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RouteId(pub(crate) usize);

/// Logging overrides declared by a nested registration scope.
#[derive(Debug, Default, Clone)]
pub struct ScopeConfig {
    /// Level override; `None` inherits from the enclosing scope.
    pub level: Option<Level>,
    /// Serializers overlaid key-by-key onto inherited entries.
    pub serializers: SerializerMap,
    /// Static fields merged into every record emitted under this scope.
    pub bindings: Bindings,
}

/// Logging overrides declared by a single route, outranking its scope.
#[derive(Debug, Default, Clone)]
pub struct RouteConfig {
    /// Level override; `None` inherits from the enclosing scope chain.
    pub level: Option<Level>,
    /// Serializers overlaid key-by-key onto inherited entries.
    pub serializers: SerializerMap,
}

/// One node of the frozen registration tree.
pub(crate) struct ContextNode {
    pub(crate) parent: Option<usize>,
    pub(crate) level: Option<Level>,
    pub(crate) serializers: SerializerMap,
    pub(crate) bindings: Bindings,
}

struct PendingRoute {
    scope: ScopeId,
    method: Method,
    path: String,
    config: RouteConfig,
}

/// Mutable registration surface; consumed by [`LoggingBuilder::build`].
///
/// Handles returned by [`LoggingBuilder::scope`] are only meaningful for the
/// builder that issued them; foreign handles surface as
/// [`LoggingError::UnknownScope`] at build time.
pub struct LoggingBuilder {
    setting: LoggerSetting,
    nodes: Vec<ContextNode>,
    routes: Vec<PendingRoute>,
    request_id: RequestIdConfig,
    disable_request_logging: bool,
}

impl LoggingBuilder {
    /// Start registration with the caller's logger setting.
    #[must_use]
    pub fn new(setting: LoggerSetting) -> Self {
        Self {
            setting,
            nodes: vec![ContextNode {
                parent: None,
                level: None,
                serializers: SerializerMap::new(),
                bindings: Bindings::new(),
            }],
            routes: Vec::new(),
            request_id: RequestIdConfig::default(),
            disable_request_logging: false,
        }
    }

    /// The root registration scope. Root-level overrides are carried by the
    /// logger setting itself, so this scope declares nothing.
    #[must_use]
    pub const fn root(&self) -> ScopeId {
        ScopeId(0)
    }

    /// Open a nested scope (a plugin context) under `parent`.
    pub fn scope(&mut self, parent: ScopeId, config: ScopeConfig) -> ScopeId {
        let id = ScopeId(self.nodes.len());
        self.nodes.push(ContextNode {
            parent: Some(parent.0),
            level: config.level,
            serializers: config.serializers,
            bindings: config.bindings,
        });
        id
    }

    /// Register a route under `scope` with its own optional overrides.
    pub fn route(
        &mut self,
        scope: ScopeId,
        method: Method,
        path: impl Into<String>,
        config: RouteConfig,
    ) -> RouteId {
        let id = RouteId(self.routes.len());
        self.routes.push(PendingRoute {
            scope,
            method,
            path: path.into(),
            config,
        });
        id
    }

    /// Configure how correlation ids are assigned.
    pub fn request_id(&mut self, config: RequestIdConfig) {
        self.request_id = config;
    }

    /// Suppress automatic lifecycle events for the whole server. Child loggers
    /// and correlation ids are still produced.
    pub fn disable_request_logging(&mut self) {
        self.disable_request_logging = true;
    }

    /// Freeze the tree: materialise the root logger and resolve every route.
    ///
    /// # Errors
    ///
    /// Returns the root logger's materialisation errors, or
    /// [`LoggingError::UnknownScope`] when a route references a handle from
    /// another builder.
    pub fn build(self) -> LoggingResult<Logging> {
        let root = materialize(self.setting)?;

        let mut routes = Vec::with_capacity(self.routes.len());
        for pending in self.routes {
            if pending.scope.0 >= self.nodes.len() {
                return Err(LoggingError::UnknownScope {
                    index: pending.scope.0,
                });
            }
            let resolved =
                resolver::resolve(&self.nodes, pending.scope.0, &pending.config, &root);
            let logger = root.port.derive(DeriveConfig {
                level: Some(resolved.level),
                serializers: resolved.serializers.clone(),
                bindings: resolved.bindings,
            });
            routes.push(ResolvedRoute {
                method: pending.method,
                path: pending.path,
                level: resolved.level,
                serializers: resolved.serializers,
                logger,
            });
        }

        let lifecycle = RequestLifecycle::new(
            RequestIdProvider::new(self.request_id),
            root.request_id_label.clone(),
            self.disable_request_logging,
        );

        Ok(Logging {
            root,
            routes,
            lifecycle,
        })
    }
}

/// One route with its configuration resolved at registration time.
///
/// Owned by the registry; the pre-resolved logger is reused for every request
/// matching this route.
pub struct ResolvedRoute {
    method: Method,
    path: String,
    level: Level,
    serializers: SerializerMap,
    logger: Arc<dyn LoggerPort>,
}

impl ResolvedRoute {
    /// HTTP method this route was registered under.
    #[must_use]
    pub const fn method(&self) -> &Method {
        &self.method
    }

    /// Path this route was registered under.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Effective level after nearest-ancestor resolution.
    #[must_use]
    pub const fn level(&self) -> Level {
        self.level
    }

    /// Merged serializer map after root-to-leaf overlay.
    #[must_use]
    pub const fn serializers(&self) -> &SerializerMap {
        &self.serializers
    }

    /// Pre-resolved logger bound to the merged configuration.
    #[must_use]
    pub fn logger(&self) -> Arc<dyn LoggerPort> {
        Arc::clone(&self.logger)
    }
}

/// Frozen logging registry: immutable after registration completes.
pub struct Logging {
    root: RootLogger,
    routes: Vec<ResolvedRoute>,
    lifecycle: RequestLifecycle,
}

impl fmt::Debug for Logging {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logging").finish_non_exhaustive()
    }
}

impl Logging {
    /// Start a registration builder.
    #[must_use]
    pub fn builder(setting: LoggerSetting) -> LoggingBuilder {
        LoggingBuilder::new(setting)
    }

    /// Root logger, for use outside any request.
    #[must_use]
    pub fn root_logger(&self) -> Arc<dyn LoggerPort> {
        Arc::clone(&self.root.port)
    }

    /// Resolved route for a handle issued by the builder.
    ///
    /// # Panics
    ///
    /// Panics when `id` was issued by a different registry's builder and is
    /// out of range; handles are not transferable between registries.
    #[must_use]
    pub fn route(&self, id: RouteId) -> &ResolvedRoute {
        &self.routes[id.0]
    }

    /// All resolved routes in registration order.
    pub fn routes(&self) -> impl Iterator<Item = &ResolvedRoute> {
        self.routes.iter()
    }

    /// Lifecycle hooks the transport invokes around handler execution.
    #[must_use]
    pub const fn lifecycle(&self) -> &RequestLifecycle {
        &self.lifecycle
    }

    /// Record field carrying the correlation id.
    #[must_use]
    pub fn request_id_label(&self) -> &str {
        &self.root.request_id_label
    }
}
