//! Effective-configuration resolution over the frozen context tree.
//!
//! Pure functions of the tree snapshot, invoked exactly once per route at
//! registration time. Level resolution walks leaf to root and takes the
//! nearest declared override, with the root logger's configured level as the
//! floor. Serializer maps overlay root to leaf then the route's own map, so
//! the closest declaration wins per field while unrelated inherited fields
//! survive. Child bindings merge the same way as serializers.

use crate::context::{ContextNode, RouteConfig};
use crate::level::Level;
use crate::port::Bindings;
use crate::serializer::SerializerMap;
use crate::setup::RootLogger;

/// Effective configuration for one route.
pub(crate) struct ResolvedConfig {
    pub(crate) level: Level,
    pub(crate) serializers: SerializerMap,
    pub(crate) bindings: Bindings,
}

/// Resolve the effective configuration for a route registered under `leaf`.
pub(crate) fn resolve(
    nodes: &[ContextNode],
    leaf: usize,
    route: &RouteConfig,
    root: &RootLogger,
) -> ResolvedConfig {
    let chain = ancestor_chain(nodes, leaf);

    let level = route
        .level
        .or_else(|| chain.iter().find_map(|&index| nodes[index].level))
        .unwrap_or(root.level);

    let mut serializers = root.serializers.clone();
    let mut bindings = Bindings::new();
    for &index in chain.iter().rev() {
        serializers.overlay(&nodes[index].serializers);
        bindings.extend(nodes[index].bindings.clone());
    }
    serializers.overlay(&route.serializers);

    ResolvedConfig {
        level,
        serializers,
        bindings,
    }
}

/// Node indices from `leaf` up to and including the root.
fn ancestor_chain(nodes: &[ContextNode], leaf: usize) -> Vec<usize> {
    let mut chain = Vec::new();
    let mut cursor = Some(leaf);
    while let Some(index) = cursor {
        chain.push(index);
        cursor = nodes[index].parent;
    }
    chain
}
