//! Per-field value transforms applied before emission.
//!
//! A serializer map associates a field name with a pure transform over that
//! field's value. Maps merge key-by-key: overlaying a map replaces only the
//! fields it declares, leaving inherited entries for other fields intact.

use std::collections::HashMap;
use std::fmt::{self, Debug, Formatter};
use std::sync::Arc;

use serde_json::Value;

/// Pure transform applied to a single field value before emission.
pub type SerializerFn = Arc<dyn Fn(Value) -> Value + Send + Sync>;

/// Mapping from field name to serializer.
#[derive(Clone, Default)]
pub struct SerializerMap {
    entries: HashMap<String, SerializerFn>,
}

impl SerializerMap {
    /// Empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a serializer for `field`, replacing any existing entry.
    pub fn insert(
        &mut self,
        field: impl Into<String>,
        serializer: impl Fn(Value) -> Value + Send + Sync + 'static,
    ) {
        self.entries.insert(field.into(), Arc::new(serializer));
    }

    /// Serializer registered for `field`, if any.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&SerializerFn> {
        self.entries.get(field)
    }

    /// Overlay every entry of `other` onto this map, `other` winning per key.
    pub fn overlay(&mut self, other: &Self) {
        for (field, serializer) in &other.entries {
            self.entries.insert(field.clone(), Arc::clone(serializer));
        }
    }

    /// Apply the serializer registered for `field`, or pass the value through.
    #[must_use]
    pub fn apply(&self, field: &str, value: Value) -> Value {
        match self.entries.get(field) {
            Some(serializer) => serializer(value),
            None => value,
        }
    }

    /// Number of registered serializers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no serializers are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Field names with a registered serializer, in arbitrary order.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

impl Debug for SerializerMap {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        let mut fields: Vec<&str> = self.fields().collect();
        fields.sort_unstable();
        formatter
            .debug_struct("SerializerMap")
            .field("fields", &fields)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn prefix(tag: &'static str) -> impl Fn(Value) -> Value + Send + Sync {
        move |value| match value {
            Value::String(text) => Value::String(format!("{tag}{text}")),
            other => other,
        }
    }

    #[test]
    fn apply_passes_unregistered_fields_through() {
        let map = SerializerMap::new();
        assert_eq!(map.apply("user", json!("alice")), json!("alice"));
    }

    #[test]
    fn overlay_replaces_only_declared_fields() {
        let mut base = SerializerMap::new();
        base.insert("user", prefix("X"));
        base.insert("path", prefix("P"));

        let mut closer = SerializerMap::new();
        closer.insert("user", prefix("Z"));
        base.overlay(&closer);

        assert_eq!(base.apply("user", json!("Hello")), json!("ZHello"));
        assert_eq!(base.apply("path", json!("/a")), json!("P/a"));
        assert_eq!(base.len(), 2);
    }

    #[test]
    fn debug_lists_field_names_only() {
        let mut map = SerializerMap::new();
        map.insert("token", prefix("T"));
        let rendered = format!("{map:?}");
        assert!(rendered.contains("token"));
    }
}
