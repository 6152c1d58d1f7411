//! Named item batches produced by spider parse steps.

use dashmap::DashMap;
use serde_json::Value;

/// A named, concurrency-safe collection of scraped fields.
///
/// The name is the sole identity used for pipeline routing: every pipeline
/// that declared interest in the name receives the batch. Batches with an
/// empty name are dropped before fan-out.
#[derive(Debug, Default)]
pub struct Items {
    name: String,
    map: DashMap<String, Value>,
}

impl Items {
    /// Creates an empty batch routed under `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Items {
            name: name.into(),
            map: DashMap::new(),
        }
    }

    /// The routing name of this batch.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Stores `value` under `key`, replacing any previous value.
    pub fn insert(&self, key: impl Into<String>, value: impl Into<Value>) {
        self.map.insert(key.into(), value.into());
    }

    /// Returns a clone of the value stored under `key`.
    pub fn get(&self, key: &str) -> Option<Value> {
        self.map.get(key).map(|v| v.clone())
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Visits every key/value pair in the batch.
    pub fn for_each(&self, mut f: impl FnMut(&str, &Value)) {
        for entry in self.map.iter() {
            f(entry.key(), entry.value());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_and_get() {
        let items = Items::new("article");
        items.insert("title", "hello");
        items.insert("views", 42);
        assert_eq!(items.name(), "article");
        assert_eq!(items.get("title"), Some(Value::from("hello")));
        assert_eq!(items.get("views"), Some(Value::from(42)));
        assert_eq!(items.len(), 2);
    }
}
