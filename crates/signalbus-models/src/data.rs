//! Ordered key-value payload carried by an event.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Ordered payload of an [`Event`](crate::Event).
///
/// Entries keep insertion order. Positional entries (the arguments passed to
/// `trigger`) have no key; keyed entries come from callers that build the
/// payload by name. Listeners receive the values in order regardless of keys.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventData {
    entries: Vec<(Option<String>, Value)>,
}

impl EventData {
    /// Creates an empty payload.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a payload of unkeyed values, in order.
    pub fn positional(values: impl IntoIterator<Item = Value>) -> Self {
        Self {
            entries: values.into_iter().map(|v| (None, v)).collect(),
        }
    }

    /// Appends a keyed entry.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.entries.push((Some(key.into()), value.into()));
        self
    }

    /// Appends an unkeyed entry.
    pub fn with_value(mut self, value: impl Into<Value>) -> Self {
        self.entries.push((None, value.into()));
        self
    }

    /// Looks up the first entry stored under `key`.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(k, _)| k.as_deref() == Some(key))
            .map(|(_, v)| v)
    }

    /// Returns the value at `index`, counting every entry.
    pub fn get_index(&self, index: usize) -> Option<&Value> {
        self.entries.get(index).map(|(_, v)| v)
    }

    /// Iterates over the values in insertion order.
    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.entries.iter().map(|(_, v)| v)
    }

    /// Iterates over `(key, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (Option<&str>, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_deref(), v))
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the payload has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl From<Vec<Value>> for EventData {
    fn from(values: Vec<Value>) -> Self {
        Self::positional(values)
    }
}

impl From<serde_json::Map<String, Value>> for EventData {
    fn from(map: serde_json::Map<String, Value>) -> Self {
        map.into_iter().collect()
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for EventData {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (Some(k.into()), v))
                .collect(),
        }
    }
}
