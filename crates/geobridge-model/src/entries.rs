//! Ordered key/value parameter lists.
//!
//! Connection parameters (and a few metadata blocks) are encoded on the wire
//! as parallel key/value pair objects instead of a JSON map:
//! `{"entry": [{"@key": "host", "$": "localhost"}, ...]}`. With exactly one
//! pair the array collapses to a bare object. Order is meaningful to the
//! server and is preserved here.

use crate::shapes::one_or_many;
use serde_json::{json, Value};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryList(Vec<(String, String)>);

impl EntryList {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Append or overwrite a key, keeping first-insertion order.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        if let Some(slot) = self.0.iter_mut().find(|(k, _)| *k == key) {
            slot.1 = value;
        } else {
            self.0.push((key, value));
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Render the `{"entry": [...]}` wire form.
    pub fn to_value(&self) -> Value {
        let entries: Vec<Value> = self
            .0
            .iter()
            .map(|(k, v)| json!({"@key": k, "$": v}))
            .collect();
        json!({ "entry": entries })
    }

    /// Parse the wire form, tolerating a single bare entry object.
    pub fn from_value(value: &Value) -> Self {
        let mut list = Self::new();
        for entry in one_or_many(value.get("entry")) {
            let Some(key) = entry.get("@key").and_then(Value::as_str) else {
                continue;
            };
            // Non-string values (ports, booleans) are carried as strings.
            let val = match entry.get("$") {
                Some(Value::String(s)) => s.clone(),
                Some(other) => other.to_string(),
                None => String::new(),
            };
            list.set(key, val);
        }
        list
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for EntryList {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut list = Self::new();
        for (k, v) in iter {
            list.set(k, v);
        }
        list
    }
}
