use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::errors::Result;

/// Auxiliary data attached to a live node
///
/// Callers park per-node state here (annotations, cached analysis, UI
/// bindings). The map is never part of snapshot comparison: it survives as
/// long as its node survives reconciliation and is dropped with it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Metadata {
    data: HashMap<String, serde_json::Value>,
}

impl Metadata {
    /// Create a new empty Metadata instance
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
        }
    }

    /// Get a value by key
    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.data.get(key)
    }

    /// Get a string value by key
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.data.get(key).and_then(|v| v.as_str())
    }

    /// Deserialize the value stored under `key`
    ///
    /// # Errors
    ///
    /// Returns `Serialization` if the stored value does not fit `T`.
    pub fn get_as<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.data.get(key) {
            Some(value) => Ok(Some(serde_json::from_value(value.clone())?)),
            None => Ok(None),
        }
    }

    /// Set a value by key
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) {
        self.data.insert(key.into(), value.into());
    }

    /// Serialize `value` and store it under `key`
    ///
    /// # Errors
    ///
    /// Returns `Serialization` if `value` cannot be represented as JSON.
    pub fn set_as<T: Serialize>(&mut self, key: impl Into<String>, value: &T) -> Result<()> {
        let value = serde_json::to_value(value)?;
        self.data.insert(key.into(), value);
        Ok(())
    }

    /// Remove a value by key
    pub fn remove(&mut self, key: &str) -> Option<serde_json::Value> {
        self.data.remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.data.keys()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl From<HashMap<String, serde_json::Value>> for Metadata {
    fn from(data: HashMap<String, serde_json::Value>) -> Self {
        Self { data }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_set_and_get() {
        let mut data = Metadata::new();
        data.set("stem", "eric");

        assert_eq!(data.get_str("stem"), Some("eric"));
        assert!(data.contains_key("stem"));
        assert_eq!(data.len(), 1);
    }

    #[test]
    fn test_typed_round_trip() {
        #[derive(Debug, PartialEq, Serialize, Deserialize)]
        struct Spelling {
            misspelled: bool,
            suggestions: Vec<String>,
        }

        let mut data = Metadata::new();
        let spelling = Spelling {
            misspelled: true,
            suggestions: vec!["words".into()],
        };
        data.set_as("spelling", &spelling).unwrap();

        let back: Option<Spelling> = data.get_as("spelling").unwrap();
        assert_eq!(back, Some(spelling));
    }

    #[test]
    fn test_get_as_wrong_shape_is_serialization_error() {
        let mut data = Metadata::new();
        data.set("count", json!("not a number"));

        let err = data.get_as::<u32>("count").unwrap_err();
        assert!(matches!(err, crate::errors::LiveError::Serialization { .. }));
    }

    #[test]
    fn test_missing_key() {
        let data = Metadata::new();
        assert!(data.is_empty());
        assert_eq!(data.get_as::<u32>("count").unwrap(), None);
    }
}
