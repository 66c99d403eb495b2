//! Generic key-value options passed through to drivers.
//!
//! The registry never looks inside an [`Options`] value. Drivers decode the
//! payload into their own typed models with [`Options::to_model`].

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::BockResult;

/// Opaque, backend-defined configuration payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Options(Map<String, Value>);

impl Options {
    /// Create an empty set of options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an option.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Insert an option, returning the previous value for the key.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    /// Look up an option.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Whether there are no options.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of options.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterate over the options.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Build options from a serializable model.
    ///
    /// The model must serialize to a map (a struct or a map type).
    ///
    /// # Errors
    ///
    /// Returns [`crate::BockError::Serialization`] if the model does not
    /// serialize to a map.
    pub fn from_model<T: Serialize>(model: &T) -> BockResult<Self> {
        match serde_json::to_value(model)? {
            Value::Object(map) => Ok(Self(map)),
            other => Err(crate::BockError::Serialization(format!(
                "options model must serialize to a map, got {other}"
            ))),
        }
    }

    /// Decode the options into a typed model.
    ///
    /// # Errors
    ///
    /// Returns [`crate::BockError::Serialization`] if the payload does not
    /// match the model.
    pub fn to_model<T: DeserializeOwned>(&self) -> BockResult<T> {
        Ok(serde_json::from_value(Value::Object(self.0.clone()))?)
    }
}

impl From<Map<String, Value>> for Options {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}
