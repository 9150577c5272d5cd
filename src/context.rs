//! The flat placeholder mapping supplied once per pipeline run.

use crate::error::{Error, Result};
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct SubstitutionContext {
    values: IndexMap<String, Value>,
}

impl SubstitutionContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accepts a JSON object; any other JSON shape is an invalid request.
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(map) => Ok(Self { values: map.into_iter().collect() }),
            other => Err(Error::InvalidRequest(format!(
                "substitution context must be a JSON object, got {other}"
            ))),
        }
    }

    pub fn from_json_str(buf: &str) -> Result<Self> {
        if buf.trim().is_empty() {
            return Ok(Self::new());
        }
        Self::from_value(serde_json::from_str(buf)?)
    }

    pub fn insert<K: Into<String>, V: Into<Value>>(&mut self, key: K, value: V) {
        self.values.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// String value of `key`, if present and a JSON string.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.values.get(key).and_then(Value::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn as_map(&self) -> &IndexMap<String, Value> {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for SubstitutionContext {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self { values: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect() }
    }
}
