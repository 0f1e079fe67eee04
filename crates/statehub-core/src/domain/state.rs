//! Container state shapes.
//!
//! A state value is immutable from the container's point of view: every
//! mutation merges a partial update into the current value and produces a
//! new one.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// A state shape a [`StateContainer`](crate::StateContainer) can own.
///
/// `merge` is a shallow merge: fields present in the patch replace the
/// corresponding fields, absent fields are preserved. It must not panic.
pub trait ContainerState: Clone + PartialEq + Serialize + Send + Sync + 'static {
    /// Partial update type (a subset of fields to overwrite).
    type Patch: Send + 'static;

    /// Produce a new state with `patch` applied on top of `self`.
    fn merge(&self, patch: Self::Patch) -> Self;
}

/// Flat record state: an ordered mapping of field name to JSON value.
///
/// Its patch type is another record; merging overwrites present keys.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StateRecord(BTreeMap<String, Value>);

impl StateRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style field setter.
    #[must_use]
    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(field.into(), value.into());
        self
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// Field as `i64`, if present and numeric.
    pub fn get_i64(&self, field: &str) -> Option<i64> {
        self.0.get(field).and_then(Value::as_i64)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for StateRecord {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl ContainerState for StateRecord {
    type Patch = StateRecord;

    fn merge(&self, patch: StateRecord) -> Self {
        let mut next = self.0.clone();
        next.extend(patch.0);
        Self(next)
    }
}
