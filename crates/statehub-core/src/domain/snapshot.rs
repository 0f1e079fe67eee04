//! Combined snapshot of every registered container's latest state.

use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

use super::ids::ContainerId;

/// Mapping from container ID to that container's most recent state.
///
/// Derived by the registry on every recomputation; never mutated after it is
/// handed to plugins. Keys iterate in ID order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct CombinedSnapshot(BTreeMap<ContainerId, Value>);

impl CombinedSnapshot {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &str) -> Option<&Value> {
        self.0.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.0.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &ContainerId> {
        self.0.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ContainerId, &Value)> {
        self.0.iter()
    }

    /// JSON object keyed by container ID.
    pub fn to_json(&self) -> Value {
        Value::Object(
            self.0
                .iter()
                .map(|(id, state)| (id.to_string(), state.clone()))
                .collect(),
        )
    }
}

impl FromIterator<(ContainerId, Value)> for CombinedSnapshot {
    fn from_iter<I: IntoIterator<Item = (ContainerId, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
