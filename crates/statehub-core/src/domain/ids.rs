//! Container instance identity.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Process-wide counter behind default container IDs. The first generated ID
/// carries suffix `@0`.
static NEXT_CONTAINER_NUMBER: AtomicU64 = AtomicU64::new(0);

/// Process-unique instance ID of a container.
///
/// Either supplied by the owner (stable across restarts, useful in logs and
/// devtools) or generated as `<type-name>@<counter>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContainerId(String);

impl ContainerId {
    /// Wrap a custom ID.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate `<type_tag>@<n>` using the process-wide counter.
    pub fn generate(type_tag: &str) -> Self {
        let n = NEXT_CONTAINER_NUMBER.fetch_add(1, Ordering::Relaxed);
        Self(format!("{type_tag}@{n}"))
    }

    /// Generate a default ID tagged with the short name of `T`.
    pub fn for_type<T: ?Sized>() -> Self {
        Self::generate(short_type_name::<T>())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContainerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for ContainerId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ContainerId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ContainerId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Last path segment of a type name, without generic arguments.
///
/// `my_app::state::Counter` becomes `Counter`, `alloc::vec::Vec<u8>` becomes `Vec`.
pub fn short_type_name<T: ?Sized>() -> &'static str {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}
