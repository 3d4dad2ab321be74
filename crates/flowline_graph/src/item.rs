// SPDX-License-Identifier: MIT OR Apache-2.0
//! Item types carried by ports and edges.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque name of a category of transportable good.
///
/// Two item types are compatible only when their names match exactly.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemType(String);

impl ItemType {
    /// Create an item type from its name
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The item name
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemType {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for ItemType {
    fn from(name: String) -> Self {
        Self(name)
    }
}
