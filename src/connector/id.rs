//! Case-insensitive connector identifiers.
//!
//! Connector ids come from file stems (`MIB2-disk.yaml` → `MIB2-disk`) and
//! from user configuration, and the two must meet case-insensitively: an
//! override declaring `uses: mib2-disk` targets the template stored as
//! `MIB2-disk`. [`ConnectorId`] preserves the original spelling for display
//! while comparing, ordering, and hashing ASCII-case-insensitively, so it
//! can key the store maps directly.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

/// A connector identifier with case-insensitive equality and ordering.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConnectorId(String);

impl ConnectorId {
    /// Create an id, preserving the given spelling.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The id as originally spelled.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl PartialEq for ConnectorId {
    fn eq(&self, other: &Self) -> bool {
        self.0.eq_ignore_ascii_case(&other.0)
    }
}

impl Eq for ConnectorId {}

impl PartialOrd for ConnectorId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ConnectorId {
    fn cmp(&self, other: &Self) -> Ordering {
        let lhs = self.0.bytes().map(|b| b.to_ascii_lowercase());
        let rhs = other.0.bytes().map(|b| b.to_ascii_lowercase());
        lhs.cmp(rhs)
    }
}

impl Hash for ConnectorId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for b in self.0.bytes() {
            state.write_u8(b.to_ascii_lowercase());
        }
    }
}

impl fmt::Display for ConnectorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ConnectorId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ConnectorId {
    fn from(id: String) -> Self {
        Self(id)
    }
}
