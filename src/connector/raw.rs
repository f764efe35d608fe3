//! Raw connectors: the immutable snapshot the whole pipeline resolves from.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_yaml::Value;

use crate::connector::{ConnectorId, EmbeddedFile};
use crate::parser::scanner;

/// A parsed-but-unresolved connector definition: the merged document tree
/// and the embedded files collected while parsing it.
///
/// A `RawConnector` is created once per file at load time and never mutated
/// afterwards; every resolution pass works on a deep copy taken through
/// [`WorkingConnector`](crate::connector::WorkingConnector). Nothing in this
/// crate hands out mutable access to a stored raw connector.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawConnector {
    tree: Value,
    embedded_files: BTreeMap<u32, EmbeddedFile>,
}

impl RawConnector {
    /// Bundle a fully merged tree with its embedded files.
    pub fn new(tree: Value, embedded_files: BTreeMap<u32, EmbeddedFile>) -> Self {
        Self { tree, embedded_files }
    }

    /// The merged document tree.
    pub fn tree(&self) -> &Value {
        &self.tree
    }

    /// The embedded files keyed by their numeric id.
    pub fn embedded_files(&self) -> &BTreeMap<u32, EmbeddedFile> {
        &self.embedded_files
    }
}

/// The immutable library snapshot: every genuine connector found in a
/// directory, keyed case-insensitively by file stem.
///
/// This is the single source of truth for all later (re-)resolution — a
/// configuration reload re-runs the composer against this same snapshot
/// without touching the file system again.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawConnectorStore {
    store: BTreeMap<ConnectorId, RawConnector>,

    /// Directory the snapshot was loaded from.
    connector_directory: PathBuf,
}

impl RawConnectorStore {
    /// Load a snapshot by scanning `connector_directory` recursively.
    ///
    /// Individual malformed connectors are logged and skipped by the
    /// scanner; this constructor itself never fails — an unreadable
    /// directory simply produces an empty store.
    pub fn load(connector_directory: &Path) -> Self {
        Self {
            store: scanner::scan(connector_directory),
            connector_directory: connector_directory.to_path_buf(),
        }
    }

    /// Build a store from an already-scanned map (used by tests and by
    /// callers that assemble snapshots from multiple directories).
    pub fn from_map(
        store: BTreeMap<ConnectorId, RawConnector>,
        connector_directory: impl Into<PathBuf>,
    ) -> Self {
        Self { store, connector_directory: connector_directory.into() }
    }

    /// The raw connectors, keyed case-insensitively.
    pub fn store(&self) -> &BTreeMap<ConnectorId, RawConnector> {
        &self.store
    }

    /// Look up one raw connector by id.
    pub fn get(&self, id: &ConnectorId) -> Option<&RawConnector> {
        self.store.get(id)
    }

    /// The directory this snapshot was loaded from.
    pub fn connector_directory(&self) -> &Path {
        &self.connector_directory
    }

    /// Number of connectors in the snapshot.
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// Whether the snapshot is empty.
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }
}
