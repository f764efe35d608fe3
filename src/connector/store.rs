//! The resolved connector store produced by the eager pass.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use crate::connector::{Connector, ConnectorId, RawConnectorStore};

/// Fully resolved connectors plus the bookkeeping that drives the deferred
/// pass.
///
/// `pending_variable_ids` is the hinge between the two resolution phases:
/// any id listed there was skipped by the eager pass because its template
/// (tree or embedded file) still contains `${var::` placeholders, and must
/// be resolved per resource with override configuration. The store keeps a
/// shared reference to the raw snapshot it was built from, so deferred
/// resolution and configuration reloads re-read the same source of truth.
#[derive(Debug, Clone, Default)]
pub struct ConnectorStore {
    store: BTreeMap<ConnectorId, Connector>,
    raw_store: Arc<RawConnectorStore>,
    pending_variable_ids: BTreeSet<ConnectorId>,
}

impl ConnectorStore {
    /// Create an empty store backed by the given raw snapshot.
    pub fn new(raw_store: Arc<RawConnectorStore>) -> Self {
        Self { store: BTreeMap::new(), raw_store, pending_variable_ids: BTreeSet::new() }
    }

    /// The resolved connectors, keyed case-insensitively.
    pub fn store(&self) -> &BTreeMap<ConnectorId, Connector> {
        &self.store
    }

    /// Look up one resolved connector.
    pub fn get(&self, id: &ConnectorId) -> Option<&Connector> {
        self.store.get(id)
    }

    /// Insert one resolved connector.
    pub fn add_one(&mut self, id: ConnectorId, connector: Connector) {
        self.store.insert(id, connector);
    }

    /// Insert a batch of resolved connectors.
    pub fn add_many(&mut self, connectors: BTreeMap<ConnectorId, Connector>) {
        self.store.extend(connectors);
    }

    /// The raw snapshot this store was resolved from.
    pub fn raw_store(&self) -> &Arc<RawConnectorStore> {
        &self.raw_store
    }

    /// Ids excluded from the eager pass, awaiting deferred resolution.
    pub fn pending_variable_ids(&self) -> &BTreeSet<ConnectorId> {
        &self.pending_variable_ids
    }

    /// Record a template as variable-bearing.
    pub fn mark_pending(&mut self, id: ConnectorId) {
        self.pending_variable_ids.insert(id);
    }
}
