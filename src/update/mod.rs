//! The connector update chain.
//!
//! After a resolved tree has been deserialized, an ordered list of update
//! steps annotates the typed [`Connector`] with structural metadata. The
//! chain is a seam: the composer runs whatever chain it was built with, and
//! embedding applications can append their own updates (dependency
//! ordering, capability flags, ...). The one update shipped here collects
//! the canonical source keys stamped by the rewrite chain.

use serde_yaml::Value;

use crate::connector::Connector;

/// One structural annotation pass over a deserialized connector.
pub trait ConnectorUpdate {
    /// Annotate `connector` in place.
    fn apply(&self, connector: &mut Connector);
}

/// An ordered list of update steps applied during finalization.
pub struct UpdateChain {
    updates: Vec<Box<dyn ConnectorUpdate>>,
}

impl UpdateChain {
    /// Build a chain from explicit steps, applied in order.
    pub fn new(updates: Vec<Box<dyn ConnectorUpdate>>) -> Self {
        Self { updates }
    }

    /// The default chain.
    pub fn standard() -> Self {
        Self::new(vec![Box::new(AvailableSourceUpdate)])
    }

    /// An empty chain, for callers that only want deserialization.
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// Run every update in order.
    pub fn apply(&self, connector: &mut Connector) {
        for update in &self.updates {
            update.apply(connector);
        }
    }
}

impl Default for UpdateChain {
    fn default() -> Self {
        Self::standard()
    }
}

/// Collects the canonical key of every data source into
/// [`Connector::source_keys`].
///
/// Keys were stamped onto each source entry by the rewrite chain's final
/// step, so this is a harvest, not a recomputation; a source missing its
/// `key` field (hand-built trees in tests, exotic inputs) is skipped.
pub struct AvailableSourceUpdate;

impl AvailableSourceUpdate {
    fn harvest(section: &Value, keys: &mut std::collections::BTreeSet<String>) {
        let Value::Mapping(sources) = section else {
            return;
        };
        for (_, source) in sources {
            if let Some(key) = source.get("key").and_then(Value::as_str) {
                keys.insert(key.to_string());
            }
        }
    }
}

impl ConnectorUpdate for AvailableSourceUpdate {
    fn apply(&self, connector: &mut Connector) {
        let mut keys = std::collections::BTreeSet::new();

        for source in connector.pre.values() {
            if let Some(key) = source.get("key").and_then(Value::as_str) {
                keys.insert(key.to_string());
            }
        }

        for monitor in connector.monitors.values() {
            let Value::Mapping(jobs) = monitor else {
                continue;
            };
            for (_, job) in jobs {
                if let Some(sources) = job.get("sources") {
                    Self::harvest(sources, &mut keys);
                }
            }
        }

        connector.source_keys = keys;
    }
}
