//! Instance override configuration.
//!
//! A variable-bearing template is only fully resolvable once a resource
//! configuration supplies values for its variables. An [`InstanceOverride`]
//! instantiates a template under a chosen instance id with explicit
//! variable values, optionally force-enabled (applied regardless of
//! automatic detection). Overrides are externally supplied and read-only to
//! the pipeline.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::connector::ConnectorId;
use crate::core::{Error, Result};

/// One configured instantiation of a connector template.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InstanceOverride {
    /// Id of the template this override instantiates. Matched
    /// case-insensitively; when absent, the override's own map key is the
    /// template id (the common "configure the template under its own name"
    /// case).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uses: Option<String>,

    /// Explicit variable values, overriding the template's declared
    /// defaults name by name.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub variables: BTreeMap<String, String>,

    /// Whether the instance is applied regardless of automatic detection.
    #[serde(default)]
    pub force: bool,
}

impl InstanceOverride {
    /// The template id this override targets: `uses` when declared,
    /// otherwise the override's own id.
    pub fn template_id(&self, own_id: &ConnectorId) -> ConnectorId {
        match &self.uses {
            Some(uses) => ConnectorId::from(uses.as_str()),
            None => own_id.clone(),
        }
    }
}

/// An overrides configuration file: a `connectors` map of instance id →
/// override.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OverridesConfig {
    /// Overrides keyed by the instance id they produce.
    #[serde(default)]
    pub connectors: BTreeMap<ConnectorId, InstanceOverride>,
}

impl OverridesConfig {
    /// Load an overrides file from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        serde_yaml::from_str(&content).map_err(|e| Error::yaml(path, e))
    }
}
