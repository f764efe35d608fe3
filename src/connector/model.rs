//! The typed connector model produced by finalization.
//!
//! The pipeline works on raw YAML trees for as long as transformations are
//! running; only a fully resolved tree is deserialized into [`Connector`].
//! The model is deliberately permissive: the identity section and the
//! monitor layout are typed because the composer and the update chain read
//! them, while everything else is retained as raw subtrees for downstream
//! consumers (detection engine, protocol executors) to interpret.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use serde_yaml::Value;

use crate::connector::EmbeddedFile;
use crate::core::{Error, Result};

/// A fully resolved, executable connector definition.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connector {
    /// The identity section: display name, variable declarations, detection.
    #[serde(default)]
    pub connector: ConnectorSection,

    /// Pre-processing sources executed before any monitor job.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub pre: BTreeMap<String, Value>,

    /// Monitor definitions keyed by monitor type, kept as raw subtrees.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub monitors: BTreeMap<String, Value>,

    /// Sections this model does not interpret (translations, metrics
    /// metadata, ...), preserved verbatim.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,

    /// Embedded files attached after deserialization.
    #[serde(skip)]
    pub embedded_files: BTreeMap<u32, EmbeddedFile>,

    /// Canonical keys of every data source, filled in by the update chain.
    #[serde(skip)]
    pub source_keys: BTreeSet<String>,

    /// The resolution-time instance id this connector was produced under.
    ///
    /// For generated variants this differs from the template's file stem,
    /// which keeps them distinguishable downstream.
    #[serde(skip)]
    pub compiled_filename: String,
}

/// The `connector:` identity section of a definition.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectorSection {
    /// Human-readable name. Presence of a non-empty value is what marks a
    /// file as a loadable connector rather than an extends-only fragment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,

    /// Free-form description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub information: Option<String>,

    /// Detection criteria, uninterpreted by this crate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detection: Option<Value>,

    /// Declared connector variables and their defaults.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub variables: BTreeMap<String, VariableDeclaration>,
}

/// Declaration of one connector variable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariableDeclaration {
    /// What the variable controls.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Value substituted when no override supplies one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Value>,
}

impl Connector {
    /// Deserialize a fully resolved tree into the typed model.
    ///
    /// `id` is only used to label the error; attaching embedded files and
    /// running the update chain is the finalizer's job.
    pub fn deserialize(tree: &Value, id: &str) -> Result<Self> {
        serde_yaml::from_value(tree.clone())
            .map_err(|source| Error::Deserialization { id: id.to_string(), source })
    }

    /// The display name, when the identity section declares one.
    pub fn display_name(&self) -> Option<&str> {
        self.connector.display_name.as_deref()
    }
}
