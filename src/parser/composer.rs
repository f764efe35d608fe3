//! Two-phase store composition.
//!
//! Phase 1 ([`StoreComposer::build_eager_store`]) finalizes every template
//! that contains no `${var::` occurrence. Most templates never use
//! variables, and skipping the substitution machinery for them means a
//! broken variable configuration can never break a variable-free connector.
//! Templates that do carry variables are only recorded as pending.
//!
//! Phase 2 ([`StoreComposer::resolve_deferred`]) runs once per monitored
//! resource (or resource group), with that resource's instance overrides.
//! Each pending template fans out into one default instance plus one
//! instance per matching override, every instance substituted and finalized
//! on its own deep copy. The result is returned as a fresh value per call;
//! callers accumulating across resource groups merge results themselves
//! under single-writer discipline.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use serde_yaml::Value;
use tracing::{debug, error, warn};

use crate::config::InstanceOverride;
use crate::connector::{
    Connector, ConnectorId, ConnectorStore, RawConnectorStore, WorkingConnector,
};
use crate::core::Result;
use crate::parser::variables::{self, VARIABLE_MARKER};
use crate::update::UpdateChain;
use crate::utils::yaml;

/// Connectors produced by deferred resolution for one or more resources.
///
/// Accumulates across calls via [`merge`](Self::merge): the same template
/// resolved differently for different resources never collides as long as
/// the instance ids differ, and identical ids follow last-write-wins.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolutionResult {
    custom_connectors: BTreeMap<ConnectorId, Connector>,
    resource_connector_refs: BTreeSet<String>,
}

impl ResolutionResult {
    /// The resolved instances, keyed by instance id.
    pub fn custom_connectors(&self) -> &BTreeMap<ConnectorId, Connector> {
        &self.custom_connectors
    }

    /// Instance ids configured for the resource, `+`-prefixed when
    /// force-enabled.
    pub fn resource_connector_refs(&self) -> &BTreeSet<String> {
        &self.resource_connector_refs
    }

    /// Fold another result into this one.
    pub fn merge(&mut self, other: ResolutionResult) {
        self.custom_connectors.extend(other.custom_connectors);
        self.resource_connector_refs.extend(other.resource_connector_refs);
    }

    fn record_resource_ref(&mut self, id: &ConnectorId, force: bool) {
        let reference =
            if force { format!("+{id}") } else { id.to_string() };
        self.resource_connector_refs.insert(reference);
    }
}

/// Orchestrates two-phase resolution over an immutable raw snapshot.
///
/// The composer is immutable after construction and keeps no per-call
/// state, so concurrent deferred passes for different resource groups are
/// safe by construction.
pub struct StoreComposer {
    raw_store: Arc<RawConnectorStore>,
    update_chain: UpdateChain,
}

impl StoreComposer {
    /// Composer over `raw_store` with the standard update chain.
    pub fn new(raw_store: Arc<RawConnectorStore>) -> Self {
        Self { raw_store, update_chain: UpdateChain::standard() }
    }

    /// Composer with a caller-assembled update chain.
    pub fn with_update_chain(raw_store: Arc<RawConnectorStore>, update_chain: UpdateChain) -> Self {
        Self { raw_store, update_chain }
    }

    /// Phase 1: finalize every variable-free template; record the rest as
    /// pending. Finalize failures are logged and the connector omitted —
    /// one bad template never aborts the store build.
    pub fn build_eager_store(&self) -> ConnectorStore {
        let mut store = ConnectorStore::new(Arc::clone(&self.raw_store));

        for (id, raw) in self.raw_store.store() {
            let working = WorkingConnector::new(id.clone(), raw);
            if working.has_variables() {
                store.mark_pending(id.clone());
                continue;
            }
            match self.finalize(working) {
                Ok(connector) => store.add_one(id.clone(), connector),
                Err(e) => {
                    error!("error while deserializing connector `{id}`: {e}");
                    debug!("deserialization failure detail: {e:?}");
                }
            }
        }

        store
    }

    /// Phase 2: resolve every pending template against the given overrides,
    /// producing a fresh per-resource result.
    pub fn resolve_deferred(
        &self,
        store: &ConnectorStore,
        overrides: &BTreeMap<ConnectorId, InstanceOverride>,
    ) -> ResolutionResult {
        let mut result = ResolutionResult::default();

        for id in store.pending_variable_ids() {
            let Some(raw) = self.raw_store.get(id) else {
                warn!("pending connector `{id}` is missing from the raw store");
                continue;
            };
            let template = WorkingConnector::new(id.clone(), raw);
            self.resolve_template(&template, overrides, &mut result);
        }

        result
    }

    /// Fan one variable-bearing template out into its configured instances
    /// and finalize each of them.
    fn resolve_template(
        &self,
        template: &WorkingConnector,
        overrides: &BTreeMap<ConnectorId, InstanceOverride>,
        result: &mut ResolutionResult,
    ) {
        let defaults = default_variables(template.tree());
        let mut instances = Vec::new();

        // Always produce the default instance under the template's own id,
        // substituting declared defaults only: forcing a connector with
        // `+id` and zero extra configuration must work. An override reusing
        // the same id is finalized after it and replaces it.
        let mut default_instance = template.clone_as(template.id().clone());
        substitute_instance(&mut default_instance, &defaults);
        instances.push(default_instance);

        for (instance_id, config) in overrides {
            if &config.template_id(instance_id) != template.id() {
                continue;
            }

            let mut instance = template.clone_as(instance_id.clone());
            let mut effective = defaults.clone();
            effective.extend(config.variables.clone());
            substitute_instance(&mut instance, &effective);
            instances.push(instance);

            result.record_resource_ref(instance_id, config.force);
        }

        for instance in instances {
            let id = instance.id().clone();
            match self.finalize(instance) {
                Ok(connector) => {
                    result.custom_connectors.insert(id, connector);
                }
                Err(e) => {
                    error!("error while deserializing connector `{id}`: {e}");
                    debug!("deserialization failure detail: {e:?}");
                }
            }
        }
    }

    /// Turn a working connector into a finalized [`Connector`]: deserialize
    /// the resolved tree, attach the embedded files, run the update chain,
    /// and record the resolution-time instance id as the compiled filename.
    pub fn finalize(&self, working: WorkingConnector) -> Result<Connector> {
        let (id, tree, embedded_files) = working.into_parts();
        let mut connector = Connector::deserialize(&tree, id.as_str())?;
        connector.embedded_files = embedded_files;
        self.update_chain.apply(&mut connector);
        connector.compiled_filename = id.to_string();
        Ok(connector)
    }
}

/// Extract the template's declared default variable values
/// (`connector.variables.<name>.defaultValue`), rendered as strings.
/// Declarations without a default contribute nothing.
fn default_variables(tree: &Value) -> BTreeMap<String, String> {
    let mut defaults = BTreeMap::new();
    let Some(Value::Mapping(declarations)) =
        tree.get("connector").and_then(|section| section.get("variables"))
    else {
        return defaults;
    };

    for (name, declaration) in declarations {
        let Some(name) = name.as_str() else {
            continue;
        };
        if let Some(value) =
            declaration.get("defaultValue").and_then(yaml::scalar_to_string)
        {
            defaults.insert(name.to_string(), value);
        }
    }

    defaults
}

/// Substitute `variables` into the instance's tree and into every embedded
/// file's text.
fn substitute_instance(instance: &mut WorkingConnector, variables: &BTreeMap<String, String>) {
    variables::substitute_tree(instance.tree_mut(), variables);

    for file in instance.embedded_files_mut().values_mut() {
        let text = file.decode_as_text().into_owned();
        if text.contains(VARIABLE_MARKER) {
            file.set_content(variables::substitute_text(&text, variables).into_bytes());
        }
    }
}
