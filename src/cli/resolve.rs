//! The `resolve` subcommand.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::Args;
use serde_json::json;

use crate::cli::OutputFormat;
use crate::config::OverridesConfig;
use crate::connector::RawConnectorStore;
use crate::parser::StoreComposer;

/// Fully resolve a connector library: eager store plus deferred variable
/// resolution with instance overrides.
#[derive(Args)]
pub struct ResolveCommand {
    /// Connector library directory to scan.
    directory: PathBuf,

    /// Overrides configuration file (a `connectors:` map of instance id to
    /// `{uses, variables, force}`). Without one, pending templates only
    /// produce their default instances.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output format.
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,
}

impl ResolveCommand {
    /// Run both resolution phases and print the outcome.
    pub fn execute(self) -> Result<()> {
        if !self.directory.is_dir() {
            bail!("`{}` is not a directory", self.directory.display());
        }

        let overrides = match &self.config {
            Some(path) => {
                OverridesConfig::load(path)
                    .with_context(|| {
                        format!("failed to load overrides from `{}`", path.display())
                    })?
                    .connectors
            }
            None => BTreeMap::new(),
        };

        let raw_store = Arc::new(RawConnectorStore::load(&self.directory));
        let composer = StoreComposer::new(Arc::clone(&raw_store));
        let store = composer.build_eager_store();
        let result = composer.resolve_deferred(&store, &overrides);

        match self.format {
            OutputFormat::Text => {
                println!("eager connectors ({}):", store.store().len());
                for id in store.store().keys() {
                    println!("  {id}");
                }
                println!("resolved instances ({}):", result.custom_connectors().len());
                for (id, connector) in result.custom_connectors() {
                    println!("  {id} ({} source(s))", connector.source_keys.len());
                }
                if !result.resource_connector_refs().is_empty() {
                    println!("resource connector refs:");
                    for reference in result.resource_connector_refs() {
                        println!("  {reference}");
                    }
                }
            }
            OutputFormat::Json => {
                let payload = json!({
                    "eager": store.store().keys().map(ToString::to_string).collect::<Vec<_>>(),
                    "instances": result
                        .custom_connectors()
                        .iter()
                        .map(|(id, connector)| {
                            json!({
                                "id": id.to_string(),
                                "compiledFilename": connector.compiled_filename,
                                "sourceKeys": connector.source_keys,
                            })
                        })
                        .collect::<Vec<_>>(),
                    "resourceRefs": result.resource_connector_refs(),
                });
                let rendered = serde_json::to_string_pretty(&payload)
                    .context("failed to render JSON output")?;
                println!("{rendered}");
            }
        }

        Ok(())
    }
}
