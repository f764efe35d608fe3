//! The `list` subcommand.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::Args;
use serde_json::json;

use crate::cli::OutputFormat;
use crate::connector::RawConnectorStore;
use crate::parser::StoreComposer;

/// List the loadable connectors found in a library directory.
#[derive(Args)]
pub struct ListCommand {
    /// Connector library directory to scan.
    directory: PathBuf,

    /// Output format.
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,
}

impl ListCommand {
    /// Scan the library, build the eager store, and print one row per
    /// template.
    pub fn execute(self) -> Result<()> {
        if !self.directory.is_dir() {
            bail!("`{}` is not a directory", self.directory.display());
        }

        let raw_store = Arc::new(RawConnectorStore::load(&self.directory));
        let composer = StoreComposer::new(Arc::clone(&raw_store));
        let store = composer.build_eager_store();

        let rows: Vec<_> = raw_store
            .store()
            .iter()
            .map(|(id, raw)| {
                let display_name = raw
                    .tree()
                    .get("connector")
                    .and_then(|section| section.get("displayName"))
                    .and_then(|name| name.as_str())
                    .unwrap_or_default()
                    .to_string();
                let deferred = store.pending_variable_ids().contains(id);
                (id.to_string(), display_name, deferred)
            })
            .collect();

        match self.format {
            OutputFormat::Text => {
                if rows.is_empty() {
                    println!("no connectors found in `{}`", self.directory.display());
                    return Ok(());
                }
                let id_width =
                    rows.iter().map(|(id, _, _)| id.len()).max().unwrap_or(0).max(2);
                println!("{:<id_width$}  {:<8}  NAME", "ID", "PHASE");
                for (id, name, deferred) in &rows {
                    let phase = if *deferred { "deferred" } else { "eager" };
                    println!("{id:<id_width$}  {phase:<8}  {name}");
                }
            }
            OutputFormat::Json => {
                let payload: Vec<_> = rows
                    .iter()
                    .map(|(id, name, deferred)| {
                        json!({ "id": id, "displayName": name, "deferred": deferred })
                    })
                    .collect();
                let rendered = serde_json::to_string_pretty(&payload)
                    .context("failed to render JSON output")?;
                println!("{rendered}");
            }
        }

        Ok(())
    }
}
