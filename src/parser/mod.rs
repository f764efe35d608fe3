//! The connector definition resolution pipeline.
//!
//! This module turns a directory of raw, possibly-inheriting,
//! possibly-parameterized connector templates into fully self-contained
//! connector objects:
//!
//! 1. [`scanner`] walks the library directory and produces raw connector
//!    records, one per genuine (display-named) template file.
//! 2. [`ConnectorParser`] handles one file: it discovers the full `extends`
//!    ancestry, runs the fixed [rewrite chain](chain), and extracts
//!    [embedded files](embedded_files).
//! 3. [`composer::StoreComposer`] orchestrates two-phase resolution: an
//!    eager pass over variable-free templates and a deferred, per-resource
//!    pass that fans variable-bearing templates out into configured
//!    instances.

pub mod chain;
pub mod composer;
pub mod constants;
pub mod embedded_files;
pub mod extends;
pub mod reference;
pub mod scanner;
pub mod source_key;
pub mod variables;

use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde_yaml::Value;

use crate::connector::RawConnector;
use crate::core::{Error, Result};
use crate::utils::fs as fs_utils;

pub use chain::{NodeProcessor, ProcessorChain};
pub use composer::{ResolutionResult, StoreComposer};

/// Conventional extension of connector template files, without the dot.
pub const TEMPLATE_EXTENSION: &str = "yaml";

/// Parses a single connector file into a [`RawConnector`].
///
/// Ancestry discovery is decoupled from ancestry merging: the merge happens
/// inside the rewrite chain's extends step, while the parser separately
/// collects every ancestor *directory*, because embedded-file resolution
/// needs the full directory search space rather than the merged content.
pub struct ConnectorParser {
    chain: ProcessorChain,
}

impl ConnectorParser {
    /// Parser with the standard rewrite chain for the given connector
    /// directory (extends → constants → references → source keys).
    pub fn new(connector_directory: &Path) -> Self {
        Self { chain: ProcessorChain::standard(connector_directory) }
    }

    /// Parser whose chain bakes a fixed variable map in ahead of constants
    /// resolution (extends → variables → references → constants → source
    /// keys).
    pub fn with_variables(
        connector_directory: &Path,
        variables: BTreeMap<String, String>,
    ) -> Self {
        Self { chain: ProcessorChain::with_variables(connector_directory, variables) }
    }

    /// Parse `file` into a raw connector: merged tree plus embedded files.
    pub fn parse_raw(&self, file: &Path) -> Result<RawConnector> {
        let node = fs_utils::read_yaml(file)?;

        let mut visited = BTreeSet::new();
        visited.insert(canonical_or_normalized(file));
        let mut ancestor_directories = Vec::new();
        discover_ancestors(&node, file, &mut visited, &mut ancestor_directories)?;

        let mut node = self.chain.process(node)?;

        let embedded_files =
            embedded_files::EmbeddedFileResolver::new(file, &ancestor_directories)
                .resolve(&mut node)?;

        Ok(RawConnector::new(node, embedded_files))
    }
}

/// Recursively collect the transitive ancestry of `node`, recording each
/// ancestor's directory. Detects circular ancestries via `visited`.
fn discover_ancestors(
    node: &Value,
    file: &Path,
    visited: &mut BTreeSet<PathBuf>,
    ancestor_directories: &mut Vec<PathBuf>,
) -> Result<()> {
    let Some(Value::Sequence(references)) = node.get("extends") else {
        return Ok(());
    };

    let directory = file.parent().unwrap_or_else(|| Path::new("."));
    for reference in references {
        let reference = reference.as_str().unwrap_or_default();
        let path = resolve_ancestor_path(directory, reference).ok_or_else(|| {
            Error::UnresolvedAncestor {
                reference: reference.to_string(),
                file: file.to_path_buf(),
            }
        })?;

        // `visited` is the recursion stack: revisiting a file still being
        // resolved is a cycle, but a diamond ancestry (two siblings sharing
        // an ancestor) only revisits a completed file and is legitimate.
        let canonical = canonical_or_normalized(&path);
        if visited.contains(&canonical) {
            return Err(Error::CircularExtends { file: path });
        }
        visited.insert(canonical.clone());

        let parent = fs_utils::read_yaml(&path)?;
        if let Some(parent_directory) = path.parent() {
            if !ancestor_directories.iter().any(|d| d == parent_directory) {
                ancestor_directories.push(parent_directory.to_path_buf());
            }
        }
        discover_ancestors(&parent, &path, visited, ancestor_directories)?;
        visited.remove(&canonical);
    }

    Ok(())
}

/// Resolve an `extends` reference to an existing template file.
///
/// Lookup order: (a) relative to the referencing file's directory with the
/// conventional extension appended; (b) unless the reference is an explicit
/// relative path, relative to the nearest enclosing `connectors` directory.
pub(crate) fn resolve_ancestor_path(current_dir: &Path, reference: &str) -> Option<PathBuf> {
    let file_name = format!("{reference}.{TEMPLATE_EXTENSION}");

    let candidate = fs_utils::normalize(&current_dir.join(&file_name));
    if candidate.is_file() {
        return Some(candidate);
    }

    if !reference.starts_with('.') {
        if let Some(root) = fs_utils::find_connectors_directory(current_dir) {
            let candidate = fs_utils::normalize(&root.join(&file_name));
            if candidate.is_file() {
                return Some(candidate);
            }
        }
    }

    None
}

fn canonical_or_normalized(path: &Path) -> PathBuf {
    std::fs::canonicalize(path).unwrap_or_else(|_| fs_utils::normalize(path))
}
