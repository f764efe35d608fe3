//! The extends-merge rewrite step: connector inheritance flattening.
//!
//! A connector lists its ancestors in a top-level `extends` sequence.
//! Merging folds every ancestor's content into the child: ancestors are
//! applied left to right (later ones overriding earlier ones) and the
//! child's own content is applied last, winning every conflict. Maps merge
//! recursively, sequences concatenate ancestor-first, scalars are replaced.
//!
//! Ancestors may themselves extend further ancestors; each level is resolved
//! relative to its own directory. A visited set over canonical file paths
//! turns a circular ancestry into [`Error::CircularExtends`] instead of
//! unbounded recursion.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde_yaml::Value;

use crate::core::{Error, Result};
use crate::parser::chain::NodeProcessor;
use crate::parser::resolve_ancestor_path;
use crate::utils::fs as fs_utils;

/// Key consumed by this step.
const EXTENDS_KEY: &str = "extends";

/// Rewrite step that flattens the `extends` ancestry of a document.
pub struct ExtendsProcessor {
    connector_directory: PathBuf,
}

impl ExtendsProcessor {
    /// Create a step resolving ancestors relative to the given connector
    /// file's directory.
    pub fn new(connector_directory: &Path) -> Self {
        Self { connector_directory: connector_directory.to_path_buf() }
    }

    fn merge_ancestry(
        &self,
        node: Value,
        directory: &Path,
        visited: &mut BTreeSet<PathBuf>,
    ) -> Result<Value> {
        let mut node = node;
        let Value::Mapping(map) = &mut node else {
            return Ok(node);
        };
        let references = match map.remove(EXTENDS_KEY) {
            Some(Value::Sequence(seq)) => seq,
            Some(other) => {
                // malformed extends: put it back untouched, let typed
                // deserialization report it
                map.insert(Value::from(EXTENDS_KEY), other);
                return Ok(node);
            }
            None => return Ok(node),
        };

        let mut base = Value::Null;
        for reference in &references {
            let reference = reference.as_str().unwrap_or_default();
            let path = resolve_ancestor_path(directory, reference).ok_or_else(|| {
                Error::UnresolvedAncestor {
                    reference: reference.to_string(),
                    file: directory.to_path_buf(),
                }
            })?;

            // `visited` is the recursion stack: seeing a file that is still
            // being merged is a cycle, while a diamond (two siblings sharing
            // an ancestor) re-merges the ancestor legitimately.
            let canonical =
                std::fs::canonicalize(&path).unwrap_or_else(|_| fs_utils::normalize(&path));
            if visited.contains(&canonical) {
                return Err(Error::CircularExtends { file: path });
            }
            visited.insert(canonical.clone());

            let parent = fs_utils::read_yaml(&path)?;
            let parent_directory = path.parent().unwrap_or(directory).to_path_buf();
            let parent = self.merge_ancestry(parent, &parent_directory, visited)?;
            visited.remove(&canonical);
            base = merge_values(base, parent);
        }

        Ok(merge_values(base, node))
    }
}

impl NodeProcessor for ExtendsProcessor {
    fn process(&self, node: Value) -> Result<Value> {
        let mut visited = BTreeSet::new();
        self.merge_ancestry(node, &self.connector_directory, &mut visited)
    }
}

/// Merge `child` on top of `parent`, child values winning on conflict.
fn merge_values(parent: Value, child: Value) -> Value {
    match (parent, child) {
        (Value::Mapping(mut parent), Value::Mapping(child)) => {
            for (key, child_value) in child {
                let merged = match parent.remove(&key) {
                    Some(parent_value) => merge_values(parent_value, child_value),
                    None => child_value,
                };
                parent.insert(key, merged);
            }
            Value::Mapping(parent)
        }
        (Value::Sequence(mut parent), Value::Sequence(child)) => {
            parent.extend(child);
            Value::Sequence(parent)
        }
        (_, child) => child,
    }
}
