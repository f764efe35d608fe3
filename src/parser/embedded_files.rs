//! Embedded-file resolution.
//!
//! Connector bodies reference companion files as `${file::<relative path>}`.
//! After the rewrite chain has produced the merged tree, this resolver
//! locates each referenced file, loads its bytes, assigns it a small numeric
//! id, and rewrites the reference to `${file::<id>}`. Because a child may
//! reference a file that physically lives beside one of its ancestors, the
//! search space is the connector's own directory followed by every ancestor
//! directory collected during ancestry discovery.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::{Captures, Regex};
use serde_yaml::Value;

use crate::connector::EmbeddedFile;
use crate::core::{Error, Result};
use crate::utils::{fs as fs_utils, yaml};

fn file_reference_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\$\{file::([^}]+)\}").unwrap())
}

/// Resolves `${file::...}` references within one connector tree.
pub struct EmbeddedFileResolver {
    connector_file: PathBuf,
    search_directories: Vec<PathBuf>,
}

impl EmbeddedFileResolver {
    /// Build a resolver for the given connector file; `ancestor_directories`
    /// come from the parser's ancestry discovery and are searched after the
    /// connector's own directory.
    pub fn new(connector_file: &Path, ancestor_directories: &[PathBuf]) -> Self {
        let mut search_directories = Vec::with_capacity(ancestor_directories.len() + 1);
        if let Some(own) = connector_file.parent() {
            search_directories.push(own.to_path_buf());
        }
        for dir in ancestor_directories {
            if !search_directories.contains(dir) {
                search_directories.push(dir.clone());
            }
        }
        Self { connector_file: connector_file.to_path_buf(), search_directories }
    }

    /// Load every referenced file and rewrite references in `tree` to their
    /// numeric ids. Ids are assigned in document order starting at 1; two
    /// references to the same on-disk file share an id.
    pub fn resolve(&self, tree: &mut Value) -> Result<BTreeMap<u32, EmbeddedFile>> {
        // Collect references in document order before touching the tree, so
        // a missing file aborts with nothing half-rewritten.
        let mut references: Vec<String> = Vec::new();
        yaml::for_each_string(tree, &mut |leaf| {
            for caps in file_reference_pattern().captures_iter(leaf) {
                let reference = caps[1].to_string();
                if reference.parse::<u32>().is_err() && !references.contains(&reference) {
                    references.push(reference);
                }
            }
        });

        let mut files = BTreeMap::new();
        let mut id_by_reference: BTreeMap<String, u32> = BTreeMap::new();
        let mut id_by_path: BTreeMap<PathBuf, u32> = BTreeMap::new();
        let mut next_id: u32 = 1;

        for reference in references {
            let path = self.locate(&reference)?;
            let id = match id_by_path.get(&path) {
                Some(id) => *id,
                None => {
                    let content =
                        std::fs::read(&path).map_err(|e| Error::io(&path, e))?;
                    let id = next_id;
                    next_id += 1;
                    files.insert(id, EmbeddedFile::new(content, reference.clone()));
                    id_by_path.insert(path, id);
                    id
                }
            };
            id_by_reference.insert(reference, id);
        }

        if !id_by_reference.is_empty() {
            yaml::for_each_string_mut(tree, &mut |leaf| {
                if !leaf.contains("${file::") {
                    return;
                }
                *leaf = file_reference_pattern()
                    .replace_all(leaf, |caps: &Captures<'_>| match id_by_reference.get(&caps[1]) {
                        Some(id) => format!("${{file::{id}}}"),
                        None => caps[0].to_string(),
                    })
                    .into_owned();
            });
        }

        Ok(files)
    }

    fn locate(&self, reference: &str) -> Result<PathBuf> {
        self.search_directories
            .iter()
            .map(|dir| fs_utils::normalize(&dir.join(reference)))
            .find(|candidate| candidate.is_file())
            .ok_or_else(|| Error::EmbeddedFileNotFound {
                reference: reference.to_string(),
                file: self.connector_file.clone(),
            })
    }
}
