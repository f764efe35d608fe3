//! File-system lookups shared by the parser and the extends step.

use std::path::{Path, PathBuf};

use serde_yaml::Value;

use crate::core::{Error, Result};

/// Directory name that roots a connector library. Ancestor references that
/// are not explicit relative paths are resolved against this directory.
pub const CONNECTORS_DIRECTORY: &str = "connectors";

/// Read and parse a YAML document, tagging errors with the path.
pub fn read_yaml(path: &Path) -> Result<Value> {
    let content = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    serde_yaml::from_str(&content).map_err(|e| Error::yaml(path, e))
}

/// Walk upward from `start` looking for the nearest enclosing directory
/// named [`CONNECTORS_DIRECTORY`], including `start` itself.
pub fn find_connectors_directory(start: &Path) -> Option<PathBuf> {
    let mut current = Some(start);
    while let Some(dir) = current {
        if dir.file_name().is_some_and(|name| name == CONNECTORS_DIRECTORY) {
            return Some(dir.to_path_buf());
        }
        current = dir.parent();
    }
    None
}

/// Lexically normalize a path, resolving `.` and `..` components without
/// touching the file system (the target may not exist yet).
pub fn normalize(path: &Path) -> PathBuf {
    use std::path::Component;

    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !normalized.pop() {
                    normalized.push(Component::ParentDir);
                }
            }
            other => normalized.push(other),
        }
    }
    normalized
}
