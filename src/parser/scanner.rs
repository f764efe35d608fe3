//! The library scanner: turns a directory tree into raw connector records.
//!
//! The scan is a one-shot, blocking walk executed at agent boot and on
//! explicit configuration reload. Only files with the template extension
//! are considered, and only documents declaring a non-empty
//! `connector.displayName` are loaded as top-level connectors — everything
//! else is a fragment, usable as an `extends` ancestor but never surfaced
//! under its own id. One malformed connector never blocks the rest of the
//! library: per-file failures are logged and skipped.

use std::collections::BTreeMap;
use std::path::Path;
use std::time::Instant;

use serde_yaml::Value;
use tracing::{debug, error, info, warn};
use walkdir::WalkDir;

use crate::connector::{ConnectorId, RawConnector};
use crate::parser::{ConnectorParser, TEMPLATE_EXTENSION};
use crate::utils::fs as fs_utils;

/// Scan `root` recursively, parsing every genuine connector file.
///
/// Returns the raw connectors keyed case-insensitively by file stem. The
/// scan itself never fails; an unreadable root simply yields an empty map.
pub fn scan(root: &Path) -> BTreeMap<ConnectorId, RawConnector> {
    let started = Instant::now();
    let mut store = BTreeMap::new();

    for entry in WalkDir::new(root) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("skipping unreadable entry under `{}`: {e}", root.display());
                continue;
            }
        };
        let path = entry.path();
        if !entry.file_type().is_file() || !is_template_file(path) {
            continue;
        }

        let node = match fs_utils::read_yaml(path) {
            Ok(node) => node,
            Err(e) => {
                error!("error while parsing connector `{}`: {e}", path.display());
                debug!("parse failure detail: {e:?}");
                continue;
            }
        };
        if !is_connector(&node) {
            // extends-only fragment
            continue;
        }
        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };

        let parser = ConnectorParser::new(path.parent().unwrap_or(root));
        match parser.parse_raw(path) {
            Ok(raw) => {
                store.insert(ConnectorId::from(stem), raw);
            }
            Err(e) => {
                error!("error while parsing connector `{}`: {e}", path.display());
                debug!("parse failure detail: {e:?}");
            }
        }
    }

    info!(
        "connector library scan of `{}` loaded {} connector(s) in {:?}",
        root.display(),
        store.len(),
        started.elapsed()
    );
    store
}

fn is_template_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(TEMPLATE_EXTENSION))
}

fn is_connector(node: &Value) -> bool {
    node.get("connector")
        .and_then(|section| section.get("displayName"))
        .and_then(Value::as_str)
        .is_some_and(|name| !name.is_empty())
}
