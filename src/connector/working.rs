//! Working connectors: the mutable intermediate between a raw template and
//! a finalized connector instance.

use std::collections::BTreeMap;

use serde_yaml::Value;

use crate::connector::{ConnectorId, EmbeddedFile, RawConnector};
use crate::parser::variables::VARIABLE_MARKER;
use crate::utils::yaml;

/// A per-resolution working copy of a raw connector.
///
/// Created for every resolution attempt and discarded once a final
/// [`Connector`](crate::connector::Connector) has been produced. The tree
/// and the embedded files are owned deep copies, so substitution on one
/// working connector can never leak into the raw store or into a sibling
/// instance of the same template.
#[derive(Debug, Clone)]
pub struct WorkingConnector {
    id: ConnectorId,
    tree: Value,
    embedded_files: BTreeMap<u32, EmbeddedFile>,
}

impl WorkingConnector {
    /// Start a resolution attempt for `raw` under the given id, deep-copying
    /// the template's tree and embedded files.
    pub fn new(id: ConnectorId, raw: &RawConnector) -> Self {
        Self {
            id,
            tree: raw.tree().clone(),
            embedded_files: raw.embedded_files().clone(),
        }
    }

    /// The resolution-time id of this copy.
    pub fn id(&self) -> &ConnectorId {
        &self.id
    }

    /// The working tree.
    pub fn tree(&self) -> &Value {
        &self.tree
    }

    /// Mutable access to the working tree.
    pub fn tree_mut(&mut self) -> &mut Value {
        &mut self.tree
    }

    /// The working embedded files.
    pub fn embedded_files(&self) -> &BTreeMap<u32, EmbeddedFile> {
        &self.embedded_files
    }

    /// Mutable access to the working embedded files.
    pub fn embedded_files_mut(&mut self) -> &mut BTreeMap<u32, EmbeddedFile> {
        &mut self.embedded_files
    }

    /// Consume the working copy, yielding the tree and embedded files.
    pub fn into_parts(self) -> (ConnectorId, Value, BTreeMap<u32, EmbeddedFile>) {
        (self.id, self.tree, self.embedded_files)
    }

    /// Whether the tree or any embedded file still contains a `${var::`
    /// occurrence. Templates answering `true` are excluded from the eager
    /// store and deferred until per-resource variable values are available.
    pub fn has_variables(&self) -> bool {
        let mut found = false;
        yaml::for_each_string(&self.tree, &mut |s| {
            if s.contains(VARIABLE_MARKER) {
                found = true;
            }
        });
        if found {
            return true;
        }

        self.embedded_files
            .values()
            .any(|file| file.decode_as_text().contains(VARIABLE_MARKER))
    }

    /// Deep copy under a new identity, used to fan a template out into
    /// several differently-configured instances. No structure is shared
    /// between the clone and `self`.
    pub fn clone_as(&self, new_id: ConnectorId) -> Self {
        let mut clone = self.clone();
        clone.id = new_id;
        clone
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(yaml: &str) -> RawConnector {
        RawConnector::new(serde_yaml::from_str(yaml).unwrap(), BTreeMap::new())
    }

    #[test]
    fn detects_variables_in_the_tree() {
        let with = WorkingConnector::new(
            ConnectorId::from("a"),
            &raw("connector:\n  displayName: A\nsource: 'limit ${var::threshold}'"),
        );
        assert!(with.has_variables());

        let without = WorkingConnector::new(
            ConnectorId::from("b"),
            &raw("connector:\n  displayName: B\nsource: 'limit 10'"),
        );
        assert!(!without.has_variables());
    }

    #[test]
    fn variable_declarations_alone_do_not_count() {
        // A template may declare variables it never references; nothing
        // needs substituting, so it is eligible for the eager pass.
        let connector = WorkingConnector::new(
            ConnectorId::from("c"),
            &raw("connector:\n  displayName: C\n  variables:\n    unit:\n      defaultValue: GB"),
        );
        assert!(!connector.has_variables());
    }

    #[test]
    fn detects_variables_in_embedded_files_only() {
        let mut files = BTreeMap::new();
        files.insert(1, EmbeddedFile::new(b"print ${var::unit}".to_vec(), "p.awk"));
        let raw = RawConnector::new(
            serde_yaml::from_str("connector:\n  displayName: D").unwrap(),
            files,
        );
        assert!(WorkingConnector::new(ConnectorId::from("d"), &raw).has_variables());
    }

    #[test]
    fn clone_as_renames_without_sharing() {
        let mut files = BTreeMap::new();
        files.insert(1, EmbeddedFile::new(b"original".to_vec(), "s.sh"));
        let raw = RawConnector::new(serde_yaml::from_str("k: v").unwrap(), files);
        let base = WorkingConnector::new(ConnectorId::from("base"), &raw);

        let mut clone = base.clone_as(ConnectorId::from("base-custom"));
        clone
            .embedded_files_mut()
            .get_mut(&1)
            .unwrap()
            .set_content(b"mutated".to_vec());
        clone.tree_mut()["k"] = Value::from("changed");

        assert_eq!(clone.id().as_str(), "base-custom");
        assert_eq!(base.embedded_files()[&1].decode_as_text(), "original");
        assert_eq!(base.tree()["k"], Value::from("v"));
    }
}
