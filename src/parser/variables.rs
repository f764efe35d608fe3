//! Connector variable substitution.
//!
//! Variables are per-instance placeholders written `${var::name}` in any
//! string leaf of a connector tree or in embedded-file text. Substitution is
//! the same everywhere: one regex finds each placeholder, the captured name
//! is looked up in the supplied map, and unknown names keep their literal
//! placeholder text. Leaving an unresolved placeholder visible is
//! deliberate — a monitoring connector that runs with a visibly wrong value
//! is easier to diagnose than one that silently vanished.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::{Captures, Regex};
use serde_yaml::Value;

use crate::core::Result;
use crate::parser::chain::NodeProcessor;
use crate::utils::yaml;

/// Literal marker that flags a string as variable-bearing. Used both as a
/// cheap pre-filter before running the regex and by
/// [`WorkingConnector::has_variables`](crate::connector::WorkingConnector::has_variables).
pub const VARIABLE_MARKER: &str = "${var::";

fn variable_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\$\{var::([^}]+)\}").unwrap())
}

/// Replace every `${var::name}` occurrence in `content` with its value from
/// `variables`. Unknown names are left untouched.
pub fn substitute_text(content: &str, variables: &BTreeMap<String, String>) -> String {
    variable_pattern()
        .replace_all(content, |caps: &Captures<'_>| {
            variables.get(&caps[1]).cloned().unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

/// Replace `${var::name}` placeholders in every string leaf of `tree`,
/// in place. Leaves without the marker are not rewritten at all.
pub fn substitute_tree(tree: &mut Value, variables: &BTreeMap<String, String>) {
    yaml::for_each_string_mut(tree, &mut |s| {
        if s.contains(VARIABLE_MARKER) {
            *s = substitute_text(s, variables);
        }
    });
}

/// Rewrite-chain step that bakes a fixed variable map into the tree.
///
/// Used by the chain configuration that resolves a template with
/// caller-supplied values ahead of constants resolution; the deferred
/// composer pass calls [`substitute_tree`] directly instead, since its
/// variable maps differ per instance.
pub struct VariableProcessor {
    variables: BTreeMap<String, String>,
}

impl VariableProcessor {
    /// Create a step substituting the given fixed map.
    pub fn new(variables: BTreeMap<String, String>) -> Self {
        Self { variables }
    }
}

impl NodeProcessor for VariableProcessor {
    fn process(&self, mut node: Value) -> Result<Value> {
        substitute_tree(&mut node, &self.variables);
        Ok(node)
    }
}
