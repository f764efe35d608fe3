//! The constants-substitution rewrite step.
//!
//! A connector may declare a top-level `constants` map of file-local named
//! values referenced as `${constants.<name>}` in string leaves. This step
//! consumes the `constants` section and inlines every reference. Unknown
//! references stay literal, consistent with variable substitution.

use serde_yaml::Value;

use crate::core::Result;
use crate::parser::chain::NodeProcessor;
use crate::utils::yaml;

/// Key consumed by this step.
const CONSTANTS_KEY: &str = "constants";

/// Rewrite step inlining `${constants.<name>}` references.
pub struct ConstantsProcessor;

impl ConstantsProcessor {
    /// Create the step.
    pub fn new() -> Self {
        Self
    }
}

impl Default for ConstantsProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl NodeProcessor for ConstantsProcessor {
    fn process(&self, mut node: Value) -> Result<Value> {
        let constants = match &mut node {
            Value::Mapping(map) => match map.remove(CONSTANTS_KEY) {
                Some(Value::Mapping(constants)) => constants,
                Some(_) | None => return Ok(node),
            },
            _ => return Ok(node),
        };

        let replacements: Vec<(String, String)> = constants
            .iter()
            .filter_map(|(name, value)| {
                let name = name.as_str()?;
                let value = yaml::scalar_to_string(value)?;
                Some((format!("${{constants.{name}}}"), value))
            })
            .collect();

        yaml::for_each_string_mut(&mut node, &mut |leaf| {
            for (placeholder, value) in &replacements {
                if leaf.contains(placeholder.as_str()) {
                    *leaf = leaf.replace(placeholder.as_str(), value);
                }
            }
        });

        Ok(node)
    }
}
