//! The reference-resolution rewrite step.
//!
//! Sources reference each other as `${source::<name>}`. Authors write the
//! short relative form inside a job (`${source::diskTable}`); downstream
//! dependency bookkeeping needs the absolute form
//! (`${source::monitors.disk.discovery.sources.diskTable}`). This step
//! rewrites every relative reference found under `pre` or under a monitor
//! job to its absolute equivalent. References already anchored at
//! `monitors.` or `pre.` are left as-is.

use std::sync::OnceLock;

use regex::{Captures, Regex};
use serde_yaml::Value;

use crate::core::Result;
use crate::parser::chain::NodeProcessor;
use crate::utils::yaml;

/// Job sections whose subtrees carry relative source references.
pub(crate) const JOB_KEYS: [&str; 3] = ["discovery", "collect", "simple"];

fn source_reference_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\$\{source::([^}]+)\}").unwrap())
}

/// Rewrite step normalizing relative source references to absolute keys.
pub struct ReferenceResolverProcessor;

impl ReferenceResolverProcessor {
    /// Create the step.
    pub fn new() -> Self {
        Self
    }
}

impl Default for ReferenceResolverProcessor {
    fn default() -> Self {
        Self::new()
    }
}

/// Rewrite every relative `${source::X}` under `node` to
/// `${source::<prefix>X}`.
fn qualify_references(node: &mut Value, prefix: &str) {
    yaml::for_each_string_mut(node, &mut |leaf| {
        if !leaf.contains("${source::") {
            return;
        }
        *leaf = source_reference_pattern()
            .replace_all(leaf, |caps: &Captures<'_>| {
                let name = &caps[1];
                if name.starts_with("monitors.") || name.starts_with("pre.") {
                    caps[0].to_string()
                } else {
                    format!("${{source::{prefix}{name}}}")
                }
            })
            .into_owned();
    });
}

impl NodeProcessor for ReferenceResolverProcessor {
    fn process(&self, mut node: Value) -> Result<Value> {
        if let Some(pre) = node.get_mut("pre") {
            qualify_references(pre, "pre.");
        }

        if let Some(Value::Mapping(monitors)) = node.get_mut("monitors") {
            for (monitor_name, monitor) in monitors.iter_mut() {
                let Some(monitor_name) = monitor_name.as_str() else {
                    continue;
                };
                let Value::Mapping(jobs) = monitor else {
                    continue;
                };
                for job_name in JOB_KEYS {
                    if let Some(job) = jobs.get_mut(job_name) {
                        let prefix = format!("monitors.{monitor_name}.{job_name}.sources.");
                        qualify_references(job, &prefix);
                    }
                }
            }
        }

        Ok(node)
    }
}
