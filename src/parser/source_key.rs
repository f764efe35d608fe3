//! The source-key-assignment rewrite step.
//!
//! Runs last in every chain configuration: each data-source entry under
//! `pre` or under a job's `sources` map receives a `key` field holding its
//! absolute `${source::...}` path. Downstream dependency ordering works off
//! these keys. An explicit `key` already present is respected.

use serde_yaml::{Mapping, Value};

use crate::core::Result;
use crate::parser::chain::NodeProcessor;
use crate::parser::reference::JOB_KEYS;

const KEY_FIELD: &str = "key";

/// Rewrite step stamping every source entry with its canonical key.
pub struct SourceKeyProcessor;

impl SourceKeyProcessor {
    /// Create the step.
    pub fn new() -> Self {
        Self
    }
}

impl Default for SourceKeyProcessor {
    fn default() -> Self {
        Self::new()
    }
}

fn assign_keys(sources: &mut Mapping, path_prefix: &str) {
    for (name, source) in sources.iter_mut() {
        let Some(name) = name.as_str() else {
            continue;
        };
        let Value::Mapping(source) = source else {
            continue;
        };
        if !source.contains_key(KEY_FIELD) {
            source.insert(
                Value::from(KEY_FIELD),
                Value::from(format!("${{source::{path_prefix}{name}}}")),
            );
        }
    }
}

impl NodeProcessor for SourceKeyProcessor {
    fn process(&self, mut node: Value) -> Result<Value> {
        if let Some(Value::Mapping(pre)) = node.get_mut("pre") {
            assign_keys(pre, "pre.");
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
                    if let Some(Value::Mapping(sources)) =
                        jobs.get_mut(job_name).and_then(|job| job.get_mut("sources"))
                    {
                        let prefix = format!("monitors.{monitor_name}.{job_name}.sources.");
                        assign_keys(sources, &prefix);
                    }
                }
            }
        }

        Ok(node)
    }
}
