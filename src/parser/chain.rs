//! The rewrite chain: an ordered list of pure tree-to-tree steps.
//!
//! Each step implements [`NodeProcessor`] and is independently testable; the
//! chain itself is nothing more than function composition, assembled in one
//! of two fixed configurations. Ordering is explicit at the assembly site —
//! there is no linked "next" pointer threaded through the steps.
//!
//! The two configurations mirror the two ways a connector is resolved:
//!
//! - [`ProcessorChain::standard`] — extends-merge → constants →
//!   reference-resolution → source-key-assignment. Used by the library scan
//!   and the eager pass, where no variable values exist yet.
//! - [`ProcessorChain::with_variables`] — extends-merge → variable
//!   substitution (fixed map) → reference-resolution → constants →
//!   source-key-assignment. Used when a caller-supplied variable map must be
//!   baked in ahead of constants resolution.

use std::collections::BTreeMap;
use std::path::Path;

use serde_yaml::Value;

use crate::core::Result;
use crate::parser::constants::ConstantsProcessor;
use crate::parser::extends::ExtendsProcessor;
use crate::parser::reference::ReferenceResolverProcessor;
use crate::parser::source_key::SourceKeyProcessor;
use crate::parser::variables::VariableProcessor;

/// One rewrite step. Implementations take the tree by value and hand back
/// the rewritten tree; any file access they need (the extends step loads
/// ancestors) is bound in at construction time.
pub trait NodeProcessor {
    /// Rewrite `node`, returning the transformed tree.
    fn process(&self, node: Value) -> Result<Value>;
}

/// An ordered, fixed list of rewrite steps.
pub struct ProcessorChain {
    steps: Vec<Box<dyn NodeProcessor>>,
}

impl ProcessorChain {
    /// The standard configuration used for variable-free resolution.
    pub fn standard(connector_directory: &Path) -> Self {
        Self {
            steps: vec![
                Box::new(ExtendsProcessor::new(connector_directory)),
                Box::new(ConstantsProcessor::new()),
                Box::new(ReferenceResolverProcessor::new()),
                Box::new(SourceKeyProcessor::new()),
            ],
        }
    }

    /// The configuration that bakes a fixed variable map in ahead of
    /// constants resolution.
    pub fn with_variables(
        connector_directory: &Path,
        variables: BTreeMap<String, String>,
    ) -> Self {
        Self {
            steps: vec![
                Box::new(ExtendsProcessor::new(connector_directory)),
                Box::new(VariableProcessor::new(variables)),
                Box::new(ReferenceResolverProcessor::new()),
                Box::new(ConstantsProcessor::new()),
                Box::new(SourceKeyProcessor::new()),
            ],
        }
    }

    /// Run every step in order.
    pub fn process(&self, node: Value) -> Result<Value> {
        let mut node = node;
        for step in &self.steps {
            node = step.process(node)?;
        }
        Ok(node)
    }
}
