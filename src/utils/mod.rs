//! Small shared helpers: YAML tree walking and file-system lookups used by
//! the parser and the rewrite steps.

pub mod fs;
pub mod yaml;
