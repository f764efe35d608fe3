//! Core types shared across the pipeline: the error taxonomy and the
//! crate-wide [`Result`] alias.

pub mod error;

pub use error::{Error, Result};
