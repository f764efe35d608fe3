//! Error handling for conhub
//!
//! The pipeline distinguishes two failure scopes (and the public entry points
//! guarantee that neither escapes them):
//!
//! - **File-local fatal**: a malformed document, an unresolvable `extends`
//!   ancestor, a circular ancestry, a missing embedded file, or a failed
//!   finalize. These are raised as [`Error`] values from the single-file
//!   parser or the composer, caught at the smallest enclosing scope (per file
//!   during the library scan, per instance during deferred resolution),
//!   logged with the offending id, and omitted from the result.
//! - **Silent**: an unknown `${var::...}` or `${constants....}` placeholder is
//!   left as literal text. A visibly wrong connector beats an absent one for
//!   a monitoring agent, so this is not an error at all.
//!
//! [`Error`] is a conventional `thiserror` enum; use the crate-wide
//! [`Result`] alias in library code and attach `anyhow` context only at the
//! binary boundary.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the connector resolution pipeline.
///
/// Every variant carries enough context to be logged on its own (the path or
/// id it concerns), because the usual consumer is an isolation point that
/// logs and moves on rather than a caller that propagates.
#[derive(Error, Debug)]
pub enum Error {
    /// An `extends` reference could not be resolved against the current
    /// file's directory nor against the enclosing `connectors` root.
    #[error("cannot resolve extends ancestor `{reference}` referenced from `{file}`")]
    UnresolvedAncestor {
        /// The ancestor reference as written in the `extends` list.
        reference: String,
        /// The file whose ancestry was being resolved.
        file: PathBuf,
    },

    /// The `extends` ancestry loops back onto a file already being resolved.
    #[error("circular extends chain detected at `{file}`")]
    CircularExtends {
        /// The first file encountered twice on the ancestry path.
        file: PathBuf,
    },

    /// A `${file::...}` reference did not match any file next to the
    /// connector or any of its ancestors.
    #[error("embedded file `{reference}` not found for connector `{file}`")]
    EmbeddedFileNotFound {
        /// The reference as written in the connector body.
        reference: String,
        /// The connector file containing the reference.
        file: PathBuf,
    },

    /// The document is not parseable YAML.
    #[error("failed to parse `{file}` as YAML")]
    Yaml {
        /// The file that failed to parse.
        file: PathBuf,
        /// The underlying parser error.
        #[source]
        source: serde_yaml::Error,
    },

    /// A fully resolved tree could not be deserialized into a [`Connector`].
    ///
    /// [`Connector`]: crate::connector::Connector
    #[error("failed to deserialize connector `{id}`")]
    Deserialization {
        /// The resolution-time instance id.
        id: String,
        /// The underlying deserializer error.
        #[source]
        source: serde_yaml::Error,
    },

    /// An I/O failure with the path it occurred on.
    #[error("I/O error on `{path}`")]
    Io {
        /// The path being read.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// Wrap an I/O error with the path it occurred on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }

    /// Wrap a YAML parse error with the file it occurred in.
    pub fn yaml(file: impl Into<PathBuf>, source: serde_yaml::Error) -> Self {
        Self::Yaml { file: file.into(), source }
    }
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;
