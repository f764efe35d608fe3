//! Connector data model: raw snapshots, working copies, and the typed
//! connector produced by finalization.
//!
//! The lifecycle is strictly one-directional:
//!
//! ```text
//! file ──parse──▶ RawConnector ──deep copy──▶ WorkingConnector ──finalize──▶ Connector
//!                 (immutable)                 (mutable, per attempt)         (typed)
//! ```
//!
//! A [`RawConnector`] is never mutated once stored; every resolution attempt
//! operates on a [`WorkingConnector`] deep copy, and sibling instances of
//! the same template never share structure.

mod embedded;
mod id;
mod model;
mod raw;
mod store;
mod working;

pub use embedded::EmbeddedFile;
pub use id::ConnectorId;
pub use model::{Connector, ConnectorSection, VariableDeclaration};
pub use raw::{RawConnector, RawConnectorStore};
pub use store::ConnectorStore;
pub use working::WorkingConnector;
