//! conhub - connector definition resolution for declarative monitoring
//!
//! A hardware/IT monitoring agent does not hard-code its monitoring logic:
//! it loads hundreds of declarative "connector" definitions — YAML trees
//! describing what to query, how to transform results, and what to emit.
//! This crate is the resolution pipeline that turns a directory of raw,
//! possibly-inheriting, possibly-parameterized connector templates into
//! fully self-contained, executable connector objects.
//!
//! # Pipeline Overview
//!
//! ```text
//! directory ──scan──▶ RawConnectorStore ──eager pass──▶ ConnectorStore
//!                          │                                 │ pending ids
//!                          └──────────deferred pass──────────┘
//!                                        │ per-resource overrides
//!                                        ▼
//!                                ResolutionResult
//! ```
//!
//! - The [`parser::scanner`] walks the library, loading every genuine
//!   (display-named) template through the single-file parser.
//! - [`parser::ConnectorParser`] resolves a file's `extends` ancestry, runs
//!   a fixed chain of tree rewrites (inheritance flattening, constants
//!   inlining, reference normalization, source-key assignment), and
//!   extracts embedded files.
//! - [`parser::StoreComposer`] resolves in two phases: templates without
//!   `${var::...}` placeholders finalize eagerly; the rest are deferred
//!   until per-resource overrides supply variable values, then fan out into
//!   one default instance plus one instance per override.
//!
//! # Core Modules
//!
//! - [`connector`] - data model: raw snapshots, working copies, the typed
//!   connector, embedded files, case-insensitive ids
//! - [`parser`] - scanner, single-file parser, rewrite chain, composer
//! - [`config`] - instance override configuration
//! - [`update`] - post-deserialization update chain
//! - [`core`] - error taxonomy
//! - [`cli`] - the `conhub` binary's command surface
//!
//! # Example
//!
//! ```rust,no_run
//! use std::collections::BTreeMap;
//! use std::path::Path;
//! use std::sync::Arc;
//!
//! use conhub::connector::RawConnectorStore;
//! use conhub::parser::StoreComposer;
//!
//! // One-shot startup scan: the snapshot is the source of truth for every
//! // later (re-)resolution.
//! let raw_store = Arc::new(RawConnectorStore::load(Path::new("connectors")));
//! let composer = StoreComposer::new(Arc::clone(&raw_store));
//!
//! // Phase 1: every variable-free template, resolved eagerly.
//! let store = composer.build_eager_store();
//!
//! // Phase 2: per-resource resolution of the pending templates.
//! let result = composer.resolve_deferred(&store, &BTreeMap::new());
//! for (id, connector) in result.custom_connectors() {
//!     println!("{id}: {} source(s)", connector.source_keys.len());
//! }
//! ```
//!
//! # Error Philosophy
//!
//! One malformed connector never blocks the rest of the library: per-file
//! and per-instance failures are logged with the offending id and omitted
//! from the result. An unknown `${var::...}` placeholder is left as literal
//! text — for a monitoring agent, a visibly wrong metric beats an absent
//! one.

pub mod cli;
pub mod config;
pub mod connector;
pub mod core;
pub mod parser;
pub mod update;
pub mod utils;
