//! Integration test suite for conhub.
//!
//! End-to-end runs of the resolution pipeline over on-disk connector
//! libraries, organized by area:
//! - **library_scan**: directory scanning, ancestry resolution, per-file
//!   error isolation
//! - **store_compose**: two-phase resolution, instance fan-out, isolation
//!   between instances and the raw snapshot
//! - **cli**: binary-level smoke tests
//!
//! ```bash
//! cargo test --test integration
//! ```

#[path = "../common/mod.rs"]
mod common;

mod cli;
mod library_scan;
mod store_compose;
