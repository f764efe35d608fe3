//! Shared test fixtures: on-disk connector libraries built in a TempDir.

use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// A temporary connector library directory.
///
/// Dropping the fixture removes the directory.
pub struct LibraryFixture {
    temp: TempDir,
}

impl LibraryFixture {
    /// Create an empty library.
    pub fn new() -> Self {
        Self { temp: TempDir::new().expect("failed to create temp library") }
    }

    /// The library root.
    pub fn path(&self) -> &Path {
        self.temp.path()
    }

    /// Write a file under the library root, creating parent directories.
    /// Returns the absolute path.
    pub fn file(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.temp.path().join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("failed to create fixture directory");
        }
        std::fs::write(&path, content).expect("failed to write fixture file");
        path
    }
}

impl Default for LibraryFixture {
    fn default() -> Self {
        Self::new()
    }
}
