//! Scanner module for directory traversal and file checksums.
//!
//! This module provides functionality for:
//! - Per-directory file enumeration using walkdir
//! - Streaming content checksums with a selectable digest
//! - Hard link detection
//!
//! # Architecture
//!
//! The scanner is divided into submodules:
//! - [`walker`]: Directory traversal and file discovery
//! - [`hasher`]: Streaming checksums (md5, sha1, sha2 family, BLAKE3)
//! - [`hardlink`]: Same-file detection via device/inode pairs
//!
//! # Example
//!
//! ```no_run
//! use twintrim::scanner::walker::DirectoryWalker;
//! use std::path::Path;
//!
//! let walker = DirectoryWalker::new(Path::new("."), false);
//! for entry in walker.walk() {
//!     match entry {
//!         Ok(record) => println!("{}", record.path.display()),
//!         Err(e) => eprintln!("Warning: {}", e),
//!     }
//! }
//! ```

pub mod hardlink;
pub mod hasher;
pub mod walker;

use std::path::{Path, PathBuf};

// Re-export main types
pub use hasher::{Checksummer, HashAlgorithm, UnknownHashAlgorithm};
pub use walker::DirectoryWalker;

/// A file discovered during the scan.
///
/// Records are created once per enumerated file and never mutated. The
/// `stem` and `extension` are derived from `name`, so identity is effectively
/// the `(name, path)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FileRecord {
    /// Bare filename, e.g. `foo (1).txt`
    pub name: String,
    /// Filename without its final extension, e.g. `foo (1)`
    pub stem: String,
    /// Final extension including the dot, e.g. `.txt` (empty if none)
    pub extension: String,
    /// Full path to the file
    pub path: PathBuf,
}

impl FileRecord {
    /// Create a record for `name` inside directory `dir`.
    #[must_use]
    pub fn new(dir: &Path, name: &str) -> Self {
        let path = dir.join(name);
        let (stem, extension) = split_extension(name);
        Self {
            name: name.to_string(),
            stem: stem.to_string(),
            extension: extension.to_string(),
            path,
        }
    }

    /// Create a record from a full path.
    ///
    /// Non UTF-8 filenames are converted lossily for `name`; `path` keeps the
    /// original bytes so filesystem operations still hit the right entry.
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let (stem, extension) = split_extension(&name);
        Self {
            stem: stem.to_string(),
            extension: extension.to_string(),
            name,
            path: path.to_path_buf(),
        }
    }

    /// Directory containing this file.
    #[must_use]
    pub fn directory(&self) -> &Path {
        self.path.parent().unwrap_or_else(|| Path::new(""))
    }
}

/// Split a filename into stem and extension.
///
/// Leading dots do not start an extension, so `.bashrc` has none.
fn split_extension(name: &str) -> (&str, &str) {
    let body_start = name.len() - name.trim_start_matches('.').len();
    match name[body_start..].rfind('.') {
        Some(dot) => name.split_at(body_start + dot),
        None => (name, ""),
    }
}

/// Errors that can occur while enumerating a directory tree.
#[derive(thiserror::Error, Debug)]
pub enum ScanError {
    /// An entry could not be read during traversal.
    #[error("Traversal failed at {path}: {message}")]
    Traversal {
        /// Path where the error occurred
        path: PathBuf,
        /// Description of the failure
        message: String,
    },
}

impl ScanError {
    /// Path associated with this error.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::Traversal { path, .. } => path,
        }
    }
}
