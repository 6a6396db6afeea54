//! Directory walker built on walkdir.
//!
//! # Overview
//!
//! This module provides the [`DirectoryWalker`] struct for enumerating the
//! regular files under a root directory. Without recursion only the root's
//! direct children are visited. Entries are sorted by filename so every run
//! sees the same order.
//!
//! Symbolic links are never followed and never reported; special files
//! (sockets, FIFOs, devices) are skipped as well.
//!
//! # Example
//!
//! ```no_run
//! use twintrim::scanner::DirectoryWalker;
//! use std::path::Path;
//!
//! let walker = DirectoryWalker::new(Path::new("/home/user/Downloads"), true);
//! let files: Vec<_> = walker.walk().filter_map(Result::ok).collect();
//! println!("Found {} files", files.len());
//! ```

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use super::{FileRecord, ScanError};

/// Sequential walker yielding one [`FileRecord`] per regular file.
#[derive(Debug, Clone)]
pub struct DirectoryWalker {
    /// Root path to walk
    root: PathBuf,
    /// Descend into subdirectories
    recursive: bool,
}

impl DirectoryWalker {
    /// Create a new walker for the given path.
    #[must_use]
    pub fn new(root: &Path, recursive: bool) -> Self {
        Self {
            root: root.to_path_buf(),
            recursive,
        }
    }

    /// Root directory of this walk.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Walk the directory tree, yielding file records.
    ///
    /// Errors are yielded as [`ScanError`] values rather than stopping
    /// iteration, so an unreadable subdirectory only loses its own files.
    pub fn walk(&self) -> impl Iterator<Item = Result<FileRecord, ScanError>> + '_ {
        let max_depth = if self.recursive { usize::MAX } else { 1 };

        WalkDir::new(&self.root)
            .min_depth(1)
            .max_depth(max_depth)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_map(move |entry_result| match entry_result {
                Ok(entry) => {
                    let file_type = entry.file_type();
                    if file_type.is_dir() {
                        return None;
                    }
                    if file_type.is_symlink() {
                        log::trace!("Skipping symlink: {}", entry.path().display());
                        return None;
                    }
                    if !file_type.is_file() {
                        log::trace!("Skipping special file: {}", entry.path().display());
                        return None;
                    }
                    Some(Ok(FileRecord::from_path(entry.path())))
                }
                Err(e) => {
                    let path = e
                        .path()
                        .map_or_else(|| self.root.clone(), Path::to_path_buf);
                    log::warn!("Failed to read {}: {}", path.display(), e);
                    Some(Err(ScanError::Traversal {
                        path,
                        message: e.to_string(),
                    }))
                }
            })
    }
}
