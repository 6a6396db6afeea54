//! Directory clumping, the first stage of the chain.
//!
//! Every directory is its own clump domain: duplicates are only ever looked
//! for among files that share a containing directory, even in recursive mode.

use std::path::{Path, PathBuf};

use super::{ClassificationError, ClumpKey, ClumpOutcome, Clumper, KeyPart};
use crate::scanner::{DirectoryWalker, FileRecord, ScanError};

/// Groups files by containing directory.
#[derive(Debug, Clone)]
pub struct PathClumper {
    root: PathBuf,
    recursive: bool,
}

impl PathClumper {
    /// Create a clumper rooted at `root`.
    #[must_use]
    pub fn new(root: &Path, recursive: bool) -> Self {
        Self {
            root: root.to_path_buf(),
            recursive,
        }
    }

    /// Walk the root and produce one clump per directory.
    ///
    /// Entries that cannot be enumerated are reported as
    /// [`ClassificationError::Traversal`] and skipped.
    #[must_use]
    pub fn scan(&self) -> ClumpOutcome {
        log::info!(
            "Scanning {}{}",
            self.root.display(),
            if self.recursive { " recursively" } else { "" }
        );

        let mut outcome = ClumpOutcome::default();
        let walker = DirectoryWalker::new(&self.root, self.recursive);

        for entry in walker.walk() {
            match entry {
                Ok(record) => match self.make_key(&record) {
                    Ok(part) => outcome.clumps.insert(ClumpKey::new().with(part), record),
                    Err(err) => outcome.errors.push(err),
                },
                Err(ScanError::Traversal { path, message }) => {
                    let err = ClassificationError::Traversal { path, message };
                    log::error!("{}: {}", self.name(), err);
                    outcome.errors.push(err);
                }
            }
        }

        log::info!(
            "Found {} files in {} directories",
            outcome.clumps.file_count(),
            outcome.clumps.len()
        );
        outcome
    }
}

impl Clumper for PathClumper {
    fn name(&self) -> &'static str {
        "path"
    }

    fn make_key(&self, record: &FileRecord) -> Result<KeyPart, ClassificationError> {
        Ok(KeyPart::Directory(record.directory().to_path_buf()))
    }
}
