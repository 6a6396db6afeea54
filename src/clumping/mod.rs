//! Clumping: progressive partitioning of files into candidate groups.
//!
//! # Overview
//!
//! A clump is a set of [`FileRecord`]s sharing a composite [`ClumpKey`].
//! Each [`Clumper`] contributes one [`KeyPart`] per file, and
//! [`Clumper::dump`] refines an existing [`Clumps`] mapping by appending that
//! part to every member's key. The chain used by the pipeline is:
//!
//! 1. [`PathClumper`]: containing directory
//! 2. [`RegexClumper`]: captured stem + extension (optional)
//! 3. [`HashClumper`]: full content checksum
//!
//! Only the checksum stage decides what is a duplicate. The earlier stages
//! narrow the candidates so fewer files need to be read.
//!
//! A file that cannot be keyed produces a [`ClassificationError`]; it is
//! dropped from the result and the rest of the batch carries on.
//! Clumps with a single member are passed through unchanged, since no
//! refinement can turn them into duplicates.
//!
//! # Example
//!
//! ```no_run
//! use twintrim::clumping::{Clumper, HashClumper, PathClumper, RegexClumper, DEFAULT_PATTERN};
//! use twintrim::scanner::HashAlgorithm;
//! use std::path::Path;
//!
//! let scanned = PathClumper::new(Path::new("."), false).scan();
//! let named = RegexClumper::new(DEFAULT_PATTERN, None).unwrap().dump(scanned.clumps);
//! let hashed = HashClumper::new(HashAlgorithm::Md5).dump(named.clumps);
//! for (key, members) in hashed.clumps.duplicates() {
//!     println!("{}: {} files", key, members.len());
//! }
//! ```

pub mod hash;
pub mod path;
pub mod pattern;

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::scanner::FileRecord;

pub use hash::HashClumper;
pub use path::PathClumper;
pub use pattern::{RegexClumper, DEFAULT_KEY_GROUPS, DEFAULT_PATTERN};

/// Error raised when a file cannot be assigned a clump key.
#[derive(Debug, Error)]
pub enum ClassificationError {
    /// The filename did not match the active pattern.
    #[error("{path}: filename does not match pattern '{pattern}'")]
    NoMatch {
        /// Path of the unmatched file
        path: PathBuf,
        /// Pattern that was applied
        pattern: String,
    },

    /// The file could not be read for checksumming.
    #[error("{path}: checksum generation failed: {source}")]
    Unreadable {
        /// Path of the unreadable file
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },

    /// A directory entry could not be enumerated.
    #[error("{path}: traversal failed: {message}")]
    Traversal {
        /// Path where traversal failed
        path: PathBuf,
        /// Description of the failure
        message: String,
    },
}

impl ClassificationError {
    /// Path of the item that could not be classified.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::NoMatch { path, .. }
            | Self::Unreadable { path, .. }
            | Self::Traversal { path, .. } => path,
        }
    }

    /// Whether the file could not be read, as opposed to simply not
    /// matching the pattern.
    #[must_use]
    pub fn is_failure(&self) -> bool {
        !matches!(self, Self::NoMatch { .. })
    }
}

/// One stage's contribution to a composite key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum KeyPart {
    /// Containing directory
    Directory(PathBuf),
    /// Concatenated capture groups of the filename
    Name(String),
    /// Hex digest of the file content
    Checksum(String),
}

impl fmt::Display for KeyPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Directory(dir) => write!(f, "{}", dir.display()),
            Self::Name(name) => write!(f, "{:?}", name),
            Self::Checksum(sum) => f.write_str(sum),
        }
    }
}

/// Composite key accumulated across stages, in stage order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClumpKey(Vec<KeyPart>);

impl ClumpKey {
    /// An empty key, before any stage has run.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A copy of this key with `part` appended.
    #[must_use]
    pub fn with(&self, part: KeyPart) -> Self {
        let mut parts = self.0.clone();
        parts.push(part);
        Self(parts)
    }

    /// The parts of this key in stage order.
    #[must_use]
    pub fn parts(&self) -> &[KeyPart] {
        &self.0
    }

    /// The most recently appended part.
    #[must_use]
    pub fn last(&self) -> Option<&KeyPart> {
        self.0.last()
    }

    /// Whether the checksum stage has keyed this clump.
    #[must_use]
    pub fn is_checksummed(&self) -> bool {
        matches!(self.last(), Some(KeyPart::Checksum(_)))
    }
}

impl From<Vec<KeyPart>> for ClumpKey {
    fn from(parts: Vec<KeyPart>) -> Self {
        Self(parts)
    }
}

impl fmt::Display for ClumpKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, part) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" / ")?;
            }
            write!(f, "{}", part)?;
        }
        Ok(())
    }
}

/// Mapping from composite key to the set of files sharing it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Clumps {
    groups: BTreeMap<ClumpKey, BTreeSet<FileRecord>>,
}

impl Clumps {
    /// Create an empty mapping.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `record` to the clump at `key`. Re-inserting a member is a no-op.
    pub fn insert(&mut self, key: ClumpKey, record: FileRecord) {
        self.groups.entry(key).or_default().insert(record);
    }

    /// Add every record in `members` to the clump at `key`.
    pub fn extend(&mut self, key: ClumpKey, members: impl IntoIterator<Item = FileRecord>) {
        self.groups.entry(key).or_default().extend(members);
    }

    /// Members of the clump at `key`.
    #[must_use]
    pub fn get(&self, key: &ClumpKey) -> Option<&BTreeSet<FileRecord>> {
        self.groups.get(key)
    }

    /// Number of clumps.
    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Check if there are no clumps.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Total number of files across all clumps.
    #[must_use]
    pub fn file_count(&self) -> usize {
        self.groups.values().map(BTreeSet::len).sum()
    }

    /// Iterate over all clumps in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&ClumpKey, &BTreeSet<FileRecord>)> {
        self.groups.iter()
    }

    /// Iterate over clumps with two or more members.
    pub fn duplicates(&self) -> impl Iterator<Item = (&ClumpKey, &BTreeSet<FileRecord>)> {
        self.groups.iter().filter(|(_, members)| members.len() > 1)
    }
}

impl IntoIterator for Clumps {
    type Item = (ClumpKey, BTreeSet<FileRecord>);
    type IntoIter = std::collections::btree_map::IntoIter<ClumpKey, BTreeSet<FileRecord>>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.into_iter()
    }
}

impl FromIterator<(ClumpKey, FileRecord)> for Clumps {
    fn from_iter<I: IntoIterator<Item = (ClumpKey, FileRecord)>>(iter: I) -> Self {
        let mut clumps = Self::new();
        for (key, record) in iter {
            clumps.insert(key, record);
        }
        clumps
    }
}

/// Result of running one clumping stage.
#[derive(Debug, Default)]
pub struct ClumpOutcome {
    /// The refined clumps
    pub clumps: Clumps,
    /// Files that could not be keyed at this stage
    pub errors: Vec<ClassificationError>,
}

/// A single classification rule in the clumping chain.
pub trait Clumper {
    /// Short stage name used in log messages.
    fn name(&self) -> &'static str;

    /// Compute this stage's key part for one file.
    ///
    /// # Errors
    ///
    /// Returns a [`ClassificationError`] if the file cannot be keyed.
    fn make_key(&self, record: &FileRecord) -> Result<KeyPart, ClassificationError>;

    /// Refine every clump in `clumps` by this stage's key.
    ///
    /// Singleton clumps are carried over untouched. Files that fail
    /// classification are logged, collected in the outcome, and left out.
    fn dump(&self, clumps: Clumps) -> ClumpOutcome {
        let mut outcome = ClumpOutcome::default();

        for (key, members) in clumps {
            if members.len() < 2 {
                log::debug!(
                    "{}: skipping non duplicate key {} ({})",
                    self.name(),
                    key,
                    member_names(&members)
                );
                outcome.clumps.extend(key, members);
                continue;
            }

            log::info!("{}: investigating key {}", self.name(), key);
            for record in members {
                match self.make_key(&record) {
                    Ok(part) => {
                        log::debug!("{}: {} -> {}", self.name(), record.name, part);
                        outcome.clumps.insert(key.with(part), record);
                    }
                    Err(err) => {
                        log::error!("{}: {}", self.name(), err);
                        outcome.errors.push(err);
                    }
                }
            }
        }

        outcome
    }
}

/// Comma separated member names for log output.
pub(crate) fn member_names(members: &BTreeSet<FileRecord>) -> String {
    members
        .iter()
        .map(|r| r.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
