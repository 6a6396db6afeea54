//! The finalized, immutable options record handed to the pipeline.
//!
//! [`Options`] is produced once per invocation (see [`crate::config`]) and
//! passed by reference through every stage. [`Options::validate`] rejects
//! contradictory combinations before any file is touched.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::clumping::{RegexClumper, DEFAULT_PATTERN};
use crate::scanner::{HashAlgorithm, UnknownHashAlgorithm};

/// Fatal errors detected before the scan begins.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    /// A custom pattern was supplied together with checksum-only mode.
    #[error("pattern set while skipping regex checking")]
    PatternWithSkipRegex,

    /// The filename pattern does not compile.
    #[error("invalid regular expression '{pattern}': {source}")]
    InvalidPattern {
        /// The rejected pattern
        pattern: String,
        /// Compiler error
        #[source]
        source: regex::Error,
    },

    /// A key group index is 0 or larger than the pattern's group count.
    #[error("key group {group} does not exist; the pattern has {available} capture group(s)")]
    InvalidKeyGroup {
        /// Requested group
        group: usize,
        /// Number of capture groups in the pattern
        available: usize,
    },

    /// The digest name is not supported.
    #[error(transparent)]
    UnknownHashAlgorithm(#[from] UnknownHashAlgorithm),

    /// The root path does not exist.
    #[error("path not found: {0}")]
    RootNotFound(PathBuf),

    /// The root path is not a directory.
    #[error("path was not a directory: {0}")]
    NotADirectory(PathBuf),

    /// The configuration file or environment could not be read.
    #[error("failed to load configuration: {0}")]
    Load(#[from] Box<figment::Error>),
}

/// Immutable run options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Options {
    /// Digest used by the checksum stage
    pub hash_algorithm: HashAlgorithm,
    /// Descend into subdirectories (each is its own clump domain)
    pub recursive: bool,
    /// Report intended actions without touching the filesystem
    pub dry_run: bool,
    /// Ask which file to keep for every duplicate group
    pub interactive: bool,
    /// Prefer the oldest file instead of the shortest name
    pub keep_oldest: bool,
    /// Recreate a hard link to the kept file after each deletion
    pub make_links: bool,
    /// Allow deleting a file that is a hard link of the kept file
    pub remove_links: bool,
    /// Custom filename pattern; `None` means [`DEFAULT_PATTERN`]
    pub regex_pattern: Option<String>,
    /// Capture groups forming the name key; `None` picks them from the pattern
    pub key_groups: Option<Vec<usize>>,
    /// Skip the filename stage and group by checksum alone
    pub skip_regex: bool,
}

impl Options {
    /// The filename pattern in effect.
    #[must_use]
    pub fn pattern(&self) -> &str {
        self.regex_pattern.as_deref().unwrap_or(DEFAULT_PATTERN)
    }

    /// Build the filename clumper for these options.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigurationError`] for a bad pattern or key group.
    pub fn regex_clumper(&self) -> Result<RegexClumper, ConfigurationError> {
        RegexClumper::new(self.pattern(), self.key_groups.as_deref())
    }

    /// Reject contradictory option combinations.
    ///
    /// # Errors
    ///
    /// - `PatternWithSkipRegex` if a custom pattern or key groups are set
    ///   while the filename stage is skipped
    /// - `InvalidPattern` / `InvalidKeyGroup` for a pattern that cannot be used
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        let custom_pattern = self
            .regex_pattern
            .as_deref()
            .is_some_and(|p| p != DEFAULT_PATTERN);

        if self.skip_regex {
            if custom_pattern || self.key_groups.is_some() {
                return Err(ConfigurationError::PatternWithSkipRegex);
            }
            return Ok(());
        }

        self.regex_clumper().map(|_| ())
    }

    /// Check that `root` is an existing directory.
    ///
    /// # Errors
    ///
    /// Returns `RootNotFound` or `NotADirectory`.
    pub fn validate_root(root: &Path) -> Result<(), ConfigurationError> {
        if !root.exists() {
            return Err(ConfigurationError::RootNotFound(root.to_path_buf()));
        }
        if !root.is_dir() {
            return Err(ConfigurationError::NotADirectory(root.to_path_buf()));
        }
        Ok(())
    }
}
