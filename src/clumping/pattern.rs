//! Filename pattern clumping.
//!
//! The default pattern splits a download-manager style name such as
//! `file (1).txt` into stem `file`, counter ` (1)` and extension `.txt`, and
//! keys on stem + extension. `file.txt` and `file (1).txt` therefore share a
//! clump, while `file.txt~` does not.
//!
//! Patterns are matched from the first character of the filename. A pattern
//! without a trailing `$` may leave a suffix unmatched.

use regex::Regex;

use super::{ClassificationError, Clumper, KeyPart};
use crate::options::ConfigurationError;
use crate::scanner::FileRecord;

/// Default filename pattern: stem, repeated ` (N)` counters, extension.
pub const DEFAULT_PATTERN: &str = r"(^.+?)( \((\d)\))*(\..+)$";

/// Capture groups of [`DEFAULT_PATTERN`] that form the key.
pub const DEFAULT_KEY_GROUPS: [usize; 2] = [1, 4];

/// Groups files whose selected capture groups are identical.
#[derive(Debug, Clone)]
pub struct RegexClumper {
    pattern: String,
    regex: Regex,
    key_groups: Vec<usize>,
}

impl RegexClumper {
    /// Compile `pattern` and choose the key groups.
    ///
    /// With `key_groups` unset, the default pattern keys on groups 1 and 4
    /// and any other pattern keys on all of its capture groups.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::InvalidPattern`] if the pattern does not
    /// compile, or [`ConfigurationError::InvalidKeyGroup`] if a requested
    /// group is 0 or does not exist in the pattern.
    pub fn new(pattern: &str, key_groups: Option<&[usize]>) -> Result<Self, ConfigurationError> {
        let regex = Regex::new(&format!("^(?:{})", pattern)).map_err(|source| {
            ConfigurationError::InvalidPattern {
                pattern: pattern.to_string(),
                source,
            }
        })?;

        // captures_len counts the implicit whole-match group 0
        let available = regex.captures_len() - 1;
        let key_groups = match key_groups {
            Some(groups) => groups.to_vec(),
            None if pattern == DEFAULT_PATTERN => DEFAULT_KEY_GROUPS.to_vec(),
            None => (1..=available).collect(),
        };

        // Group 0 is the whole match and would keep counters in the key
        if let Some(&group) = key_groups.iter().find(|&&g| g == 0 || g > available) {
            return Err(ConfigurationError::InvalidKeyGroup { group, available });
        }

        Ok(Self {
            pattern: pattern.to_string(),
            regex,
            key_groups,
        })
    }

    /// The pattern as supplied, without the start anchor.
    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Capture groups that form the key.
    #[must_use]
    pub fn key_groups(&self) -> &[usize] {
        &self.key_groups
    }

    /// The key for a bare filename, or `None` if it does not match.
    #[must_use]
    pub fn key_for_name(&self, name: &str) -> Option<String> {
        let captures = self.regex.captures(name)?;
        log::trace!("Regex groups for {}: {:?}", name, captures);
        Some(
            self.key_groups
                .iter()
                .filter_map(|&g| captures.get(g))
                .map(|m| m.as_str())
                .collect(),
        )
    }
}

impl Clumper for RegexClumper {
    fn name(&self) -> &'static str {
        "regex"
    }

    fn make_key(&self, record: &FileRecord) -> Result<KeyPart, ClassificationError> {
        self.key_for_name(&record.name)
            .map(KeyPart::Name)
            .ok_or_else(|| ClassificationError::NoMatch {
                path: record.path.clone(),
                pattern: self.pattern.clone(),
            })
    }
}
