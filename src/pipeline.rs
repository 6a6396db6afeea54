//! The end-to-end trimming run.
//!
//! [`Trimmer`] wires the stages together:
//!
//! 1. [`PathClumper`] groups the root's files by directory
//! 2. [`RegexClumper`] refines by filename key, unless checksum-only
//! 3. [`HashClumper`] refines by content checksum
//! 4. every checksummed clump with two or more members is sifted and the
//!    [`Remover`] applies the selection
//!
//! Per-file failures at any stage are collected in the [`RunSummary`]; only
//! configuration problems detected in [`Trimmer::new`] stop a run.

use std::path::{Path, PathBuf};

use crate::actions::{RemovalError, RemovalReport, Remover};
use crate::clumping::{
    member_names, ClassificationError, Clumper, HashClumper, PathClumper, RegexClumper,
};
use crate::events::{Event, EventSink};
use crate::options::{ConfigurationError, Options};
use crate::sifting::{sifter_for, Sifter};

/// Totals for one run.
#[derive(Debug, Default)]
pub struct RunSummary {
    /// Whether this was a dry run
    pub dry_run: bool,
    /// Regular files found under the root
    pub files_scanned: usize,
    /// Confirmed duplicate groups handed to the sifter
    pub duplicate_groups: usize,
    /// Files deleted
    pub removed: usize,
    /// Files that would have been deleted in a dry run
    pub would_remove: usize,
    /// Discards left alone because they are hard links of the kept file
    pub skipped_links: usize,
    /// Hard links created in place of deleted files
    pub links_created: usize,
    /// Discards that had already disappeared
    pub already_absent: usize,
    /// Files excluded because they could not be classified
    pub classification_errors: Vec<ClassificationError>,
    /// Files whose removal or relinking failed
    pub removal_errors: Vec<RemovalError>,
}

impl RunSummary {
    /// Number of files that could not be read, enumerated or removed.
    ///
    /// Names that merely do not match the pattern are not counted.
    #[must_use]
    pub fn failure_count(&self) -> usize {
        self.classification_errors
            .iter()
            .filter(|e| e.is_failure())
            .count()
            + self.removal_errors.len()
    }

    /// Check if any file could not be read, enumerated or removed.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.failure_count() > 0
    }

    fn unmatched_count(&self) -> usize {
        self.classification_errors
            .iter()
            .filter(|e| !e.is_failure())
            .count()
    }

    fn absorb(&mut self, report: RemovalReport) {
        self.removed += report.removed;
        self.would_remove += report.would_remove;
        self.skipped_links += report.skipped_links;
        self.links_created += report.links_created;
        self.already_absent += report.already_absent;
        self.removal_errors.extend(report.failures);
    }

    /// Human-readable one-line summary.
    #[must_use]
    pub fn summary(&self) -> String {
        let mut line = format!(
            "Scanned {} file(s), found {} duplicate group(s), ",
            self.files_scanned, self.duplicate_groups
        );
        if self.dry_run {
            line.push_str(&format!("{} would be deleted", self.would_remove));
        } else {
            line.push_str(&format!("deleted {}", self.removed));
        }
        if self.links_created > 0 {
            line.push_str(&format!(", relinked {}", self.links_created));
        }
        if self.skipped_links > 0 {
            line.push_str(&format!(", skipped {} hard link(s)", self.skipped_links));
        }
        let unmatched = self.unmatched_count();
        if unmatched > 0 {
            line.push_str(&format!(", {} unmatched name(s)", unmatched));
        }
        if self.has_errors() {
            line.push_str(&format!(", {} error(s)", self.failure_count()));
        }
        line
    }
}

/// Runs the clump, sift, remove pipeline over one root directory.
pub struct Trimmer<'a> {
    root: PathBuf,
    options: &'a Options,
    sink: &'a dyn EventSink,
    regex: Option<RegexClumper>,
    hash: HashClumper,
    sifter: Box<dyn Sifter>,
}

impl<'a> Trimmer<'a> {
    /// Validate `options` and `root` and prepare the stages.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigurationError`] for contradictory options, an unusable
    /// pattern, or a root that is not an existing directory.
    pub fn new(
        root: &Path,
        options: &'a Options,
        sink: &'a dyn EventSink,
    ) -> Result<Self, ConfigurationError> {
        options.validate()?;
        Options::validate_root(root)?;

        let regex = if options.skip_regex {
            None
        } else {
            Some(options.regex_clumper()?)
        };

        Ok(Self {
            root: root.to_path_buf(),
            options,
            sink,
            regex,
            hash: HashClumper::new(options.hash_algorithm),
            sifter: sifter_for(options),
        })
    }

    /// Replace the sifter chosen from the options.
    #[must_use]
    pub fn with_sifter(mut self, sifter: Box<dyn Sifter>) -> Self {
        self.sifter = sifter;
        self
    }

    /// Run the pipeline once.
    pub fn run(&mut self) -> RunSummary {
        let mut summary = RunSummary {
            dry_run: self.options.dry_run,
            ..RunSummary::default()
        };

        let scanned = PathClumper::new(&self.root, self.options.recursive).scan();
        summary.files_scanned = scanned.clumps.file_count();
        self.record_failures(scanned.errors, &mut summary);
        let mut clumps = scanned.clumps;

        if let Some(regex) = &self.regex {
            let named = regex.dump(clumps);
            self.record_failures(named.errors, &mut summary);
            clumps = named.clumps;
        }

        let hashed = self.hash.dump(clumps);
        self.record_failures(hashed.errors, &mut summary);

        let remover = Remover::new(self.options, self.sink);
        for (key, members) in hashed.clumps.duplicates() {
            if !key.is_checksummed() {
                continue;
            }
            summary.duplicate_groups += 1;
            log::info!("Duplicates {}: {}", key, member_names(members));

            if let Some(selection) = self.sifter.sift(members) {
                let report = remover.remove(&selection);
                if !report.all_succeeded() {
                    log::warn!(
                        "{} file(s) of {} could not be processed",
                        report.failures.len(),
                        key
                    );
                }
                summary.absorb(report);
            }
        }

        log::info!("{}", summary.summary());
        summary
    }

    fn record_failures(&self, errors: Vec<ClassificationError>, summary: &mut RunSummary) {
        for err in errors {
            self.sink.emit(&Event::ClassificationFailed {
                path: err.path().to_path_buf(),
                reason: err.to_string(),
            });
            summary.classification_errors.push(err);
        }
    }
}
