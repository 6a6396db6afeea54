//! Deletion and hard-link substitution of discarded duplicates.
//!
//! # Overview
//!
//! [`Remover`] takes a [`Selection`] and processes every discard file on its
//! own, in order:
//!
//! 1. A discard that is a hard link of the kept file is skipped unless
//!    `remove_links` is set; deleting it would free nothing. With
//!    `make_links` also set it is skipped too, since relinking would only
//!    recreate the same entry.
//! 2. In a dry run the intended deletion is reported and nothing is touched.
//! 3. Otherwise the file is deleted, then replaced by a hard link to the
//!    kept file when `make_links` is set.
//!
//! A failure on one file is recorded in the [`RemovalReport`] and the next
//! file is processed. A discard that has already disappeared counts as
//! resolved, so re-running over a partially processed tree is safe.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::events::{Event, EventSink};
use crate::options::Options;
use crate::scanner::hardlink::same_file;
use crate::scanner::FileRecord;
use crate::sifting::Selection;

/// Error type for removal operations.
#[derive(Debug, Error)]
pub enum RemovalError {
    /// The hard-link comparison with the kept file failed.
    #[error("cannot compare {path} with the kept file: {source}")]
    Inspect {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Deleting the file failed.
    #[error("cannot delete {path}: {source}")]
    Remove {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The file was deleted but the replacement hard link failed.
    #[error("cannot link {path} to {target}: {source}")]
    Link {
        path: PathBuf,
        target: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl RemovalError {
    /// Get the discard path associated with this error.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::Inspect { path, .. } | Self::Remove { path, .. } | Self::Link { path, .. } => {
                path
            }
        }
    }
}

/// Outcome of processing one or more selections.
#[derive(Debug, Default)]
pub struct RemovalReport {
    /// Files deleted
    pub removed: usize,
    /// Files that would have been deleted in a dry run
    pub would_remove: usize,
    /// Discards left alone because they are hard links of the kept file
    pub skipped_links: usize,
    /// Hard links created in place of deleted files
    pub links_created: usize,
    /// Discards that no longer existed
    pub already_absent: usize,
    /// Per-file failures
    pub failures: Vec<RemovalError>,
}

impl RemovalReport {
    /// Check if every file was processed without error.
    #[must_use]
    pub fn all_succeeded(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Applies selections to the filesystem.
pub struct Remover<'a> {
    options: &'a Options,
    sink: &'a dyn EventSink,
}

impl<'a> Remover<'a> {
    /// Create a remover honoring the dry-run and link flags of `options`.
    pub fn new(options: &'a Options, sink: &'a dyn EventSink) -> Self {
        Self { options, sink }
    }

    /// Process every discard file of `selection`.
    pub fn remove(&self, selection: &Selection) -> RemovalReport {
        let mut report = RemovalReport::default();
        let keep = &selection.keep;

        self.sink.emit(&Event::Kept {
            path: keep.path.clone(),
        });

        for discard in &selection.discard {
            if let Err(err) = self.remove_one(keep, discard, &mut report) {
                log::error!("{}", err);
                self.sink.emit(&Event::RemovalFailed {
                    path: err.path().to_path_buf(),
                    reason: err.to_string(),
                });
                report.failures.push(err);
            }
        }

        report
    }

    fn remove_one(
        &self,
        keep: &FileRecord,
        discard: &FileRecord,
        report: &mut RemovalReport,
    ) -> Result<(), RemovalError> {
        let path = &discard.path;

        if !self.options.remove_links || self.options.make_links {
            match same_file(&keep.path, path) {
                Ok(true) if self.options.remove_links => {
                    log::info!("{} is already linked to {}", path.display(), keep.name);
                    self.sink.emit(&Event::HardlinkSkipped {
                        path: path.clone(),
                        dry_run: self.options.dry_run,
                    });
                    report.skipped_links += 1;
                    return Ok(());
                }
                Ok(true) => {
                    log::warn!("{} is a hard link of {}, skipping", path.display(), keep.name);
                    self.sink.emit(&Event::HardlinkSkipped {
                        path: path.clone(),
                        dry_run: self.options.dry_run,
                    });
                    report.skipped_links += 1;
                    return Ok(());
                }
                Ok(false) => {}
                Err(e) if e.kind() == io::ErrorKind::NotFound && !path.exists() => {
                    self.note_absent(path, report);
                    return Ok(());
                }
                Err(source) => {
                    return Err(RemovalError::Inspect {
                        path: path.clone(),
                        source,
                    })
                }
            }
        }

        if self.options.dry_run {
            self.sink.emit(&Event::WouldDelete { path: path.clone() });
            report.would_remove += 1;
            return Ok(());
        }

        match fs::remove_file(path) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                self.note_absent(path, report);
                return Ok(());
            }
            Err(source) => {
                return Err(RemovalError::Remove {
                    path: path.clone(),
                    source,
                })
            }
        }
        log::debug!("Deleted {}", path.display());
        self.sink.emit(&Event::Deleted { path: path.clone() });
        report.removed += 1;

        if self.options.make_links {
            fs::hard_link(&keep.path, path).map_err(|source| RemovalError::Link {
                path: path.clone(),
                target: keep.path.clone(),
                source,
            })?;
            log::debug!("Linked {} to {}", path.display(), keep.path.display());
            self.sink.emit(&Event::LinkCreated {
                path: path.clone(),
                target: keep.path.clone(),
            });
            report.links_created += 1;
        }

        Ok(())
    }

    fn note_absent(&self, path: &Path, report: &mut RemovalReport) {
        log::info!("{} is already gone", path.display());
        report.already_absent += 1;
    }
}
