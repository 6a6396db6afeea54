//! Keep the file that was modified longest ago.

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fs;
use std::time::SystemTime;

use super::{Selection, ShortestSifter, Sifter};
use crate::scanner::FileRecord;

/// Keeps the oldest file by modification time.
///
/// Equal timestamps, and files whose metadata cannot be read, fall back to
/// the [`ShortestSifter`] ordering so the choice stays deterministic.
#[derive(Debug, Clone, Copy, Default)]
pub struct ModificationSifter;

impl ModificationSifter {
    fn modified(record: &FileRecord) -> Option<SystemTime> {
        match fs::metadata(&record.path).and_then(|m| m.modified()) {
            Ok(time) => Some(time),
            Err(e) => {
                log::warn!(
                    "Cannot read modification time of {}: {}",
                    record.path.display(),
                    e
                );
                None
            }
        }
    }
}

impl Sifter for ModificationSifter {
    fn sift(&mut self, members: &BTreeSet<FileRecord>) -> Option<Selection> {
        let keep = members
            .iter()
            .map(|record| (Self::modified(record), record))
            .reduce(|a, b| {
                log::trace!("Finding the oldest of {} and {}", a.1.name, b.1.name);
                let by_time = match (a.0, b.0) {
                    (Some(ta), Some(tb)) => ta.cmp(&tb),
                    _ => Ordering::Equal,
                };
                match by_time.then_with(|| ShortestSifter::compare(a.1, b.1)) {
                    Ordering::Greater => b,
                    _ => a,
                }
            })?
            .1
            .clone();
        Some(Selection::keeping(keep, members))
    }
}
