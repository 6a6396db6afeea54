//! Keep the file with the shortest name.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use super::{Selection, Sifter};
use crate::scanner::FileRecord;

/// Keeps the file whose name has the fewest characters.
///
/// Equal lengths fall back to the lexicographically smaller name, so
/// `file.txt` beats `file (1).txt` and `file (1).txt` beats `file (2).txt`.
/// Beware that `f.txt` also beats `file.txt`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShortestSifter;

impl ShortestSifter {
    /// Order two records by preference: `Less` means `a` is kept.
    #[must_use]
    pub fn compare(a: &FileRecord, b: &FileRecord) -> Ordering {
        a.name
            .chars()
            .count()
            .cmp(&b.name.chars().count())
            .then_with(|| a.name.cmp(&b.name))
            .then_with(|| a.path.cmp(&b.path))
    }

    /// The preferred of two records.
    #[must_use]
    pub fn pick<'a>(a: &'a FileRecord, b: &'a FileRecord) -> &'a FileRecord {
        log::trace!("Finding the shortest of {} and {}", a.name, b.name);
        if Self::compare(a, b) == Ordering::Greater {
            b
        } else {
            a
        }
    }
}

impl Sifter for ShortestSifter {
    fn sift(&mut self, members: &BTreeSet<FileRecord>) -> Option<Selection> {
        let keep = members.iter().reduce(Self::pick)?.clone();
        Some(Selection::keeping(keep, members))
    }
}
