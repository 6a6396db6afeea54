//! Sifting: choosing which member of a duplicate group to keep.
//!
//! A [`Sifter`] receives a clump already confirmed by checksum (two or more
//! byte-identical files) and returns a [`Selection`]: one file to keep and
//! the set to discard.
//!
//! - [`ShortestSifter`]: shortest name wins, ties broken lexicographically
//! - [`ModificationSifter`]: oldest modification time wins
//! - [`InteractiveSifter`]: asks the user, offering another sifter's choice
//!   as the default

pub mod interactive;
pub mod modification;
pub mod shortest;

use std::collections::BTreeSet;

use crate::options::Options;
use crate::scanner::FileRecord;

pub use interactive::{InteractiveSifter, PromptReply, Prompter, ScriptedPrompter, TerminalPrompter};
pub use modification::ModificationSifter;
pub use shortest::ShortestSifter;

/// The outcome of sifting one duplicate group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    /// File to preserve
    pub keep: FileRecord,
    /// Files to remove
    pub discard: BTreeSet<FileRecord>,
}

impl Selection {
    /// Keep `keep` and discard every other member of `members`.
    #[must_use]
    pub fn keeping(keep: FileRecord, members: &BTreeSet<FileRecord>) -> Self {
        let discard = members.iter().filter(|m| **m != keep).cloned().collect();
        Self { keep, discard }
    }
}

/// Picks the file to keep from a confirmed duplicate group.
pub trait Sifter {
    /// Select a file to keep from `members`.
    ///
    /// Returns `None` only for an empty group.
    fn sift(&mut self, members: &BTreeSet<FileRecord>) -> Option<Selection>;
}

impl<S: Sifter + ?Sized> Sifter for Box<S> {
    fn sift(&mut self, members: &BTreeSet<FileRecord>) -> Option<Selection> {
        (**self).sift(members)
    }
}

/// The non-interactive sifter selected by `options`.
#[must_use]
pub fn base_sifter(options: &Options) -> Box<dyn Sifter> {
    if options.keep_oldest {
        Box::new(ModificationSifter)
    } else {
        Box::new(ShortestSifter)
    }
}

/// The sifter selected by `options`, prompting on the terminal when
/// interactive mode is on.
#[must_use]
pub fn sifter_for(options: &Options) -> Box<dyn Sifter> {
    let base = base_sifter(options);
    if options.interactive {
        Box::new(InteractiveSifter::new(base, TerminalPrompter::new()))
    } else {
        base
    }
}
