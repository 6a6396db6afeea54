//! File actions module.
//!
//! This module applies sifting decisions to the filesystem:
//! - Deletion of discarded duplicates
//! - Optional hard-link substitution in place of deleted files
//! - Dry-run reporting
//!
//! ```no_run
//! use twintrim::actions::Remover;
//! use twintrim::events::ConsoleSink;
//! use twintrim::options::Options;
//! # fn demo(selection: &twintrim::sifting::Selection) {
//! let options = Options { dry_run: true, ..Options::default() };
//! let sink = ConsoleSink::new(false);
//! let report = Remover::new(&options, &sink).remove(selection);
//! println!("{} file(s) would be deleted", report.would_remove);
//! # }
//! ```

pub mod remove;

pub use remove::{RemovalError, RemovalReport, Remover};
