//! Command-line interface definitions for twintrim.
//!
//! This module defines all CLI arguments using the clap derive API.
//!
//! # Example
//!
//! ```bash
//! # See what would be removed from ~/Downloads
//! twintrim -n ~/Downloads
//!
//! # Remove duplicates recursively, asking which copy to keep
//! twintrim -r -i ~/Downloads
//!
//! # Group by content only, ignoring names
//! twintrim --only-checksum --hash-function sha256 ~/Pictures
//!
//! # Custom naming scheme: file__1.txt, file__2.txt
//! twintrim -p '(.+?)(?:__\d)*\..*' ~/exports
//! ```

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use log::LevelFilter;

use crate::scanner::{HashAlgorithm, UnknownHashAlgorithm};

/// Remove duplicate files.
///
/// twintrim looks for files in the same directory whose names differ only
/// by a copy counter such as ` (1)` and whose content is identical, and
/// removes all but one copy.
#[derive(Debug, Parser)]
#[command(name = "twintrim")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory to search for duplicates
    #[arg(value_name = "PATH")]
    pub path: PathBuf,

    /// Do not delete anything; report what would be done
    #[arg(short = 'n', long)]
    pub no_action: bool,

    /// Search subdirectories too (each directory is trimmed on its own)
    #[arg(short, long)]
    pub recursive: bool,

    /// Regular expression used to derive the name key
    ///
    /// Matched from the start of the filename. The default pattern keys on
    /// the stem and extension around a ` (N)` counter.
    #[arg(short, long, value_name = "REGEX", conflicts_with = "only_checksum")]
    pub pattern: Option<String>,

    /// Capture group of --pattern that forms part of the key (repeatable)
    ///
    /// Defaults to every capture group of a custom pattern.
    #[arg(long = "key-group", value_name = "N", requires = "pattern")]
    pub key_groups: Vec<usize>,

    /// Skip name matching and group files by checksum alone
    #[arg(short = 'c', long)]
    pub only_checksum: bool,

    /// Ask which file to keep for every duplicate group
    #[arg(short, long)]
    pub interactive: bool,

    /// Keep the oldest file instead of the one with the shortest name
    #[arg(long)]
    pub keep_oldest: bool,

    /// Digest used to compare file content
    #[arg(long, value_name = "NAME", value_parser = parse_hash_algorithm)]
    pub hash_function: Option<HashAlgorithm>,

    /// Replace each deleted file with a hard link to the kept file
    #[arg(long)]
    pub make_links: bool,

    /// Also delete files that are hard links of the kept file
    #[arg(long)]
    pub remove_links: bool,

    /// Increase verbosity level (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Append a JSON line for every action to this file
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Minimum level written to --log-file
    #[arg(long, value_enum, value_name = "LEVEL", requires = "log_file", default_value = "info")]
    pub log_level: LogLevelArg,

    /// Configuration file to use instead of the platform default
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, env = "NO_COLOR")]
    pub no_color: bool,

    /// Print fatal errors as JSON on stderr
    #[arg(long)]
    pub json_errors: bool,
}

/// Level threshold for the structured log file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogLevelArg {
    /// Failures only
    Error,
    /// Failures and warnings
    Warn,
    /// Every action
    #[default]
    Info,
    /// Everything
    Debug,
}

impl From<LogLevelArg> for LevelFilter {
    fn from(level: LogLevelArg) -> Self {
        match level {
            LogLevelArg::Error => LevelFilter::Error,
            LogLevelArg::Warn => LevelFilter::Warn,
            LogLevelArg::Info => LevelFilter::Info,
            LogLevelArg::Debug => LevelFilter::Debug,
        }
    }
}

/// Parse a digest name such as `md5`, `sha256` or `SHA-256`.
fn parse_hash_algorithm(s: &str) -> Result<HashAlgorithm, String> {
    s.parse().map_err(|e: UnknownHashAlgorithm| e.to_string())
}
