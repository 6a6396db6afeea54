//! twintrim - duplicate file remover
//!
//! Finds files in the same directory that share a name pattern and identical
//! content, keeps one copy per group and deletes (or hard-links) the rest.
//!
//! The work is split into a pipeline of stages:
//!
//! - [`clumping`]: group files by directory, name key and checksum
//! - [`sifting`]: choose the file to keep in each confirmed group
//! - [`actions`]: delete or relink the other members
//! - [`pipeline`]: run the stages over a root directory
//!
//! Everything the pipeline does is reported as an [`events::Event`].

pub mod actions;
pub mod cli;
pub mod clumping;
pub mod config;
pub mod error;
pub mod events;
pub mod logging;
pub mod options;
pub mod pipeline;
pub mod scanner;
pub mod sifting;
pub mod signal;

use std::io::IsTerminal;

use anyhow::{Context, Result};

use crate::cli::Cli;
use crate::config::Config;
use crate::error::ExitCode;
use crate::events::{ConsoleSink, Fanout, JsonLinesSink};
use crate::pipeline::Trimmer;

/// Run the application for parsed command-line arguments.
///
/// Configuration problems are returned as errors wrapping
/// [`options::ConfigurationError`]. A completed run returns
/// [`ExitCode::PartialSuccess`] if any file could not be read or removed.
/// Names that do not match the pattern are reported but do not affect the
/// exit code.
///
/// # Errors
///
/// Returns an error if the configuration is invalid or the log file cannot
/// be opened.
pub fn run_app(cli: Cli) -> Result<ExitCode> {
    logging::init_logging(cli.verbose, cli.quiet);

    if cli.no_color || !std::io::stdout().is_terminal() {
        yansi::disable();
    }

    let mut config = Config::load(cli.config.as_deref())?;
    config.merge_cli(&cli);
    let options = config.into_options()?;
    log::debug!("Running with {:?}", options);

    let mut sink = Fanout::new().with(Box::new(ConsoleSink::new(cli.quiet)));
    if let Some(path) = &cli.log_file {
        let file_sink = JsonLinesSink::create(path, cli.log_level.into())
            .with_context(|| format!("cannot open log file {}", path.display()))?;
        sink = sink.with(Box::new(file_sink));
    }

    let summary = Trimmer::new(&cli.path, &options, &sink)?.run();

    if !cli.quiet {
        println!("{}", summary.summary());
    }

    Ok(if summary.has_errors() {
        ExitCode::PartialSuccess
    } else {
        ExitCode::Success
    })
}
