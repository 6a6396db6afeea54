//! Reportable events and the sinks that consume them.
//!
//! The pipeline never prints. Everything a user or a log file should see is
//! emitted as an [`Event`] to an [`EventSink`]. Sinks are independent:
//! [`Fanout`] forwards each event to every subscriber.
//!
//! # Sinks
//!
//! - [`ConsoleSink`]: one human-readable line per event on stdout
//! - [`JsonLinesSink`]: one JSON object per event, filtered by level
//! - [`MemorySink`]: records events in memory, for tests and embedding

use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use log::{Level, LevelFilter};
use serde::Serialize;
use yansi::Paint;

/// Something the pipeline did, or would have done.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Event {
    /// The file kept as the only copy of its group.
    Kept {
        /// Kept path
        path: PathBuf,
    },
    /// Dry run: the file would have been deleted.
    WouldDelete {
        /// Discard path
        path: PathBuf,
    },
    /// The file was deleted.
    Deleted {
        /// Discard path
        path: PathBuf,
    },
    /// The file is a hard link of the kept file and was left alone.
    HardlinkSkipped {
        /// Discard path
        path: PathBuf,
        /// Whether this was a dry run
        dry_run: bool,
    },
    /// A hard link to the kept file was created at a deleted path.
    LinkCreated {
        /// Former discard path, now a link
        path: PathBuf,
        /// Kept file the link points at
        target: PathBuf,
    },
    /// A file could not be classified and was excluded.
    ClassificationFailed {
        /// Excluded path
        path: PathBuf,
        /// Error description
        reason: String,
    },
    /// Deleting or relinking a file failed.
    RemovalFailed {
        /// Discard path
        path: PathBuf,
        /// Error description
        reason: String,
    },
}

impl Event {
    /// Severity of the event.
    #[must_use]
    pub fn level(&self) -> Level {
        match self {
            Self::Kept { .. } | Self::WouldDelete { .. } | Self::Deleted { .. } => Level::Info,
            Self::LinkCreated { .. } | Self::HardlinkSkipped { .. } => Level::Info,
            Self::ClassificationFailed { .. } | Self::RemovalFailed { .. } => Level::Error,
        }
    }

    /// The path the event is about.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::Kept { path }
            | Self::WouldDelete { path }
            | Self::Deleted { path }
            | Self::HardlinkSkipped { path, .. }
            | Self::LinkCreated { path, .. }
            | Self::ClassificationFailed { path, .. }
            | Self::RemovalFailed { path, .. } => path,
        }
    }

    /// Plain-text description, as printed by [`ConsoleSink`] without color.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Kept { path } => format!("{} was kept as only copy", path.display()),
            Self::WouldDelete { path } => format!("{} would have been deleted", path.display()),
            Self::Deleted { path } => format!("{} was deleted", path.display()),
            Self::HardlinkSkipped { path, dry_run: true } => {
                format!("{} hard link would have been skipped", path.display())
            }
            Self::HardlinkSkipped { path, dry_run: false } => {
                format!("{} hard link was skipped", path.display())
            }
            Self::LinkCreated { path, target } => format!(
                "{} was replaced by a hard link to {}",
                path.display(),
                target.display()
            ),
            Self::ClassificationFailed { path, reason } => {
                format!("{} was excluded: {}", path.display(), reason)
            }
            Self::RemovalFailed { path, reason } => {
                format!("{} could not be removed: {}", path.display(), reason)
            }
        }
    }
}

/// A subscriber to pipeline events.
pub trait EventSink {
    /// Receive one event.
    fn emit(&self, event: &Event);
}

/// Forwards every event to each subscriber in order.
#[derive(Default)]
pub struct Fanout {
    sinks: Vec<Box<dyn EventSink>>,
}

impl Fanout {
    /// Create a fanout with no subscribers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a subscriber.
    #[must_use]
    pub fn with(mut self, sink: Box<dyn EventSink>) -> Self {
        self.sinks.push(sink);
        self
    }

    /// Number of subscribers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    /// Check if there are no subscribers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

impl EventSink for Fanout {
    fn emit(&self, event: &Event) {
        for sink in &self.sinks {
            sink.emit(event);
        }
    }
}

/// Prints one line per event to stdout.
///
/// Classification failures are left to the diagnostic log, which already
/// reports them at error level.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleSink {
    quiet: bool,
}

impl ConsoleSink {
    /// Create a console sink. In quiet mode only failures are printed.
    #[must_use]
    pub fn new(quiet: bool) -> Self {
        Self { quiet }
    }
}

impl EventSink for ConsoleSink {
    fn emit(&self, event: &Event) {
        let line = event.describe();
        let painted = match event {
            Event::ClassificationFailed { .. } => return,
            Event::RemovalFailed { .. } => line.red().to_string(),
            _ if self.quiet => return,
            Event::Deleted { .. } => line.yellow().to_string(),
            Event::WouldDelete { .. } => line.cyan().to_string(),
            Event::Kept { .. } => line.green().to_string(),
            _ => line,
        };
        println!("{}", painted);
    }
}

/// A structured log line as written by [`JsonLinesSink`].
#[derive(Debug, Serialize)]
struct LogLine<'a> {
    timestamp: String,
    level: &'static str,
    message: String,
    #[serde(flatten)]
    event: &'a Event,
}

/// Writes one JSON object per event to a file or other writer.
pub struct JsonLinesSink {
    writer: Mutex<Box<dyn Write + Send>>,
    level: LevelFilter,
}

impl JsonLinesSink {
    /// Wrap an arbitrary writer. Events above `level` are dropped.
    #[must_use]
    pub fn new(writer: Box<dyn Write + Send>, level: LevelFilter) -> Self {
        Self {
            writer: Mutex::new(writer),
            level,
        }
    }

    /// Append to the log file at `path`, creating it if needed.
    ///
    /// # Errors
    ///
    /// Returns the I/O error if the file cannot be opened for writing.
    pub fn create(path: &Path, level: LevelFilter) -> io::Result<Self> {
        let file = File::options().create(true).append(true).open(path)?;
        Ok(Self::new(Box::new(io::LineWriter::new(file)), level))
    }
}

impl EventSink for JsonLinesSink {
    fn emit(&self, event: &Event) {
        let level = event.level();
        if level > self.level {
            return;
        }

        let line = LogLine {
            timestamp: chrono::Local::now().to_rfc3339(),
            level: level.as_str(),
            message: event.describe(),
            event,
        };

        let Ok(mut writer) = self.writer.lock() else {
            return;
        };
        let written = serde_json::to_writer(&mut *writer, &line)
            .map_err(io::Error::from)
            .and_then(|()| writer.write_all(b"\n"));
        if let Err(e) = written {
            log::warn!("Failed to write log file entry: {}", e);
        }
    }
}

/// Records events in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    events: Mutex<Vec<Event>>,
}

impl MemorySink {
    /// Create an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A snapshot of the recorded events.
    #[must_use]
    pub fn events(&self) -> Vec<Event> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    /// Paths of recorded events matching `filter`.
    #[must_use]
    pub fn paths_where(&self, filter: impl Fn(&Event) -> bool) -> Vec<PathBuf> {
        self.events()
            .iter()
            .filter(|e| filter(e))
            .map(|e| e.path().to_path_buf())
            .collect()
    }
}

impl EventSink for MemorySink {
    fn emit(&self, event: &Event) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }
    }
}

impl<S: EventSink + ?Sized> EventSink for &S {
    fn emit(&self, event: &Event) {
        (**self).emit(event);
    }
}
