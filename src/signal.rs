//! Ctrl+C handling.
//!
//! The only interruptible point of a run is the interactive prompt. While a
//! prompt is waiting the handler is *armed*: Ctrl+C sets a flag the prompt
//! polls, and the current duplicate group is left untouched. At any other
//! time Ctrl+C aborts the process with [`EXIT_CODE_INTERRUPTED`].
//!
//! The handler is installed lazily, the first time a prompt needs it, so
//! non-interactive runs keep the default signal behavior.
//!
//! ```rust,no_run
//! use twintrim::signal::install_handler;
//!
//! let handler = install_handler().expect("Failed to install signal handler");
//! handler.arm();
//! // ... wait for input, polling handler.take_interrupt() ...
//! handler.disarm();
//! ```

use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

use crate::error::ExitCode;

/// Exit code for SIGINT (Ctrl+C) interruption.
/// This follows Unix convention: 128 + signal number (SIGINT = 2).
pub const EXIT_CODE_INTERRUPTED: i32 = 130;

/// Shared interrupt state between the signal handler and the prompt.
#[derive(Debug, Clone, Default)]
pub struct InterruptHandler {
    /// Set while a prompt is waiting for input.
    armed: Arc<AtomicBool>,
    /// Set when Ctrl+C arrives while armed.
    fired: Arc<AtomicBool>,
}

impl InterruptHandler {
    /// Create a handler with no signal hook attached.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Route the next Ctrl+C to the waiting prompt.
    pub fn arm(&self) {
        self.fired.store(false, Ordering::SeqCst);
        self.armed.store(true, Ordering::SeqCst);
    }

    /// Restore abort-on-interrupt behavior.
    pub fn disarm(&self) {
        self.armed.store(false, Ordering::SeqCst);
    }

    /// Whether a prompt is currently waiting.
    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.armed.load(Ordering::SeqCst)
    }

    /// Consume a pending interrupt, returning whether one had fired.
    pub fn take_interrupt(&self) -> bool {
        self.fired.swap(false, Ordering::SeqCst)
    }

    /// Deliver an interrupt as the signal hook would.
    ///
    /// Returns `true` if a waiting prompt absorbed it, `false` if the
    /// process should abort.
    pub fn interrupt(&self) -> bool {
        if self.is_armed() {
            self.fired.store(true, Ordering::SeqCst);
            true
        } else {
            false
        }
    }

    /// Deliver an interrupt and return the exit code to abort with, if any.
    fn deliver(&self) -> Option<ExitCode> {
        (!self.interrupt()).then_some(ExitCode::Interrupted)
    }
}

/// Error type for signal handler installation.
#[derive(Debug, thiserror::Error)]
pub enum SignalError {
    /// Failed to install the Ctrl+C handler.
    #[error("Failed to install signal handler: {0}")]
    InstallFailed(#[from] ctrlc::Error),
}

static GLOBAL_HANDLER: OnceLock<InterruptHandler> = OnceLock::new();

/// Install the process-wide Ctrl+C handler, or return the installed one.
///
/// # Errors
///
/// Returns `SignalError::InstallFailed` if another handler was registered
/// outside this module.
pub fn install_handler() -> Result<InterruptHandler, SignalError> {
    if let Some(handler) = GLOBAL_HANDLER.get() {
        return Ok(handler.clone());
    }

    let handler = InterruptHandler::new();
    let hooked = handler.clone();

    ctrlc::set_handler(move || {
        let Some(code) = hooked.deliver() else {
            log::info!("Interrupt received at prompt, skipping this group");
            return;
        };
        let _ = writeln!(std::io::stderr(), "\nInterrupted.");
        let _ = std::io::stderr().flush();
        std::process::exit(code.as_i32());
    })?;

    Ok(GLOBAL_HANDLER.get_or_init(|| handler).clone())
}
