//! Structured logging system with visual formatting.
//!
//! Every run prints one small tree: a version header, a block per phase
//! (configuration, location, backend, outcome) with indented details, and a
//! closing marker. Level-prefixed lines (`[LOG]`, `[WARN]`, `[INFO]`, `[ERR]`)
//! can appear anywhere inside it.
//!
//! Output can be switched off at runtime so cron runs stay quiet
//! (`--quiet`). Errors are the exception: they always go to stderr, even when
//! logging is disabled, so a failed scheduled run is never silent.

use std::sync::atomic::{AtomicBool, Ordering};

static LOGGING_ENABLED: AtomicBool = AtomicBool::new(true);

/// Log level enumeration for categorizing message importance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Log,  // Normal operational logs
    Warn, // Warning messages (non-fatal issues)
    Err,  // Error messages, always shown
    Info, // Informational messages (status updates)
}

impl LogLevel {
    /// Prefix printed in front of the message.
    pub fn prefix(&self) -> &'static str {
        match self {
            LogLevel::Log => "[LOG]",
            LogLevel::Warn => "[WARN]",
            LogLevel::Err => "[ERR]",
            LogLevel::Info => "[INFO]",
        }
    }

    /// Whether the message is printed even with logging disabled.
    pub fn always_shown(&self) -> bool {
        matches!(self, LogLevel::Err)
    }
}

/// Main logging interface providing structured output formatting.
pub struct Log;

impl Log {
    /// Enable or disable non-error logging.
    ///
    /// `main` turns logging off for `--quiet`. Errors still reach stderr.
    pub fn set_enabled(enabled: bool) {
        LOGGING_ENABLED.store(enabled, Ordering::SeqCst);
    }

    /// Check if logging is currently enabled.
    pub fn is_enabled() -> bool {
        LOGGING_ENABLED.load(Ordering::SeqCst)
    }

    /// Main log function with level-based prefixes.
    ///
    /// Errors are written to stderr unconditionally. Everything else goes to
    /// stdout and respects [`Log::set_enabled`].
    ///
    /// # Arguments
    /// * `level` - LogLevel indicating message importance
    /// * `message` - Text content to log
    pub fn log(level: LogLevel, message: &str) {
        if level.always_shown() {
            eprintln!("{} {}", level.prefix(), message);
        } else if Self::is_enabled() {
            println!("{} {}", level.prefix(), message);
        }
    }

    // ═══ Convenience Methods for Common Log Levels ═══

    /// Log an error message.
    pub fn log_error(message: &str) {
        Self::log(LogLevel::Err, message);
    }

    /// Log a warning message.
    ///
    /// Used for problems the run recovers from, such as an unreadable
    /// location cache or a failed time zone detection.
    pub fn log_warning(message: &str) {
        Self::log(LogLevel::Warn, message);
    }

    /// Log an informational message.
    pub fn log_info(message: &str) {
        Self::log(LogLevel::Info, message);
    }

    /// Log a debug/operational message.
    pub fn log_debug(message: &str) {
        Self::log(LogLevel::Log, message);
    }

    // ═══ Visual Formatting Functions ═══

    /// Log a decorated message with visual branching indicator.
    ///
    /// Used for main status lines, such as a detected location.
    pub fn log_decorated(message: &str) {
        if !Self::is_enabled() {
            return;
        }
        println!("┣ {}", message);
    }

    /// Log an indented message for sub-items or details.
    ///
    /// Sits under the preceding block, e.g. the location source or the time
    /// left until the next switch.
    pub fn log_indented(message: &str) {
        if !Self::is_enabled() {
            return;
        }
        println!("┃   {}", message);
    }

    /// Log a visual pipe separator.
    pub fn log_pipe() {
        if !Self::is_enabled() {
            return;
        }
        println!("┃");
    }

    /// Log a block start message with visual separation.
    ///
    /// Each phase of a run (configuration, location, backend, outcome) opens
    /// its own block.
    pub fn log_block_start(message: &str) {
        if !Self::is_enabled() {
            return;
        }
        println!("┃");
        println!("┣ {}", message);
    }

    /// Log the application version header.
    ///
    /// Opens the tree; every command starts with it.
    pub fn log_version() {
        if !Self::is_enabled() {
            return;
        }
        println!("┏ auto-mode v{} ━━╸", env!("CARGO_PKG_VERSION"));
        println!("┃");
    }

    /// Log the final termination marker.
    pub fn log_end() {
        if !Self::is_enabled() {
            return;
        }
        println!("╹");
    }
}
