//! # auto-mode
//!
//! Switches the operating system between light and dark appearance based on
//! the local sunrise and sunset.
//!
//! auto-mode is a one-shot tool: a scheduler (cron, launchd, a systemd timer)
//! runs it every few minutes, it computes today's sun times for the configured
//! location, decides which appearance the current moment calls for, and
//! switches only when the system disagrees.
//!
//! ## Architecture
//!
//! - **args**: Command-line parsing
//! - **backend**: Appearance backends (macOS, GNOME) and the idempotent apply step
//! - **commands**: Run, status and init command handlers
//! - **config**: Configuration loading, validation, and default generation
//! - **constants**: Application-wide constants and defaults
//! - **error**: Typed errors and their exit codes
//! - **geo**: Location resolution, city lookup, and solar calculations
//! - **lock**: Run lock against overlapping scheduled runs
//! - **logger**: Structured logging with visual formatting
//! - **time_state**: Light/dark decisions from sun times
//! - **toggle**: One complete run with an injectable clock and backend
//! - **utils**: Command execution and formatting helpers

pub mod args;
pub mod backend;
pub mod commands;
pub mod config;
pub mod constants;
pub mod error;
pub mod geo;
pub mod lock;
pub mod logger;
pub mod time_state;
pub mod toggle;
pub mod utils;

// Re-export important types for easier access
pub use backend::{AppearanceBackend, ApplyOutcome, apply_appearance};
pub use config::Config;
pub use error::AutoModeError;
pub use geo::Location;
pub use logger::{Log, LogLevel};
pub use time_state::{Appearance, ModePreference, decide_appearance};
pub use toggle::{ToggleSettings, run_toggle};
