//! Backend abstraction layer for controlling the system appearance.
//!
//! This module provides a unified interface for reading and switching the
//! light/dark appearance across platforms through the `AppearanceBackend` trait.
//! It includes automatic backend detection and the idempotent
//! read-compare-write step used by every run.
//!
//! ## Supported Backends
//!
//! - **macOS Backend**: Reads `AppleInterfaceStyle` with `defaults`, switches via
//!   `osascript` and System Events
//! - **GNOME Backend**: Reads and writes the `org.gnome.desktop.interface
//!   color-scheme` key with `gsettings`
//!
//! ## Backend Selection
//!
//! The backend can be selected automatically or explicitly:
//! - **Auto-detection**: macOS builds use the macOS backend; elsewhere a
//!   GNOME-family `XDG_CURRENT_DESKTOP` or a `gsettings` binary selects GNOME
//! - **Explicit Configuration**: Set `backend = "macos"` or `backend = "gnome"` in config
//!
//! Auto-detection priority: macOS → GNOME → error

use anyhow::{Context, Result};

use crate::config::BackendChoice;
use crate::error::AutoModeError;
use crate::logger::Log;
use crate::time_state::Appearance;

pub mod gnome;
pub mod macos;

/// Trait for backends that can read and change the system appearance.
///
/// Implementations shell out to platform tools; constructing one performs no
/// OS calls, so a backend can be created before it is known to be needed.
#[cfg_attr(test, mockall::automock)]
pub trait AppearanceBackend {
    /// Human-readable name for this backend (e.g. "macOS", "GNOME").
    fn backend_name(&self) -> &'static str;

    /// Read the current system appearance.
    ///
    /// # Errors
    /// A `PlatformError` when the platform tool is missing, fails, or
    /// prints something that cannot be interpreted.
    fn get_appearance(&self) -> Result<Appearance>;

    /// Switch the system appearance.
    fn set_appearance(&mut self, appearance: Appearance) -> Result<()>;
}

/// Result of applying a desired appearance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// The system already had the desired appearance; nothing was written.
    Unchanged(Appearance),
    /// The appearance was switched.
    Changed { from: Appearance, to: Appearance },
    /// Dry run: the appearance would have been switched.
    WouldChange { from: Appearance, to: Appearance },
}

impl ApplyOutcome {
    /// Whether the system appearance was actually modified.
    pub fn is_mutation(&self) -> bool {
        matches!(self, ApplyOutcome::Changed { .. })
    }
}

/// Bring the system appearance to `desired`.
///
/// Reads the current appearance first and only writes when it differs, so
/// running this repeatedly with the same target causes at most one switch.
/// With `dry_run` the write is skipped but the read still happens.
pub fn apply_appearance(
    backend: &mut dyn AppearanceBackend,
    desired: Appearance,
    dry_run: bool,
) -> Result<ApplyOutcome> {
    let current = backend.get_appearance().with_context(|| {
        format!(
            "Failed to read the current {} appearance",
            backend.backend_name()
        )
    })?;

    if current == desired {
        return Ok(ApplyOutcome::Unchanged(current));
    }

    if dry_run {
        return Ok(ApplyOutcome::WouldChange {
            from: current,
            to: desired,
        });
    }

    let name = backend.backend_name();
    backend
        .set_appearance(desired)
        .with_context(|| format!("Failed to switch {} to {} mode", name, desired))?;

    Ok(ApplyOutcome::Changed {
        from: current,
        to: desired,
    })
}

/// Enumeration of available backend types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendType {
    /// macOS system appearance
    MacOs,
    /// GNOME color-scheme setting
    Gnome,
}

impl BackendType {
    /// Get the human-readable name for this backend type.
    pub fn name(&self) -> &'static str {
        match self {
            BackendType::MacOs => "macOS",
            BackendType::Gnome => "GNOME",
        }
    }
}

/// Detect the appropriate backend based on the environment and configuration.
///
/// # Arguments
/// * `choice` - Backend configured by the user (`auto` unless set)
///
/// # Errors
/// Returns a `PlatformError` when `auto` finds no supported desktop.
pub fn detect_backend(choice: BackendChoice) -> Result<BackendType> {
    match choice {
        BackendChoice::Macos => Ok(BackendType::MacOs),
        BackendChoice::Gnome => Ok(BackendType::Gnome),
        BackendChoice::Auto => {
            let desktop = std::env::var("XDG_CURRENT_DESKTOP").ok();
            let backend = detect_backend_from_env(
                cfg!(target_os = "macos"),
                desktop.as_deref(),
                crate::utils::command_exists("gsettings"),
            )?;
            Ok(backend)
        }
    }
}

/// Pure auto-detection logic.
///
/// # Arguments
/// * `is_macos` - Whether this is a macOS build
/// * `desktop` - Value of `XDG_CURRENT_DESKTOP`, if set
/// * `has_gsettings` - Whether `gsettings` is on PATH
pub fn detect_backend_from_env(
    is_macos: bool,
    desktop: Option<&str>,
    has_gsettings: bool,
) -> Result<BackendType, AutoModeError> {
    if is_macos {
        return Ok(BackendType::MacOs);
    }

    if desktop.is_some_and(is_gnome_family_desktop) || has_gsettings {
        return Ok(BackendType::Gnome);
    }

    Log::log_pipe();
    Err(AutoModeError::platform(format!(
        "No supported appearance backend found (XDG_CURRENT_DESKTOP={}).\n\
        auto-mode supports macOS and desktops that follow the GNOME color-scheme setting.",
        desktop.unwrap_or("unset")
    )))
}

/// `XDG_CURRENT_DESKTOP` is a colon-separated list, e.g. `ubuntu:GNOME`.
fn is_gnome_family_desktop(desktop: &str) -> bool {
    desktop.split(':').any(|name| {
        matches!(
            name.trim().to_ascii_lowercase().as_str(),
            "gnome" | "gnome-classic" | "gnome-flashback" | "ubuntu" | "pop" | "unity" | "budgie"
                | "budgie-desktop" | "cinnamon" | "x-cinnamon"
        )
    })
}

/// Create a backend instance for the detected or configured backend type.
pub fn create_backend(backend_type: BackendType) -> Box<dyn AppearanceBackend> {
    match backend_type {
        BackendType::MacOs => Box::new(macos::MacOsBackend::new()) as Box<dyn AppearanceBackend>,
        BackendType::Gnome => Box::new(gnome::GnomeBackend::new()) as Box<dyn AppearanceBackend>,
    }
}
