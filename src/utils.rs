//! Utility functions shared across the codebase.
//!
//! This module provides helpers for running platform commands, formatting
//! coordinates and durations, and displaying paths.

use std::io::ErrorKind;
use std::path::Path;
use std::process::Command;

use crate::error::AutoModeError;

/// Captured result of an external command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

/// Run an external command and capture its output.
///
/// Spawn failures are mapped to platform errors: a missing binary means the
/// appearance capability is unavailable, a permission error means it was denied.
/// A non-zero exit status is *not* an error here; callers decide what it means.
pub fn run_command(program: &str, args: &[&str]) -> Result<CommandOutput, AutoModeError> {
    let output = Command::new(program).args(args).output().map_err(|e| match e.kind() {
        ErrorKind::NotFound => {
            AutoModeError::platform(format!("`{}` is not installed or not on PATH", program))
        }
        ErrorKind::PermissionDenied => {
            AutoModeError::platform(format!("Permission denied running `{}`", program))
        }
        _ => AutoModeError::platform(format!("Failed to run `{}`: {}", program, e)),
    })?;

    Ok(CommandOutput {
        success: output.status.success(),
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    })
}

/// Check whether an executable with this name exists on PATH.
pub fn command_exists(program: &str) -> bool {
    std::env::var_os("PATH")
        .map(|paths| std::env::split_paths(&paths).any(|dir| dir.join(program).is_file()))
        .unwrap_or(false)
}

/// Format coordinates as `51.5074°N, 0.1278°W`.
///
/// # Examples
/// ```
/// use auto_mode::utils::format_coordinates;
/// assert_eq!(format_coordinates(51.5074, -0.1278), "51.5074°N, 0.1278°W");
/// ```
pub fn format_coordinates(latitude: f64, longitude: f64) -> String {
    format!(
        "{:.4}°{}, {:.4}°{}",
        latitude.abs(),
        if latitude >= 0.0 { "N" } else { "S" },
        longitude.abs(),
        if longitude >= 0.0 { "E" } else { "W" }
    )
}

/// Format a duration as `3h 07m` (or `42m` under an hour).
pub fn format_duration(duration: chrono::Duration) -> String {
    let total_minutes = duration.num_minutes().max(0);
    let (hours, minutes) = (total_minutes / 60, total_minutes % 60);
    if hours > 0 {
        format!("{}h {:02}m", hours, minutes)
    } else {
        format!("{}m", minutes)
    }
}

/// Shorten a path under the home directory to `~/...` for display.
pub fn path_for_display(path: &Path) -> String {
    if let Some(home) = dirs::home_dir() {
        if let Ok(relative) = path.strip_prefix(&home) {
            return format!("~/{}", relative.display());
        }
    }
    path.display().to_string()
}
