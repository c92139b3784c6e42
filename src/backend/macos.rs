//! macOS backend.
//!
//! The appearance is read from the global `AppleInterfaceStyle` default, which
//! holds `Dark` in dark mode and is absent in light mode. Switching goes through
//! System Events so running applications are notified; the first run may
//! trigger an automation permission prompt.

use anyhow::Result;

use crate::backend::AppearanceBackend;
use crate::error::AutoModeError;
use crate::time_state::Appearance;
use crate::utils::{CommandOutput, run_command};

pub struct MacOsBackend;

impl MacOsBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for MacOsBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl AppearanceBackend for MacOsBackend {
    fn backend_name(&self) -> &'static str {
        "macOS"
    }

    fn get_appearance(&self) -> Result<Appearance> {
        let output = run_command("defaults", &["read", "-g", "AppleInterfaceStyle"])?;
        Ok(parse_interface_style(&output)?)
    }

    fn set_appearance(&mut self, appearance: Appearance) -> Result<()> {
        let script = set_dark_mode_script(appearance);
        let output = run_command("osascript", &["-e", &script])?;
        if !output.success {
            return Err(AutoModeError::platform(format!(
                "osascript could not change the appearance: {}",
                output.stderr.trim()
            ))
            .into());
        }
        Ok(())
    }
}

/// Interpret `defaults read -g AppleInterfaceStyle`.
///
/// A missing key (non-zero exit mentioning "does not exist") means light mode.
pub fn parse_interface_style(output: &CommandOutput) -> Result<Appearance, AutoModeError> {
    if !output.success {
        if output.stderr.contains("does not exist") {
            return Ok(Appearance::Light);
        }
        return Err(AutoModeError::platform(format!(
            "defaults could not read AppleInterfaceStyle: {}",
            output.stderr.trim()
        )));
    }

    match output.stdout.trim() {
        style if style.eq_ignore_ascii_case("dark") => Ok(Appearance::Dark),
        "" | "Light" => Ok(Appearance::Light),
        other => Err(AutoModeError::platform(format!(
            "Unexpected AppleInterfaceStyle value '{}'",
            other
        ))),
    }
}

fn set_dark_mode_script(appearance: Appearance) -> String {
    format!(
        "tell application \"System Events\" to tell appearance preferences to set dark mode to {}",
        appearance.is_dark()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn output(success: bool, stdout: &str, stderr: &str) -> CommandOutput {
        CommandOutput {
            success,
            stdout: stdout.to_string(),
            stderr: stderr.to_string(),
        }
    }

    #[test]
    fn test_dark_style() {
        assert_eq!(
            parse_interface_style(&output(true, "Dark\n", "")).unwrap(),
            Appearance::Dark
        );
    }

    #[test]
    fn test_missing_key_is_light() {
        let stderr = concat!(
            "The domain/default pair of (kCFPreferencesAnyApplication, AppleInterfaceStyle) ",
            "does not exist\n"
        );
        assert_eq!(
            parse_interface_style(&output(false, "", stderr)).unwrap(),
            Appearance::Light
        );
    }

    #[test]
    fn test_other_failure_is_platform_error() {
        let err = parse_interface_style(&output(false, "", "Operation not permitted")).unwrap_err();
        assert!(matches!(err, AutoModeError::Platform(_)));
    }

    #[test]
    fn test_unexpected_value_is_platform_error() {
        assert!(parse_interface_style(&output(true, "Sepia", "")).is_err());
    }

    #[test]
    fn test_script_text() {
        assert!(set_dark_mode_script(Appearance::Dark).ends_with("set dark mode to true"));
        assert!(set_dark_mode_script(Appearance::Light).ends_with("set dark mode to false"));
    }
}
