//! GNOME backend using the freedesktop-style `color-scheme` setting.
//!
//! GNOME 42+ and most desktops built on it (Ubuntu, Pop!_OS, Budgie, Cinnamon)
//! expose the preferred appearance as `org.gnome.desktop.interface color-scheme`
//! with the values `'default'`, `'prefer-light'` and `'prefer-dark'`.
//! Applications following the XDG settings portal pick up changes immediately.

use anyhow::Result;

use crate::backend::AppearanceBackend;
use crate::error::AutoModeError;
use crate::time_state::Appearance;
use crate::utils::run_command;

const SCHEMA: &str = "org.gnome.desktop.interface";
const KEY: &str = "color-scheme";

pub struct GnomeBackend;

impl GnomeBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for GnomeBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl AppearanceBackend for GnomeBackend {
    fn backend_name(&self) -> &'static str {
        "GNOME"
    }

    fn get_appearance(&self) -> Result<Appearance> {
        let output = run_command("gsettings", &["get", SCHEMA, KEY])?;
        if !output.success {
            return Err(AutoModeError::platform(format!(
                "gsettings could not read {} {}: {}",
                SCHEMA,
                KEY,
                output.stderr.trim()
            ))
            .into());
        }
        Ok(parse_color_scheme(&output.stdout)?)
    }

    fn set_appearance(&mut self, appearance: Appearance) -> Result<()> {
        let value = color_scheme_value(appearance);
        let output = run_command("gsettings", &["set", SCHEMA, KEY, value])?;
        if !output.success {
            return Err(AutoModeError::platform(format!(
                "gsettings could not change {}: {}",
                KEY,
                output.stderr.trim()
            ))
            .into());
        }
        Ok(())
    }
}

/// Interpret `gsettings get` output such as `'prefer-dark'`.
pub fn parse_color_scheme(stdout: &str) -> Result<Appearance, AutoModeError> {
    let value = stdout.trim().trim_matches('\'');
    match value {
        "prefer-dark" => Ok(Appearance::Dark),
        "" => Err(AutoModeError::platform(format!(
            "gsettings printed no value for {}",
            KEY
        ))),
        _ => Ok(Appearance::Light),
    }
}

fn color_scheme_value(appearance: Appearance) -> &'static str {
    match appearance {
        Appearance::Dark => "prefer-dark",
        Appearance::Light => "default",
    }
}
