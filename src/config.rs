//! Configuration system for auto-mode.
//!
//! Settings are read from `auto-mode.toml` in the user's config directory
//! (`$XDG_CONFIG_HOME/auto-mode/auto-mode.toml` on Linux,
//! `~/Library/Application Support/auto-mode/auto-mode.toml` on macOS) or from
//! the file given with `--config`.
//!
//! ## Configuration Structure
//!
//! ```toml
//! backend = "auto"          # "auto", "macos" or "gnome"
//! mode = "auto"             # "auto", "light" or "dark"
//! latitude = 51.5074        # Geographic coordinates
//! longitude = -0.1278
//! city = "London"           # Alternative to latitude/longitude
//! sunrise_offset = 0        # Minutes added to sunrise (-180..=180)
//! sunset_offset = 0         # Minutes added to sunset (-180..=180)
//! cache_location = true     # Cache detected locations for 24 hours
//! ```
//!
//! Every key is optional. A missing file at the default location simply means
//! defaults apply; a missing file named explicitly with `--config` is an error.
//!
//! ## Validation
//!
//! Coordinates must be given as a pair and within range, offsets must stay
//! within three hours, and `city` cannot be combined with coordinates. All
//! validation failures are configuration errors (exit code 2).

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::constants::*;
use crate::error::AutoModeError;
use crate::logger::Log;
use crate::time_state::ModePreference;

/// Backend selection for appearance control.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BackendChoice {
    /// Detect the platform at runtime: macOS first, then GNOME.
    Auto,
    /// macOS system appearance via `defaults` and `osascript`.
    Macos,
    /// GNOME `color-scheme` setting via `gsettings`.
    Gnome,
}

impl BackendChoice {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendChoice::Auto => "auto",
            BackendChoice::Macos => "macos",
            BackendChoice::Gnome => "gnome",
        }
    }
}

/// Configuration structure for auto-mode settings.
///
/// Fields left unset fall back to the defaults in `constants.rs`.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    /// Appearance backend. Defaults to `Auto`.
    pub backend: Option<BackendChoice>,

    /// Follow the sun (`auto`) or pin an appearance.
    pub mode: Option<ModePreference>,

    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub city: Option<String>,

    pub sunrise_offset: Option<i64>, // minutes
    pub sunset_offset: Option<i64>,  // minutes

    /// Whether detected locations are cached between runs.
    pub cache_location: Option<bool>,

    /// File this configuration was loaded from, if any.
    #[serde(skip)]
    pub source_path: Option<PathBuf>,
}

impl Config {
    /// Default configuration path inside the user's config directory.
    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().context("Could not determine config directory")?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE_NAME))
    }

    /// Load configuration.
    ///
    /// # Arguments
    /// * `explicit_path` - Path given with `--config`; it must exist
    ///
    /// # Returns
    /// * `Ok(Config)` - The validated configuration, or defaults when the
    ///   default file does not exist
    /// * `Err(_)` - If the file cannot be read, parsed or validated
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        match explicit_path {
            Some(path) => Self::load_from_path(path),
            None => {
                let path = Self::get_config_path()?;
                if path.exists() {
                    Self::load_from_path(&path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Load from a specific path. Does NOT fall back to defaults if the path doesn't exist.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(AutoModeError::configuration(format!(
                "Configuration file not found at specified path: {}",
                path.display()
            ))
            .into());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        let mut config: Config = toml::from_str(&content).map_err(|e| {
            AutoModeError::configuration(format!("Failed to parse {}: {}", path.display(), e))
        })?;
        config.source_path = Some(path.to_path_buf());

        validate_config(&config)?;

        Ok(config)
    }

    /// Parse TOML content without validating it.
    pub fn parse(content: &str) -> Result<Self, AutoModeError> {
        toml::from_str(content)
            .map_err(|e| AutoModeError::configuration(format!("Invalid configuration: {}", e)))
    }

    pub fn backend(&self) -> BackendChoice {
        self.backend.unwrap_or(DEFAULT_BACKEND)
    }

    pub fn mode(&self) -> ModePreference {
        self.mode.unwrap_or(DEFAULT_MODE)
    }

    pub fn sunrise_offset(&self) -> i64 {
        self.sunrise_offset.unwrap_or(DEFAULT_SUNRISE_OFFSET)
    }

    pub fn sunset_offset(&self) -> i64 {
        self.sunset_offset.unwrap_or(DEFAULT_SUNSET_OFFSET)
    }

    pub fn cache_location(&self) -> bool {
        self.cache_location.unwrap_or(DEFAULT_CACHE_LOCATION)
    }

    /// Write a commented default configuration file.
    ///
    /// Refuses to overwrite an existing file.
    ///
    /// # Arguments
    /// * `path` - Path where the config file should be created
    /// * `coords` - Optional (latitude, longitude, label) to pre-fill the location
    pub fn create_default_config(path: &Path, coords: Option<(f64, f64, String)>) -> Result<()> {
        if path.exists() {
            return Err(AutoModeError::configuration(format!(
                "Configuration file already exists: {}",
                path.display()
            ))
            .into());
        }

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let builder = ConfigBuilder::new()
            .add_section("auto-mode configuration")
            .add_setting(
                "backend",
                &format!("\"{}\"", DEFAULT_BACKEND.as_str()),
                "Backend to use: \"auto\", \"macos\" or \"gnome\"",
            )
            .add_setting(
                "mode",
                &format!("\"{}\"", DEFAULT_MODE.as_str()),
                "Select: \"auto\" (follow the sun), \"light\" or \"dark\"",
            )
            .add_setting(
                "sunrise_offset",
                &DEFAULT_SUNRISE_OFFSET.to_string(),
                &format!(
                    "Minutes to shift the switch to light ({} to {})",
                    MINIMUM_OFFSET, MAXIMUM_OFFSET
                ),
            )
            .add_setting(
                "sunset_offset",
                &DEFAULT_SUNSET_OFFSET.to_string(),
                &format!(
                    "Minutes to shift the switch to dark ({} to {})",
                    MINIMUM_OFFSET, MAXIMUM_OFFSET
                ),
            )
            .add_setting(
                "cache_location",
                &DEFAULT_CACHE_LOCATION.to_string(),
                "Cache the detected location for 24 hours",
            )
            .add_section("Location");

        let builder = match coords {
            Some((lat, lon, label)) => builder
                .add_setting("latitude", &format!("{:.6}", lat), &format!("Near {}", label))
                .add_setting("longitude", &format!("{:.6}", lon), "Geographic longitude"),
            None => builder.add_comment(
                "latitude/longitude or city; detected from the time zone when unset",
            ),
        };

        fs::write(path, builder.build() + "\n").context("Failed to write default config file")?;
        Ok(())
    }

    pub fn log_config(&self) {
        match &self.source_path {
            Some(path) => Log::log_block_start(&format!(
                "Loaded configuration from {}",
                crate::utils::path_for_display(path)
            )),
            None => Log::log_block_start("No configuration file, using defaults"),
        }

        Log::log_indented(&format!("Backend: {}", self.backend().as_str()));
        Log::log_indented(&format!("Mode: {}", self.mode().as_str()));

        if let (Some(lat), Some(lon)) = (self.latitude, self.longitude) {
            Log::log_indented(&format!(
                "Location: {}",
                crate::utils::format_coordinates(lat, lon)
            ));
        } else if let Some(city) = &self.city {
            Log::log_indented(&format!("City: {}", city));
        }

        if self.sunrise_offset() != 0 || self.sunset_offset() != 0 {
            Log::log_indented(&format!(
                "Offsets: sunrise {:+} min, sunset {:+} min",
                self.sunrise_offset(),
                self.sunset_offset()
            ));
        }
    }
}

/// Validate field ranges and combinations.
pub fn validate_config(config: &Config) -> Result<(), AutoModeError> {
    match (config.latitude, config.longitude) {
        (Some(lat), Some(lon)) => crate::geo::solar::validate_coordinates(lat, lon)?,
        (None, None) => {}
        _ => {
            return Err(AutoModeError::configuration(
                "latitude and longitude must be set together",
            ));
        }
    }

    if config.city.is_some() && config.latitude.is_some() {
        return Err(AutoModeError::configuration(
            "Set either city or latitude/longitude, not both",
        ));
    }

    if let Some(city) = &config.city {
        if city.trim().is_empty() {
            return Err(AutoModeError::configuration("city must not be empty"));
        }
    }

    for (key, value) in [
        ("sunrise_offset", config.sunrise_offset),
        ("sunset_offset", config.sunset_offset),
    ] {
        if let Some(minutes) = value {
            if !(MINIMUM_OFFSET..=MAXIMUM_OFFSET).contains(&minutes) {
                return Err(AutoModeError::configuration(format!(
                    "{} must be between {} and {} minutes (got {})",
                    key, MINIMUM_OFFSET, MAXIMUM_OFFSET, minutes
                )));
            }
        }
    }

    Ok(())
}

/// Builder for creating dynamically-aligned configuration files.
///
/// Comments are aligned to the widest setting line so the generated file
/// stays tidy when defaults change.
struct ConfigBuilder {
    entries: Vec<EntryType>,
}

enum EntryType {
    Section(String),
    Setting { line: String, comment: String },
    Comment(String),
}

impl ConfigBuilder {
    fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    fn add_section(mut self, title: &str) -> Self {
        self.entries.push(EntryType::Section(format!("#[{}]", title)));
        self
    }

    fn add_setting(mut self, key: &str, value: &str, comment: &str) -> Self {
        self.entries.push(EntryType::Setting {
            line: format!("{} = {}", key, value),
            comment: format!("# {}", comment),
        });
        self
    }

    fn add_comment(mut self, text: &str) -> Self {
        self.entries.push(EntryType::Comment(format!("# {}", text)));
        self
    }

    fn build(self) -> String {
        let max_width = self
            .entries
            .iter()
            .filter_map(|entry| match entry {
                EntryType::Setting { line, .. } => Some(line.len()),
                _ => None,
            })
            .max()
            .unwrap_or(0)
            + 1; // one space between setting and comment

        let mut result = Vec::new();
        let mut first_section = true;

        for entry in self.entries {
            match entry {
                EntryType::Section(title) => {
                    if !first_section {
                        result.push(String::new());
                    }
                    result.push(title);
                    first_section = false;
                }
                EntryType::Setting { line, comment } => {
                    let padding = " ".repeat(max_width - line.len());
                    result.push(format!("{}{}{}", line, padding, comment));
                }
                EntryType::Comment(text) => result.push(text),
            }
        }

        result.join("\n")
    }
}
