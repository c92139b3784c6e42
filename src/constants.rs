//! Application constants and default values for auto-mode.
//!
//! This module contains the configuration defaults, validation limits,
//! and operational constants used throughout the application.

use crate::config::BackendChoice;
use crate::time_state::ModePreference;

// ═══ Application Configuration Defaults ═══
// These values are used when config options are not specified by the user

pub const DEFAULT_BACKEND: BackendChoice = BackendChoice::Auto; // Auto-detect backend
pub const DEFAULT_MODE: ModePreference = ModePreference::Auto; // Follow the sun
pub const DEFAULT_SUNRISE_OFFSET: i64 = 0; // minutes
pub const DEFAULT_SUNSET_OFFSET: i64 = 0; // minutes
pub const DEFAULT_CACHE_LOCATION: bool = true;

// Built-in location used when nothing else is configured or detectable (London)
pub const DEFAULT_LATITUDE: f64 = 51.5074;
pub const DEFAULT_LONGITUDE: f64 = -0.1278;
pub const DEFAULT_LOCATION_LABEL: &str = "London, GB";

// ═══ Validation Limits ═══

pub const MINIMUM_LATITUDE: f64 = -90.0;
pub const MAXIMUM_LATITUDE: f64 = 90.0;
pub const MINIMUM_LONGITUDE: f64 = -180.0;
pub const MAXIMUM_LONGITUDE: f64 = 180.0;

// Sunrise/sunset offsets (minutes)
pub const MINIMUM_OFFSET: i64 = -180;
pub const MAXIMUM_OFFSET: i64 = 180;

// ═══ Solar Calculation Constants ═══

/// Sun's reference zenith for sunrise/sunset, including refraction and disc radius.
pub const SUN_ZENITH_DEGREES: f64 = 90.8;

/// The sun moves one degree of longitude every four minutes.
pub const SECONDS_PER_DEGREE_OF_LONGITUDE: f64 = 240.0;

// ═══ Files and Environment ═══

pub const APP_NAME: &str = "auto-mode";
pub const CONFIG_FILE_NAME: &str = "auto-mode.toml";
pub const CACHE_FILE_NAME: &str = "location.toml";
pub const LOCK_FILE_NAME: &str = "auto-mode.lock";
pub const LATITUDE_ENV_VAR: &str = "AUTO_MODE_LATITUDE";
pub const LONGITUDE_ENV_VAR: &str = "AUTO_MODE_LONGITUDE";

/// Cached locations older than this are re-detected (24 hours).
pub const CACHE_MAX_AGE_SECS: i64 = 24 * 60 * 60;

// ═══ Exit Codes ═══

pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILURE: i32 = 1; // General failure
pub const EXIT_CONFIGURATION_ERROR: i32 = 2; // Invalid config, location or arguments
pub const EXIT_PLATFORM_ERROR: i32 = 3; // Appearance capability unavailable or denied
