//! Geographic location resolution and sunrise/sunset calculations.
//!
//! This module provides functionality for:
//! - Resolving the location to use from flags, environment, config, cache or detection
//! - City lookup by name
//! - Timezone-based coordinate detection
//! - Solar calculations for sunrise/sunset times

pub mod cache;
pub mod city_lookup;
pub mod solar;
pub mod timezone;

pub use city_lookup::find_city;
pub use timezone::detect_coordinates_from_timezone;

use anyhow::Result;
use chrono::{DateTime, Local, Utc};
use std::fmt;
use std::path::Path;

use crate::config::Config;
use crate::constants::*;
use crate::error::AutoModeError;
use crate::logger::Log;
use cache::CachedLocation;
use solar::{Daylight, validate_coordinates};

/// Where a resolved location came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationSource {
    CommandLine,
    CityLookup,
    Environment,
    ConfigFile,
    Cache,
    Timezone,
    StaleCache,
    BuiltInDefault,
}

impl fmt::Display for LocationSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            LocationSource::CommandLine => "command line",
            LocationSource::CityLookup => "city lookup",
            LocationSource::Environment => "environment",
            LocationSource::ConfigFile => "config file",
            LocationSource::Cache => "location cache",
            LocationSource::Timezone => "system time zone",
            LocationSource::StaleCache => "stale location cache",
            LocationSource::BuiltInDefault => "built-in default",
        };
        f.write_str(text)
    }
}

/// Validated geographic coordinates plus their provenance.
#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
    pub source: LocationSource,
    pub label: Option<String>,
}

impl Location {
    pub fn new(
        latitude: f64,
        longitude: f64,
        source: LocationSource,
    ) -> Result<Self, AutoModeError> {
        validate_coordinates(latitude, longitude)?;
        Ok(Self {
            latitude,
            longitude,
            source,
            label: None,
        })
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn built_in_default() -> Self {
        Self {
            latitude: DEFAULT_LATITUDE,
            longitude: DEFAULT_LONGITUDE,
            source: LocationSource::BuiltInDefault,
            label: Some(DEFAULT_LOCATION_LABEL.to_string()),
        }
    }

    /// Human-readable description, e.g. `Paris, France (48.8566°N, 2.3522°E)`.
    pub fn describe(&self) -> String {
        let coords = crate::utils::format_coordinates(self.latitude, self.longitude);
        match &self.label {
            Some(label) => format!("{} ({})", label, coords),
            None => coords,
        }
    }
}

/// Location overrides given on the command line.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LocationOverrides {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub city: Option<String>,
}

/// Combine an optional latitude/longitude pair; half a pair is an error.
fn coordinate_pair(
    latitude: Option<f64>,
    longitude: Option<f64>,
    origin: &str,
) -> Result<Option<(f64, f64)>, AutoModeError> {
    match (latitude, longitude) {
        (Some(lat), Some(lon)) => Ok(Some((lat, lon))),
        (None, None) => Ok(None),
        (Some(_), None) => Err(AutoModeError::configuration(format!(
            "{} sets a latitude but no longitude",
            origin
        ))),
        (None, Some(_)) => Err(AutoModeError::configuration(format!(
            "{} sets a longitude but no latitude",
            origin
        ))),
    }
}

/// Read `AUTO_MODE_LATITUDE` / `AUTO_MODE_LONGITUDE`.
pub fn read_env_coordinates() -> Result<Option<(f64, f64)>, AutoModeError> {
    let parse = |name: &str| -> Result<Option<f64>, AutoModeError> {
        match std::env::var(name) {
            Ok(value) if value.trim().is_empty() => Ok(None),
            Ok(value) => value.trim().parse::<f64>().map(Some).map_err(|_| {
                AutoModeError::configuration(format!("{} is not a number: '{}'", name, value))
            }),
            Err(_) => Ok(None),
        }
    };

    coordinate_pair(
        parse(LATITUDE_ENV_VAR)?,
        parse(LONGITUDE_ENV_VAR)?,
        "The environment",
    )
}

/// Resolve a location from explicit sources only.
///
/// Precedence: command-line coordinates, command-line city, environment,
/// config coordinates, config city. Returns `Ok(None)` when none is set.
/// `env_coordinates` is only called once the command line has nothing to say.
pub fn resolve_explicit_location<E>(
    overrides: &LocationOverrides,
    env_coordinates: E,
    config: &Config,
) -> Result<Option<Location>, AutoModeError>
where
    E: FnOnce() -> Result<Option<(f64, f64)>, AutoModeError>,
{
    if let Some((lat, lon)) =
        coordinate_pair(overrides.latitude, overrides.longitude, "The command line")?
    {
        return Location::new(lat, lon, LocationSource::CommandLine).map(Some);
    }

    if let Some(query) = &overrides.city {
        let city = find_city(query)?;
        return Location::new(city.latitude, city.longitude, LocationSource::CityLookup)
            .map(|location| Some(location.with_label(city.label())));
    }

    if let Some((lat, lon)) = env_coordinates()? {
        return Location::new(lat, lon, LocationSource::Environment).map(Some);
    }

    if let Some((lat, lon)) =
        coordinate_pair(config.latitude, config.longitude, "The config file")?
    {
        return Location::new(lat, lon, LocationSource::ConfigFile).map(Some);
    }

    if let Some(query) = &config.city {
        let city = find_city(query)?;
        return Location::new(city.latitude, city.longitude, LocationSource::ConfigFile)
            .map(|location| Some(location.with_label(city.label())));
    }

    Ok(None)
}

/// Resolve a location when nothing explicit is configured.
///
/// Order: fresh cache, `detect`, stale cache, built-in default. Failures along
/// the way are logged and skipped; this never fails.
pub fn resolve_detected_location<F>(
    cache_path: Option<&Path>,
    now: DateTime<Utc>,
    detect: F,
) -> Location
where
    F: FnOnce() -> Result<(f64, f64, String)>,
{
    let cached = cache_path.and_then(|path| match CachedLocation::load(path) {
        Ok(entry) => entry,
        Err(e) => {
            Log::log_warning(&format!("Ignoring location cache: {:#}", e));
            None
        }
    });

    if let Some(entry) = cached.as_ref().filter(|entry| entry.is_fresh(now)) {
        if let Some(location) = location_from_cache(entry, LocationSource::Cache) {
            return location;
        }
    }

    match detect().and_then(|(lat, lon, label)| {
        Ok(Location::new(lat, lon, LocationSource::Timezone)?.with_label(label))
    }) {
        Ok(location) => {
            if let Some(path) = cache_path {
                let entry = CachedLocation::new(
                    location.latitude,
                    location.longitude,
                    location.label.clone(),
                    now,
                );
                if let Err(e) = entry.save(path) {
                    Log::log_warning(&format!("Could not update location cache: {:#}", e));
                }
            }
            return location;
        }
        Err(e) => Log::log_warning(&format!("Location detection failed: {:#}", e)),
    }

    if let Some(location) = cached
        .as_ref()
        .and_then(|entry| location_from_cache(entry, LocationSource::StaleCache))
    {
        return location;
    }

    Log::log_warning(&format!(
        "No location configured, using {}",
        DEFAULT_LOCATION_LABEL
    ));
    Log::log_indented("Set latitude/longitude in the config file or pass --city");
    Location::built_in_default()
}

fn location_from_cache(entry: &CachedLocation, source: LocationSource) -> Option<Location> {
    let location = Location::new(entry.latitude, entry.longitude, source).ok()?;
    Some(match &entry.label {
        Some(label) => location.with_label(label.clone()),
        None => location,
    })
}

/// Resolve the location for this run, following the full precedence chain.
pub fn resolve_location(
    overrides: &LocationOverrides,
    config: &Config,
    now: DateTime<Utc>,
) -> Result<Location> {
    if let Some(location) = resolve_explicit_location(overrides, read_env_coordinates, config)? {
        return Ok(location);
    }

    let cache_path = if config.cache_location() {
        cache::default_cache_path()
    } else {
        None
    };

    Ok(resolve_detected_location(
        cache_path.as_deref(),
        now,
        detect_coordinates_from_timezone,
    ))
}

/// Log detailed solar calculation information for a location.
pub fn log_solar_debug_info(location: &Location, daylight: &Daylight) {
    Log::log_pipe();
    Log::log_debug("Solar calculation details:");
    Log::log_indented(&format!(
        "Raw coordinates: {:.4}°, {:.4}°",
        location.latitude, location.longitude
    ));
    Log::log_indented(&format!("Location source: {}", location.source));

    match daylight {
        Daylight::Regular(times) => {
            Log::log_indented(&format!("    Sunrise UTC: {}", times.sunrise.format("%H:%M")));
            Log::log_indented(&format!("     Sunset UTC: {}", times.sunset.format("%H:%M")));
            Log::log_indented(&format!(
                "  Sunrise local: {}",
                times.sunrise.with_timezone(&Local).format("%H:%M")
            ));
            Log::log_indented(&format!(
                "   Sunset local: {}",
                times.sunset.with_timezone(&Local).format("%H:%M")
            ));
            Log::log_indented(&format!(
                "     Day length: {}",
                crate::utils::format_duration(times.day_length())
            ));
        }
        Daylight::AlwaysDay => Log::log_indented("Midnight sun: the sun does not set today"),
        Daylight::AlwaysNight => Log::log_indented("Polar night: the sun does not rise today"),
    }
}
