//! Time-based appearance decisions.
//!
//! This module turns a day's solar times and the current instant into the
//! appearance the system should have. It is pure: nothing here reads the
//! clock or touches the OS, which keeps the day/night logic testable for
//! arbitrary dates and locations.

use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

use crate::error::AutoModeError;
use crate::geo::solar::Daylight;

/// System appearance mode.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum Appearance {
    Light,
    Dark,
}

impl Appearance {
    pub fn as_str(&self) -> &'static str {
        match self {
            Appearance::Light => "light",
            Appearance::Dark => "dark",
        }
    }

    pub fn is_dark(&self) -> bool {
        matches!(self, Appearance::Dark)
    }
}

impl fmt::Display for Appearance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether to follow the sun or pin one appearance.
#[derive(Debug, Deserialize, PartialEq, Eq, Copy, Clone)]
#[serde(rename_all = "lowercase")]
pub enum ModePreference {
    Auto,
    Light,
    Dark,
}

impl ModePreference {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModePreference::Auto => "auto",
            ModePreference::Light => "light",
            ModePreference::Dark => "dark",
        }
    }
}

impl FromStr for ModePreference {
    type Err = AutoModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(ModePreference::Auto),
            "light" => Ok(ModePreference::Light),
            "dark" => Ok(ModePreference::Dark),
            other => Err(AutoModeError::configuration(format!(
                "Mode must be 'auto', 'light' or 'dark' (got '{}')",
                other
            ))),
        }
    }
}

/// Decide the appearance for `now` given the day's solar times.
///
/// Dark before sunrise and from sunset onwards, Light in between. Polar days
/// are always Light and polar nights always Dark.
pub fn decide_appearance(now: DateTime<Utc>, daylight: &Daylight) -> Appearance {
    match daylight {
        Daylight::Regular(times) => {
            if now < times.sunrise || now >= times.sunset {
                Appearance::Dark
            } else {
                Appearance::Light
            }
        }
        Daylight::AlwaysDay => Appearance::Light,
        Daylight::AlwaysNight => Appearance::Dark,
    }
}

/// Apply a forced mode on top of the solar decision.
pub fn resolve_target_appearance(
    preference: ModePreference,
    now: DateTime<Utc>,
    daylight: &Daylight,
) -> Appearance {
    match preference {
        ModePreference::Light => Appearance::Light,
        ModePreference::Dark => Appearance::Dark,
        ModePreference::Auto => decide_appearance(now, daylight),
    }
}

/// Time remaining until the next switch on the same day, if there is one.
///
/// Returns `None` on polar days/nights and after sunset.
pub fn time_until_next_switch(now: DateTime<Utc>, daylight: &Daylight) -> Option<Duration> {
    match daylight {
        Daylight::Regular(times) if now < times.sunrise => Some(times.sunrise - now),
        Daylight::Regular(times) if now < times.sunset => Some(times.sunset - now),
        _ => None,
    }
}
