//! One scheduled run: sun times for today, the target appearance, and the
//! idempotent switch.
//!
//! Everything here takes the current time and the backend as arguments, so a
//! whole run can be exercised with a fixed clock and a fake backend.

use anyhow::Result;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};

use crate::backend::{AppearanceBackend, ApplyOutcome, apply_appearance};
use crate::config::Config;
use crate::geo::Location;
use crate::geo::solar::{Daylight, calculate_daylight};
use crate::time_state::{Appearance, ModePreference, resolve_target_appearance};

/// Settings that shape a run, merged from config and command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToggleSettings {
    pub preference: ModePreference,
    pub sunrise_offset: i64, // minutes
    pub sunset_offset: i64,  // minutes
    pub dry_run: bool,
}

impl Default for ToggleSettings {
    fn default() -> Self {
        Self {
            preference: ModePreference::Auto,
            sunrise_offset: 0,
            sunset_offset: 0,
            dry_run: false,
        }
    }
}

impl ToggleSettings {
    /// A `--mode` flag wins over the config file's `mode`.
    pub fn from_config(
        config: &Config,
        mode_override: Option<ModePreference>,
        dry_run: bool,
    ) -> Self {
        Self {
            preference: mode_override.unwrap_or_else(|| config.mode()),
            sunrise_offset: config.sunrise_offset(),
            sunset_offset: config.sunset_offset(),
            dry_run,
        }
    }
}

/// What a run intends to do, computed without touching the OS.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TogglePlan {
    /// The sun times governing `now`, offsets applied. Usually today's; the
    /// previous day's while its sunset is still ahead after local midnight.
    pub daylight: Daylight,
    pub target: Appearance,
    pub now: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToggleReport {
    pub plan: TogglePlan,
    pub outcome: ApplyOutcome,
}

/// Compute the governing sun times and the target appearance.
///
/// "Today" is the calendar date of `now` in its own time zone. Before today's
/// sunrise, yesterday's day is still running if its sunset (which can fall
/// after midnight at high latitudes) has not happened yet.
///
/// # Errors
/// A `ConfigurationError` when the location is out of range.
pub fn plan<Tz: TimeZone>(
    settings: &ToggleSettings,
    location: &Location,
    now: &DateTime<Tz>,
) -> Result<TogglePlan> {
    let tz = now.timezone();
    let daylight_on = |date: NaiveDate| -> Result<Daylight> {
        Ok(
            calculate_daylight(location.latitude, location.longitude, date, &tz)?
                .with_offsets(settings.sunrise_offset, settings.sunset_offset),
        )
    };

    let today = now.date_naive();
    let now = now.with_timezone(&Utc);
    let mut daylight = daylight_on(today)?;

    let before_sunrise = daylight.solar_times().is_some_and(|times| now < times.sunrise);
    if let Some(yesterday) = today.pred_opt().filter(|_| before_sunrise) {
        let previous = daylight_on(yesterday)?;
        if previous.solar_times().is_some_and(|times| now < times.sunset) {
            daylight = previous;
        }
    }

    let target = resolve_target_appearance(settings.preference, now, &daylight);

    Ok(TogglePlan {
        daylight,
        target,
        now,
    })
}

/// Plan the run, then bring the backend to the target appearance.
///
/// The backend is not touched when planning fails.
pub fn run_toggle<Tz: TimeZone>(
    settings: &ToggleSettings,
    location: &Location,
    now: &DateTime<Tz>,
    backend: &mut dyn AppearanceBackend,
) -> Result<ToggleReport> {
    let plan = plan(settings, location, now)?;
    let outcome = apply_appearance(backend, plan.target, settings.dry_run)?;
    Ok(ToggleReport { plan, outcome })
}
