//! Implementation of the --status command.
//!
//! Prints the resolved location, today's sun times and the appearance a run
//! would choose. It never reads or changes the system appearance.

use anyhow::Result;
use chrono::{DateTime, Local, TimeZone, Utc};

use crate::args::RunOptions;
use crate::config::Config;
use crate::geo::solar::Daylight;
use crate::geo::{self, Location};
use crate::logger::Log;
use crate::time_state::{ModePreference, time_until_next_switch};
use crate::toggle::{ToggleSettings, TogglePlan, plan};
use crate::utils::format_duration;

/// Handle the --status command.
pub fn handle_status_command(options: &RunOptions) -> Result<()> {
    Log::log_version();

    let config = Config::load(options.config_path.as_deref())?;
    let now = Local::now();
    let location = geo::resolve_location(&options.location, &config, now.with_timezone(&Utc))?;
    let settings = ToggleSettings::from_config(&config, options.mode, false);

    let plan = plan(&settings, &location, &now)?;

    if options.debug_enabled {
        geo::log_solar_debug_info(&location, &plan.daylight);
    }

    for line in status_lines(&location, &settings, &plan, &Local) {
        Log::log_decorated(&line);
    }
    Log::log_end();

    Ok(())
}

/// Build the status report. Times are shown in `tz`.
pub fn status_lines<Tz: TimeZone>(
    location: &Location,
    settings: &ToggleSettings,
    plan: &TogglePlan,
    tz: &Tz,
) -> Vec<String>
where
    Tz::Offset: std::fmt::Display,
{
    let format_time =
        |instant: DateTime<Utc>| instant.with_timezone(tz).format("%H:%M").to_string();

    let mut lines = vec![format!(
        "Location: {} [{}]",
        location.describe(),
        location.source
    )];

    match &plan.daylight {
        Daylight::Regular(times) => {
            lines.push(format!("Sunrise: {}", format_time(times.sunrise)));
            lines.push(format!("Sunset: {}", format_time(times.sunset)));
        }
        Daylight::AlwaysDay => lines.push("Midnight sun: the sun does not set today".to_string()),
        Daylight::AlwaysNight => lines.push("Polar night: the sun does not rise today".to_string()),
    }

    if settings.sunrise_offset != 0 || settings.sunset_offset != 0 {
        lines.push(format!(
            "Offsets: sunrise {:+} min, sunset {:+} min (included above)",
            settings.sunrise_offset, settings.sunset_offset
        ));
    }

    let mode_note = match settings.preference {
        ModePreference::Auto => "",
        _ => " (forced)",
    };
    lines.push(format!("Target appearance: {}{}", plan.target, mode_note));

    if settings.preference == ModePreference::Auto {
        if let Some(remaining) = time_until_next_switch(plan.now, &plan.daylight) {
            lines.push(format!("Next switch in {}", format_duration(remaining)));
        }
    }

    lines
}
