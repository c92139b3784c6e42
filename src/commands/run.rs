//! Implementation of the default action: switch the appearance to match the sun.
//!
//! Intended to be run every few minutes by cron, launchd or a systemd timer.
//! Each run is independent; the run lock only keeps overlapping runs from
//! issuing conflicting switches.

use anyhow::Result;
use chrono::{Local, Utc};

use crate::args::RunOptions;
use crate::backend::{ApplyOutcome, create_backend, detect_backend};
use crate::config::Config;
use crate::geo::{self, Location};
use crate::lock;
use crate::logger::Log;
use crate::time_state::time_until_next_switch;
use crate::toggle::{ToggleReport, ToggleSettings, run_toggle};

/// Handle a normal run.
pub fn handle_run_command(options: &RunOptions) -> Result<()> {
    Log::log_version();

    let lock_path = lock::default_lock_path();
    let Some(_run_lock) = lock::try_acquire(&lock_path)? else {
        Log::log_info("Another auto-mode run is in progress, nothing to do");
        Log::log_end();
        return Ok(());
    };
    if options.debug_enabled {
        Log::log_debug(&format!("Lock acquired: {}", lock_path.display()));
    }

    let config = Config::load(options.config_path.as_deref())?;
    config.log_config();

    let now = Local::now();
    let location = geo::resolve_location(&options.location, &config, now.with_timezone(&Utc))?;
    log_location(&location);

    let settings = ToggleSettings::from_config(&config, options.mode, options.dry_run);

    let backend_type = detect_backend(config.backend())?;
    let mut backend = create_backend(backend_type);
    Log::log_block_start(&format!("Using {} backend", backend_type.name()));

    let report = run_toggle(&settings, &location, &now, backend.as_mut())?;

    if options.debug_enabled {
        geo::log_solar_debug_info(&location, &report.plan.daylight);
    }
    log_report(&report);
    Log::log_end();

    Ok(())
}

fn log_location(location: &Location) {
    Log::log_block_start(&format!("Location: {}", location.describe()));
    Log::log_indented(&format!("Source: {}", location.source));
}

fn log_report(report: &ToggleReport) {
    match report.outcome {
        ApplyOutcome::Unchanged(current) => {
            Log::log_block_start(&format!("Already in {} mode", current));
        }
        ApplyOutcome::Changed { from, to } => {
            Log::log_block_start(&format!("Switched from {} to {} mode", from, to));
        }
        ApplyOutcome::WouldChange { from, to } => {
            Log::log_block_start(&format!("Dry run: would switch from {} to {} mode", from, to));
        }
    }

    if let Some(remaining) = time_until_next_switch(report.plan.now, &report.plan.daylight) {
        Log::log_indented(&format!(
            "Next switch in {}",
            crate::utils::format_duration(remaining)
        ));
    }
}
