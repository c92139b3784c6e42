//! Implementation of the --init command.
//!
//! Writes a commented default configuration file, pre-filled with coordinates
//! detected from the system time zone when detection succeeds.

use anyhow::Result;
use std::path::Path;

use crate::config::Config;
use crate::geo::detect_coordinates_from_timezone;
use crate::logger::Log;
use crate::utils::path_for_display;

/// Handle the --init command.
pub fn handle_init_command(config_path: Option<&Path>) -> Result<()> {
    Log::log_version();

    let path = match config_path {
        Some(path) => path.to_path_buf(),
        None => Config::get_config_path()?,
    };

    let coords = match detect_coordinates_from_timezone() {
        Ok(coords) => {
            Log::log_decorated(&format!("Detected location: {}", coords.2));
            Some(coords)
        }
        Err(e) => {
            Log::log_warning(&format!("Could not detect a location: {:#}", e));
            Log::log_indented("Leaving latitude/longitude unset");
            None
        }
    };

    write_config(&path, coords)?;
    Log::log_end();
    Ok(())
}

fn write_config(path: &Path, coords: Option<(f64, f64, String)>) -> Result<()> {
    Config::create_default_config(path, coords)?;
    Log::log_block_start(&format!("Wrote {}", path_for_display(path)));
    Ok(())
}
