//! Command-line argument parsing and processing.
//!
//! This module handles parsing of command-line arguments and provides a clean
//! interface for the main application logic. It supports the standard help,
//! version, and debug flags plus the location and mode overrides, and turns any
//! unknown or malformed option into a help-with-error action.

use std::path::PathBuf;

use crate::geo::LocationOverrides;
use crate::logger::Log;
use crate::time_state::ModePreference;

/// Options shared by a normal run and `--status`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunOptions {
    pub debug_enabled: bool,
    pub quiet: bool,
    pub dry_run: bool,
    pub config_path: Option<PathBuf>,
    pub mode: Option<ModePreference>,
    pub location: LocationOverrides,
}

/// Represents the parsed command-line arguments and their intended actions.
#[derive(Debug, PartialEq)]
pub enum CliAction {
    /// Compute the target appearance and apply it
    Run(RunOptions),
    /// Print location, sun times and the target appearance without OS calls
    Status(RunOptions),
    /// Write a default configuration file and exit
    Init {
        config_path: Option<PathBuf>,
        quiet: bool,
    },
    /// Display help information and exit
    ShowHelp,
    /// Display version information and exit
    ShowVersion,
    /// Show help due to unknown or invalid arguments and exit
    ShowHelpDueToError,
}

/// Result of parsing command-line arguments.
pub struct ParsedArgs {
    pub action: CliAction,
}

impl ParsedArgs {
    /// Parse command-line arguments into a structured result.
    ///
    /// # Arguments
    /// * `args` - Iterator over command-line arguments (typically from std::env::args())
    ///
    /// # Returns
    /// ParsedArgs containing the determined action
    pub fn parse<I, S>(args: I) -> ParsedArgs
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut options = RunOptions::default();
        let mut display_help = false;
        let mut display_version = false;
        let mut show_status = false;
        let mut run_init = false;
        let mut invalid_arg_found = false;

        // Split `--flag=value` so both spellings take the same path
        let args_vec: Vec<String> = args
            .into_iter()
            .skip(1)
            .flat_map(|s| {
                let s = s.as_ref();
                match s.split_once('=') {
                    Some((flag, value)) if flag.starts_with("--") => {
                        vec![flag.to_string(), value.to_string()]
                    }
                    _ => vec![s.to_string()],
                }
            })
            .collect();

        let mut i = 0;
        while i < args_vec.len() {
            let arg_str = args_vec[i].as_str();
            match arg_str {
                "--help" | "-h" => display_help = true,
                "--version" | "-V" | "-v" => display_version = true,
                "--debug" | "-d" => options.debug_enabled = true,
                "--quiet" | "-q" => options.quiet = true,
                "--dry-run" | "-n" => options.dry_run = true,
                "--status" | "-s" => show_status = true,
                "--init" => run_init = true,
                "--config" | "-c" | "--latitude" | "--longitude" | "--city" | "--mode" | "-m" => {
                    let Some(value) = args_vec.get(i + 1) else {
                        Log::log_warning(&format!("Missing value for {}", arg_str));
                        invalid_arg_found = true;
                        i += 1;
                        continue;
                    };
                    if !apply_value(&mut options, arg_str, value) {
                        invalid_arg_found = true;
                    }
                    i += 1; // Skip the value
                }
                _ => {
                    // Non-option arguments are ignored
                    if arg_str.starts_with('-') {
                        Log::log_warning(&format!("Unknown option: {}", arg_str));
                        invalid_arg_found = true;
                    }
                }
            }
            i += 1;
        }

        // Determine the action based on parsed flags
        let action = if display_version {
            CliAction::ShowVersion
        } else if invalid_arg_found {
            CliAction::ShowHelpDueToError
        } else if display_help {
            CliAction::ShowHelp
        } else if run_init {
            CliAction::Init {
                config_path: options.config_path,
                quiet: options.quiet,
            }
        } else if show_status {
            CliAction::Status(options)
        } else {
            CliAction::Run(options)
        };

        ParsedArgs { action }
    }

    /// Convenience method to parse from std::env::args()
    pub fn from_env() -> ParsedArgs {
        Self::parse(std::env::args())
    }
}

/// Store the value of an option that takes one. Returns false if it is invalid.
fn apply_value(options: &mut RunOptions, flag: &str, value: &str) -> bool {
    match flag {
        "--config" | "-c" => options.config_path = Some(PathBuf::from(value)),
        "--city" => {
            if value.trim().is_empty() {
                Log::log_warning("--city needs a city name");
                return false;
            }
            options.location.city = Some(value.to_string());
        }
        "--mode" | "-m" => match value.parse::<ModePreference>() {
            Ok(mode) => options.mode = Some(mode),
            Err(_) => {
                Log::log_warning(&format!(
                    "Invalid mode: {} (expected auto, light or dark)",
                    value
                ));
                return false;
            }
        },
        "--latitude" | "--longitude" => match value.trim().parse::<f64>() {
            Ok(degrees) if degrees.is_finite() => {
                if flag == "--latitude" {
                    options.location.latitude = Some(degrees);
                } else {
                    options.location.longitude = Some(degrees);
                }
            }
            _ => {
                Log::log_warning(&format!("Invalid {} value: {}", &flag[2..], value));
                return false;
            }
        },
        _ => return false,
    }
    true
}

/// Displays version information using custom logging style.
pub fn display_version_info() {
    Log::log_version();
    Log::log_pipe();
    println!("┗ {}", env!("CARGO_PKG_DESCRIPTION"));
}

/// Displays custom help message using logger methods.
pub fn display_help() {
    Log::log_version();
    Log::log_block_start(env!("CARGO_PKG_DESCRIPTION"));
    Log::log_block_start("Usage: auto-mode [OPTIONS]");
    Log::log_block_start("Options:");
    Log::log_indented("-c, --config <path>        Use a specific configuration file");
    Log::log_indented("    --latitude <deg>       Override latitude (requires --longitude)");
    Log::log_indented("    --longitude <deg>      Override longitude (requires --latitude)");
    Log::log_indented("    --city <name>          Look up coordinates for a city");
    Log::log_indented("-m, --mode <auto|light|dark>  Force an appearance");
    Log::log_indented("-n, --dry-run              Show what would change without changing it");
    Log::log_indented("-s, --status               Print location, sun times and target mode");
    Log::log_indented("    --init                 Write a default configuration file");
    Log::log_indented("-q, --quiet                Only print errors (for cron)");
    Log::log_indented("-d, --debug                Enable detailed debug output");
    Log::log_indented("-h, --help                 Print help information");
    Log::log_indented("-V, --version              Print version information");
    Log::log_block_start("Environment:");
    Log::log_indented("AUTO_MODE_LATITUDE, AUTO_MODE_LONGITUDE  Location override");
    Log::log_end();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_options(action: CliAction) -> RunOptions {
        match action {
            CliAction::Run(options) => options,
            other => panic!("expected Run, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_no_args() {
        let args = vec!["auto-mode"];
        let parsed = ParsedArgs::parse(args);
        assert_eq!(parsed.action, CliAction::Run(RunOptions::default()));
    }

    #[test]
    fn test_parse_debug_flag() {
        let parsed = ParsedArgs::parse(vec!["auto-mode", "--debug"]);
        assert!(run_options(parsed.action).debug_enabled);

        let parsed = ParsedArgs::parse(vec!["auto-mode", "-d"]);
        assert!(run_options(parsed.action).debug_enabled);
    }

    #[test]
    fn test_parse_help_flag() {
        assert_eq!(ParsedArgs::parse(vec!["auto-mode", "--help"]).action, CliAction::ShowHelp);
        assert_eq!(ParsedArgs::parse(vec!["auto-mode", "-h"]).action, CliAction::ShowHelp);
    }

    #[test]
    fn test_parse_version_short_flags() {
        for flag in ["--version", "-V", "-v"] {
            let parsed = ParsedArgs::parse(vec!["auto-mode", flag]);
            assert_eq!(parsed.action, CliAction::ShowVersion);
        }
    }

    #[test]
    fn test_version_takes_precedence() {
        let args = vec!["auto-mode", "--version", "--help", "--debug"];
        let parsed = ParsedArgs::parse(args);
        assert_eq!(parsed.action, CliAction::ShowVersion);
    }

    #[test]
    fn test_parse_unknown_flag() {
        let parsed = ParsedArgs::parse(vec!["auto-mode", "--unknown"]);
        assert_eq!(parsed.action, CliAction::ShowHelpDueToError);
    }

    #[test]
    fn test_parse_mixed_valid_and_invalid() {
        let parsed = ParsedArgs::parse(vec!["auto-mode", "--debug", "--invalid", "--help"]);
        assert_eq!(parsed.action, CliAction::ShowHelpDueToError);
    }

    #[test]
    fn test_parse_location_overrides() {
        let args = vec!["auto-mode", "--latitude", "51.5", "--longitude", "-0.12"];
        let options = run_options(ParsedArgs::parse(args).action);
        assert_eq!(options.location.latitude, Some(51.5));
        assert_eq!(options.location.longitude, Some(-0.12));
    }

    #[test]
    fn test_parse_equals_syntax() {
        let args = vec!["auto-mode", "--latitude=40.7", "--longitude=-74.0", "--mode=dark"];
        let options = run_options(ParsedArgs::parse(args).action);
        assert_eq!(options.location.latitude, Some(40.7));
        assert_eq!(options.location.longitude, Some(-74.0));
        assert_eq!(options.mode, Some(ModePreference::Dark));
    }

    #[test]
    fn test_parse_invalid_number() {
        let parsed = ParsedArgs::parse(vec!["auto-mode", "--latitude", "north"]);
        assert_eq!(parsed.action, CliAction::ShowHelpDueToError);

        let parsed = ParsedArgs::parse(vec!["auto-mode", "--latitude", "NaN"]);
        assert_eq!(parsed.action, CliAction::ShowHelpDueToError);
    }

    #[test]
    fn test_parse_missing_value() {
        let parsed = ParsedArgs::parse(vec!["auto-mode", "--city"]);
        assert_eq!(parsed.action, CliAction::ShowHelpDueToError);
    }

    #[test]
    fn test_parse_mode() {
        let options = run_options(ParsedArgs::parse(vec!["auto-mode", "-m", "light"]).action);
        assert_eq!(options.mode, Some(ModePreference::Light));

        let parsed = ParsedArgs::parse(vec!["auto-mode", "--mode", "sepia"]);
        assert_eq!(parsed.action, CliAction::ShowHelpDueToError);
    }

    #[test]
    fn test_parse_city_and_config() {
        let args = vec!["auto-mode", "--city", "New York", "-c", "/tmp/auto.toml", "-q", "-n"];
        let options = run_options(ParsedArgs::parse(args).action);
        assert_eq!(options.location.city.as_deref(), Some("New York"));
        assert_eq!(options.config_path, Some(PathBuf::from("/tmp/auto.toml")));
        assert!(options.quiet);
        assert!(options.dry_run);
    }

    #[test]
    fn test_parse_status() {
        let parsed = ParsedArgs::parse(vec!["auto-mode", "--status", "--city", "Tokyo"]);
        match parsed.action {
            CliAction::Status(options) => {
                assert_eq!(options.location.city.as_deref(), Some("Tokyo"))
            }
            other => panic!("expected Status, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_init() {
        let parsed = ParsedArgs::parse(vec!["auto-mode", "--init", "--config", "/tmp/a.toml"]);
        assert_eq!(
            parsed.action,
            CliAction::Init {
                config_path: Some(PathBuf::from("/tmp/a.toml")),
                quiet: false,
            }
        );
    }

    #[test]
    fn test_non_option_arguments_ignored() {
        let parsed = ParsedArgs::parse(vec!["auto-mode", "extra"]);
        assert_eq!(parsed.action, CliAction::Run(RunOptions::default()));
    }
}
