use auto_mode::args::{CliAction, ParsedArgs, display_help, display_version_info};
use auto_mode::commands;
use auto_mode::constants::*;
use auto_mode::error::exit_code_for;
use auto_mode::logger::Log;

fn main() {
    let parsed_args = ParsedArgs::from_env();

    let result = match parsed_args.action {
        CliAction::ShowVersion => {
            display_version_info();
            Ok(())
        }
        CliAction::ShowHelp => {
            display_help();
            Ok(())
        }
        CliAction::ShowHelpDueToError => {
            display_help();
            std::process::exit(EXIT_CONFIGURATION_ERROR);
        }
        CliAction::Init { config_path, quiet } => {
            Log::set_enabled(!quiet);
            commands::init::handle_init_command(config_path.as_deref())
        }
        CliAction::Status(options) => {
            Log::set_enabled(!options.quiet);
            commands::status::handle_status_command(&options)
        }
        CliAction::Run(options) => {
            Log::set_enabled(!options.quiet);
            commands::run::handle_run_command(&options)
        }
    };

    if let Err(e) = result {
        Log::log_error(&format!("{:#}", e));
        std::process::exit(exit_code_for(&e));
    }

    std::process::exit(EXIT_SUCCESS);
}
