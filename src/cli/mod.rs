pub mod types;
pub mod commands;
pub mod logging;

use std::process::ExitCode;

use clap::Parser;

/// Run the command-line interface
pub fn run() -> ExitCode {
    let cli = types::Cli::parse();

    // Initialize logging system
    logging::init_logging(cli.debug, cli.quiet);

    let result = match &cli.command {
        types::Commands::Convert { input, output, title, config, sequential } => {
            commands::handle_convert_command(input, output, title.as_deref(), config.as_deref(), *sequential)
        }
        types::Commands::Toc { input, json, config } => {
            commands::handle_toc_command(input, *json, config.as_deref())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
