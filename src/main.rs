use std::process::ExitCode;

// Module declarations
mod builder;
mod cli;
mod config;
mod content;
mod encoding;
mod layout;
mod search;
mod source;
mod toc;
mod utils;

fn main() -> ExitCode {
    // Run the CLI
    cli::run()
}
