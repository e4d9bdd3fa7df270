use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Main CLI parser structure
#[derive(Parser)]
#[command(name = "chmsite")]
#[command(about = "Convert compiled HTML help into a browsable static site", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose debugging
    #[arg(short = 'g', long, global = true, default_value_t = false)]
    pub debug: bool,

    /// Only report errors
    #[arg(short, long, global = true, default_value_t = false)]
    pub quiet: bool,
}

/// Subcommands for the CLI
#[derive(Subcommand)]
pub enum Commands {
    /// Convert a .chm archive or decompressed help tree into a site
    #[command(alias = "c")]
    Convert {
        /// .chm file or directory holding the decompressed help tree
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Directory the site is written to
        #[arg(value_name = "OUTPUT")]
        output: PathBuf,

        /// Site title (defaults to the first table-of-contents entry)
        #[arg(short, long, value_name = "TITLE")]
        title: Option<String>,

        /// Configuration file (.yml, .toml or .json)
        #[arg(short, long, value_name = "CONFIG_FILE")]
        config: Option<PathBuf>,

        /// Convert documents one at a time
        #[arg(long, default_value_t = false)]
        sequential: bool,
    },

    /// Print the table of contents of a help tree
    Toc {
        /// .chm file or directory holding the decompressed help tree
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Print the navigation tree as JSON
        #[arg(long, default_value_t = false)]
        json: bool,

        /// Configuration file (.yml, .toml or .json)
        #[arg(short, long, value_name = "CONFIG_FILE")]
        config: Option<PathBuf>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_convert() {
        let cli = Cli::parse_from([
            "chmsite", "convert", "help.chm", "site", "-t", "Manual", "--sequential", "-g",
        ]);
        assert!(cli.debug);
        match cli.command {
            Commands::Convert { input, output, title, config, sequential } => {
                assert_eq!(input, PathBuf::from("help.chm"));
                assert_eq!(output, PathBuf::from("site"));
                assert_eq!(title.as_deref(), Some("Manual"));
                assert!(config.is_none());
                assert!(sequential);
            }
            _ => panic!("expected convert"),
        }
    }

    #[test]
    fn test_parse_toc() {
        let cli = Cli::parse_from(["chmsite", "-q", "toc", "extracted", "--json"]);
        assert!(cli.quiet);
        assert!(matches!(cli.command, Commands::Toc { json: true, .. }));
    }

    #[test]
    fn test_missing_output_is_rejected() {
        assert!(Cli::try_parse_from(["chmsite", "convert", "help.chm"]).is_err());
    }
}
