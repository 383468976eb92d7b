//! CLI definitions for ariaward.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// ariaward CLI.
#[derive(Parser)]
#[command(name = "ariaward")]
#[command(about = "Reversible accessibility enhancement engine")]
#[command(version)]
pub(crate) struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true, env = "ARIAWARD_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log level, used when RUST_LOG is not set
    #[arg(long, default_value = "info", global = true)]
    pub log_level: String,

    /// Also write daily rolling log files to this directory
    #[arg(long, global = true)]
    pub log_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Enhance a JSON document and print the result
    Run {
        /// Document file (a JSON element tree)
        #[arg(short, long)]
        document: PathBuf,

        /// Disable after enhancing and report whether rollback was exact
        #[arg(long)]
        disable_after: bool,

        /// Stop driving frames after this many
        #[arg(long, default_value_t = 600)]
        max_frames: u64,

        /// Enable regardless of the saved preference
        #[arg(long)]
        force: bool,
    },

    /// Flip the saved on/off preference
    Toggle,

    /// Show the saved preference and active rules
    Status {
        /// Output format (text, json)
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Load and validate the configuration
    CheckConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_run() {
        let cli = Cli::try_parse_from([
            "ariaward",
            "--log-level",
            "debug",
            "run",
            "--document",
            "page.json",
            "--disable-after",
        ])
        .unwrap();
        assert_eq!(cli.log_level, "debug");
        match cli.command {
            Commands::Run {
                document,
                disable_after,
                max_frames,
                force,
            } => {
                assert_eq!(document, PathBuf::from("page.json"));
                assert!(disable_after);
                assert_eq!(max_frames, 600);
                assert!(!force);
            }
            _ => panic!("expected run"),
        }
    }

    #[test]
    fn test_parse_status_json() {
        let cli = Cli::try_parse_from(["ariaward", "status", "--format", "json"]).unwrap();
        assert!(matches!(cli.command, Commands::Status { format } if format == "json"));
    }

    #[test]
    fn test_run_requires_document() {
        assert!(Cli::try_parse_from(["ariaward", "run"]).is_err());
    }
}
