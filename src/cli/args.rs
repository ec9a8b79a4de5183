//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Global Flags
//!
//! These flags are available on all commands:
//! - `--help` / `-h`: Show help
//! - `--version`: Show version
//! - `--config <path>`: Use this config file instead of searching
//! - `--debug`: Enable debug logging
//! - `--quiet` / `-q`: Minimal output

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// metamap - Serializer class metadata registry and cache
#[derive(Parser, Debug)]
#[command(name = "metamap")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file (default: $METAMAP_CONFIG, then ./serializer.toml)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Pre-populate the metadata cache for every enumerable class
    #[command(
        name = "warmup",
        long_about = "Pre-populate the metadata cache for every enumerable class.\n\n\
            Classes declared in mapping files and directories are resolved once \
            through the cached factory. Classes only known through registered \
            types cannot be enumerated and are resolved lazily instead.\n\n\
            Warm-up never fails: per-class errors are reported and skipped.",
        after_help = "\
EXAMPLES:
    # Warm using ./serializer.toml
    metamap warmup

    # Warm a persistent cache for a release build
    metamap --config deploy/serializer.toml warmup --target target/release"
    )]
    Warmup {
        /// Build output directory to warm for
        #[arg(long, value_name = "DIR")]
        target: Option<PathBuf>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the resolved metadata for one class
    Inspect {
        /// Class identity, e.g. acme::model::Model
        class: String,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// List classes the mapping files declare
    Classes,

    /// Validate configuration and mapping documents
    Check,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["metamap", "classes", "--debug", "--config", "a.toml"])
            .expect("parse");
        assert!(cli.debug);
        assert_eq!(cli.config, Some(PathBuf::from("a.toml")));
        assert!(matches!(cli.command, Command::Classes));
    }

    #[test]
    fn inspect_requires_class() {
        assert!(Cli::try_parse_from(["metamap", "inspect"]).is_err());

        let cli = Cli::try_parse_from(["metamap", "inspect", "acme::Model", "--json"])
            .expect("parse");
        match cli.command {
            Command::Inspect { class, json } => {
                assert_eq!(class, "acme::Model");
                assert!(json);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn warmup_target() {
        let cli = Cli::try_parse_from(["metamap", "warmup", "--target", "out"]).expect("parse");
        match cli.command {
            Command::Warmup { target, json } => {
                assert_eq!(target, Some(PathBuf::from("out")));
                assert!(!json);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
