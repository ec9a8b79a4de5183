//! cli
//!
//! Command-line interface layer for metamap.
//!
//! # Responsibilities
//!
//! - Parse command-line arguments and global flags
//! - Install the tracing subscriber
//! - Delegate to command handlers
//!
//! # Architecture
//!
//! The CLI layer is thin. It parses arguments via clap, assembles a
//! [`MetadataService`](crate::service::MetadataService) from configuration,
//! and runs one operation against it.

pub mod args;
pub mod commands;
pub mod output;

pub use args::Cli;

use anyhow::Result;
use tracing_subscriber::EnvFilter;

/// Install the fmt subscriber on stderr.
///
/// `--debug` forces `debug` for this crate; otherwise `RUST_LOG` applies,
/// defaulting to `warn`.
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("metamap=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    // A subscriber may already be installed when embedded; keep it.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Run the CLI application.
///
/// This is the main entry point called from `main.rs`.
pub fn run() -> Result<()> {
    let cli = Cli::parse_args();
    init_tracing(cli.debug);

    let ctx = commands::Context {
        config: cli.config.clone(),
        quiet: cli.quiet,
    };

    commands::dispatch(cli.command, &ctx)
}
