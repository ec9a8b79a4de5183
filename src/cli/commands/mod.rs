//! cli::commands
//!
//! Command dispatch and handlers.
//!
//! # Architecture
//!
//! Each command handler:
//! 1. Loads the configuration and assembles the metadata service
//! 2. Runs one operation against it
//! 3. Formats and displays output
//!
//! Configuration and mapping errors are fatal and surface through `anyhow`
//! with context. Warm-up failures are reported but never fail the command.

mod check;
mod classes;
mod inspect;
mod warmup;

pub use check::check;
pub use classes::classes;
pub use inspect::inspect;
pub use warmup::warmup;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context as _, Result};

use super::args::Command;
use super::output::{self, Verbosity};
use crate::config::{Config, ConfigLoadResult};
use crate::mapping::TypeRegistry;
use crate::service::MetadataService;

/// Flags shared by every command.
#[derive(Debug, Clone, Default)]
pub struct Context {
    /// Explicit config file
    pub config: Option<PathBuf>,
    /// Minimal output
    pub quiet: bool,
}

impl Context {
    pub fn verbosity(&self) -> Verbosity {
        Verbosity::from_quiet(self.quiet)
    }

    /// Load the config, printing any warnings.
    pub fn load_config(&self) -> Result<Config> {
        let ConfigLoadResult { config, warnings } =
            Config::load(self.config.as_deref()).context("Failed to load config")?;

        for warning in &warnings {
            output::warn(&warning.message, self.verbosity());
        }

        Ok(config)
    }

    /// Load the config and assemble the metadata service.
    ///
    /// The binary has no compiled-in types, so the reflection and annotation
    /// loaders see an empty registry; only mapping documents contribute.
    pub fn load_service(&self) -> Result<MetadataService> {
        let config = self.load_config()?;
        self.build_service(&config)
    }

    /// Assemble the metadata service from an already loaded config.
    pub fn build_service(&self, config: &Config) -> Result<MetadataService> {
        config
            .build(Arc::new(TypeRegistry::new()))
            .context("Failed to assemble class metadata loaders")
    }
}

/// Dispatch a parsed command to its handler.
pub fn dispatch(command: Command, ctx: &Context) -> Result<()> {
    match command {
        Command::Warmup { target, json } => warmup(ctx, target, json),
        Command::Inspect { class, json } => inspect(ctx, &class, json),
        Command::Classes => classes(ctx),
        Command::Check => check(ctx),
    }
}
