//! warmup command - Pre-populate the metadata cache

use std::path::PathBuf;

use anyhow::{Context as _, Result};

use super::Context;
use crate::cli::output;
use crate::config::CacheBackend;

/// Warm the cache for every enumerable class.
pub fn warmup(ctx: &Context, target: Option<PathBuf>, json: bool) -> Result<()> {
    let config = ctx.load_config()?;
    let service = ctx.build_service(&config)?;

    let target = match target {
        Some(target) => target,
        None => std::env::current_dir().context("Failed to determine current directory")?,
    };

    let Some(report) = service.warm_up(&target) else {
        output::print("metadata cache disabled, nothing to warm", ctx.verbosity());
        return Ok(());
    };

    // Each invocation is its own process, so memory entries die with it.
    if config.cache_backend() == CacheBackend::Memory {
        output::warn(
            "cache backend is \"memory\"; warmed entries are discarded when metamap exits \
             (set [cache] backend = \"file\" to keep them)",
            ctx.verbosity(),
        );
    }

    if json {
        println!("{}", output::to_json(&report).context("Failed to encode report")?);
    } else {
        print!("{}", output::render_report(&report));
    }

    Ok(())
}
