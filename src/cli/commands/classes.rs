//! classes command - List classes declared in mapping documents

use anyhow::{Context as _, Result};

use super::Context;
use crate::cli::output;

/// Print each enumerable class on its own line.
pub fn classes(ctx: &Context) -> Result<()> {
    let service = ctx.load_service()?;
    let classes = service
        .known_classes()
        .context("Failed to list mapped classes")?;

    if classes.is_empty() {
        output::print("no mapped classes", ctx.verbosity());
        return Ok(());
    }

    for class in classes {
        println!("{}", class);
    }
    Ok(())
}
