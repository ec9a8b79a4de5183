//! inspect command - Show resolved metadata for one class

use anyhow::{Context as _, Result};

use super::Context;
use crate::cli::output;

/// Resolve and print metadata for `class`.
pub fn inspect(ctx: &Context, class: &str, json: bool) -> Result<()> {
    let service = ctx.load_service()?;

    let metadata = service
        .class_metadata(class)
        .with_context(|| format!("Failed to resolve metadata for '{}'", class))?;

    if json {
        println!(
            "{}",
            output::to_json(metadata.as_ref()).context("Failed to encode metadata")?
        );
    } else {
        print!("{}", output::render_metadata(&metadata));
    }

    Ok(())
}
