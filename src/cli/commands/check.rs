//! check command - Validate configuration and mapping documents

use std::sync::Arc;

use anyhow::{Context as _, Result};

use super::Context;
use crate::cli::output;
use crate::mapping::{ClassMetadataFactory, MetadataFactory, TypeRegistry};

/// Assemble the service and resolve every mapped class once, uncached.
///
/// Mapping documents are parsed during assembly, so a malformed document
/// fails here with its path.
pub fn check(ctx: &Context) -> Result<()> {
    let config = ctx.load_config()?;
    let service = config
        .build(Arc::new(TypeRegistry::new()))
        .context("Failed to assemble class metadata loaders")?;

    let classes = service
        .known_classes()
        .context("Failed to list mapped classes")?;

    let factory = MetadataFactory::new(service.loader().as_ref().clone());
    for class in &classes {
        factory
            .class_metadata(class)
            .with_context(|| format!("Failed to resolve metadata for '{}'", class))?;
    }

    let source = config
        .loaded_from()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "defaults".to_string());

    output::print(
        format!(
            "ok: {} ({} loader(s), {} mapped class(es))",
            source,
            service.loader().len(),
            classes.len()
        ),
        ctx.verbosity(),
    );
    Ok(())
}
