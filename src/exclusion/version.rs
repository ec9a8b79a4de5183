//! exclusion::version
//!
//! Version-bounded properties.
//!
//! Bounds are inclusive: a property with `since = "1.0.0"` and
//! `until = "2.0.0"` is admitted for every version in `[1.0.0, 2.0.0]`.
//! Versions are parsed leniently: a leading `v` is dropped and missing
//! minor/patch components are filled with zero, so `"1"` reads as `1.0.0`.

use semver::Version;
use tracing::warn;

use super::{ExclusionKind, ExclusionStrategy, TraversalState};
use crate::mapping::{ClassMetadata, PropertyMetadata};

/// Parse a version, padding missing components.
///
/// # Example
///
/// ```
/// use metamap::exclusion::parse_version;
///
/// assert_eq!(parse_version("1.2").unwrap().to_string(), "1.2.0");
/// assert_eq!(parse_version("v2").unwrap().to_string(), "2.0.0");
/// assert!(parse_version("one").is_err());
/// ```
pub fn parse_version(input: &str) -> Result<Version, semver::Error> {
    let trimmed = input.trim();
    let trimmed = trimmed.strip_prefix('v').unwrap_or(trimmed);

    let split = trimmed.find(['-', '+']).unwrap_or(trimmed.len());
    let (core, rest) = trimmed.split_at(split);

    let padded = match core.matches('.').count() {
        0 => format!("{}.0.0{}", core, rest),
        1 => format!("{}.0{}", core, rest),
        _ => trimmed.to_string(),
    };

    Version::parse(&padded)
}

/// Excludes properties whose version bounds do not admit the active version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionExclusion {
    version: Version,
}

impl VersionExclusion {
    pub fn new(version: Version) -> Self {
        Self { version }
    }

    /// Parse the active version leniently.
    pub fn parse(version: &str) -> Result<Self, semver::Error> {
        parse_version(version).map(Self::new)
    }

    pub fn version(&self) -> &Version {
        &self.version
    }
}

/// Parse a property bound; unparsable bounds are ignored.
fn bound(property: &PropertyMetadata, raw: Option<&str>) -> Option<Version> {
    let raw = raw?;
    match parse_version(raw) {
        Ok(version) => Some(version),
        Err(e) => {
            warn!(property = property.name(), bound = raw, error = %e, "ignoring invalid version bound");
            None
        }
    }
}

impl ExclusionStrategy for VersionExclusion {
    fn should_exclude(
        &self,
        property: &PropertyMetadata,
        _class: &ClassMetadata,
        _state: &TraversalState,
    ) -> bool {
        if let Some(since) = bound(property, property.since_version()) {
            if self.version < since {
                return true;
            }
        }

        if let Some(until) = bound(property, property.until_version()) {
            if self.version > until {
                return true;
            }
        }

        false
    }

    fn kind(&self) -> ExclusionKind {
        ExclusionKind::Version
    }
}
