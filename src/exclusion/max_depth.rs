//! exclusion::max_depth

use super::{ExclusionKind, ExclusionStrategy, TraversalState};
use crate::mapping::{ClassMetadata, PropertyMetadata};

/// Excludes properties once traversal goes deeper than allowed.
///
/// A property's own `max_depth` always applies. An optional global limit
/// additionally excludes every property below that depth.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MaxDepthExclusion {
    limit: Option<u32>,
}

impl MaxDepthExclusion {
    /// Honour per-property bounds only.
    pub fn new() -> Self {
        Self::default()
    }

    /// Also exclude everything deeper than `limit`.
    pub fn with_limit(limit: u32) -> Self {
        Self { limit: Some(limit) }
    }

    pub fn limit(&self) -> Option<u32> {
        self.limit
    }
}

impl ExclusionStrategy for MaxDepthExclusion {
    fn should_exclude(
        &self,
        property: &PropertyMetadata,
        _class: &ClassMetadata,
        state: &TraversalState,
    ) -> bool {
        let exceeds = |bound: Option<u32>| bound.is_some_and(|max| state.depth > max);
        exceeds(property.max_depth()) || exceeds(self.limit)
    }

    fn kind(&self) -> ExclusionKind {
        ExclusionKind::MaxDepth
    }
}
