//! exclusion::chain

use std::sync::Arc;

use super::{ExclusionKind, ExclusionStrategy, TraversalState};
use crate::mapping::{ClassMetadata, PropertyMetadata};

/// Excludes a property when any child strategy excludes it.
///
/// A property is admitted only if every child admits it.
#[derive(Debug, Clone, Default)]
pub struct ChainExclusion {
    strategies: Vec<Arc<dyn ExclusionStrategy>>,
}

impl ChainExclusion {
    pub fn new(strategies: Vec<Arc<dyn ExclusionStrategy>>) -> Self {
        Self { strategies }
    }

    pub fn strategies(&self) -> &[Arc<dyn ExclusionStrategy>] {
        &self.strategies
    }
}

impl ExclusionStrategy for ChainExclusion {
    fn should_exclude(
        &self,
        property: &PropertyMetadata,
        class: &ClassMetadata,
        state: &TraversalState,
    ) -> bool {
        self.strategies
            .iter()
            .any(|s| s.should_exclude(property, class, state))
    }

    fn kind(&self) -> ExclusionKind {
        ExclusionKind::Chain
    }
}
