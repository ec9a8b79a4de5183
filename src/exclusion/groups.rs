//! exclusion::groups

use std::collections::BTreeSet;

use super::{ExclusionKind, ExclusionStrategy, TraversalState};
use crate::mapping::{ClassMetadata, PropertyMetadata};

/// Admits properties sharing at least one group with the active set.
///
/// Properties without groups belong to the implicit default group and are
/// always admitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupsExclusion {
    groups: BTreeSet<String>,
}

impl GroupsExclusion {
    pub fn new<I, S>(groups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            groups: groups.into_iter().map(Into::into).collect(),
        }
    }

    pub fn groups(&self) -> &BTreeSet<String> {
        &self.groups
    }
}

impl ExclusionStrategy for GroupsExclusion {
    fn should_exclude(
        &self,
        property: &PropertyMetadata,
        _class: &ClassMetadata,
        _state: &TraversalState,
    ) -> bool {
        property.has_groups() && property.groups().is_disjoint(&self.groups)
    }

    fn kind(&self) -> ExclusionKind {
        ExclusionKind::Groups
    }
}
