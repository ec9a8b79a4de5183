//! exclusion
//!
//! Per-property exclusion strategies consulted during traversal.
//!
//! # Design
//!
//! An [`ExclusionStrategy`] answers one question: should this property of
//! this class be left out at the current traversal position? Built-in
//! strategies:
//!
//! - [`GroupsExclusion`] - property groups must intersect the active groups
//! - [`VersionExclusion`] - property `since`/`until` bounds must admit the version
//! - [`MaxDepthExclusion`] - traversal depth must not exceed the property's bound
//! - [`ChainExclusion`] - excludes when any child excludes
//! - [`NoExclusion`] - never excludes
//!
//! Strategies are built by [`crate::context::compile`] and shared behind
//! `Arc`, so they must be immutable and thread-safe.

mod chain;
mod groups;
mod max_depth;
mod version;

use std::fmt;

pub use chain::ChainExclusion;
pub use groups::GroupsExclusion;
pub use max_depth::MaxDepthExclusion;
pub use version::{parse_version, VersionExclusion};

use crate::mapping::{ClassMetadata, PropertyMetadata};

/// Strategy variant, for diagnostics and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExclusionKind {
    None,
    Groups,
    Version,
    MaxDepth,
    Chain,
    /// A strategy supplied by the caller.
    Custom,
}

/// Position of the navigator in the object graph.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TraversalState {
    /// Nesting depth of the object owning the property; the root is 0.
    pub depth: u32,
}

impl TraversalState {
    pub fn at_depth(depth: u32) -> Self {
        Self { depth }
    }
}

/// Decides whether a property is omitted.
pub trait ExclusionStrategy: Send + Sync + fmt::Debug {
    /// Returns `true` when `property` of `class` must be skipped.
    fn should_exclude(
        &self,
        property: &PropertyMetadata,
        class: &ClassMetadata,
        state: &TraversalState,
    ) -> bool;

    fn kind(&self) -> ExclusionKind {
        ExclusionKind::Custom
    }
}

/// Strategy that never excludes anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoExclusion;

impl ExclusionStrategy for NoExclusion {
    fn should_exclude(
        &self,
        _property: &PropertyMetadata,
        _class: &ClassMetadata,
        _state: &TraversalState,
    ) -> bool {
        false
    }

    fn kind(&self) -> ExclusionKind {
        ExclusionKind::None
    }
}
