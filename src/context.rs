//! context
//!
//! Runtime serialization options and their compilation into an exclusion
//! strategy.
//!
//! # Options
//!
//! [`ContextOptions`] carries the typed options (null handling, groups,
//! version, max depth) plus an open attribute map. The attribute named
//! [`CUSTOM_STRATEGIES`] holds caller-supplied strategies; every other
//! attribute passes through untouched into
//! [`SerializationContext::options`].
//!
//! # Compilation
//!
//! [`compile`] contributes at most one strategy per option, in order:
//! groups, version, max depth, then each custom strategy. One strategy is
//! returned as is, several are wrapped in a [`ChainExclusion`], none yields
//! [`NoExclusion`]. Malformed options fail here, at the boundary, rather than
//! during traversal.
//!
//! # Example
//!
//! ```
//! use metamap::context::{compile, ContextOptions};
//! use metamap::exclusion::{ExclusionKind, TraversalState};
//! use metamap::mapping::{ClassMetadata, PropertyMetadata};
//!
//! let options = ContextOptions::new().with_groups(["a"]);
//! let context = compile(&options).unwrap();
//! assert_eq!(context.exclusion().kind(), ExclusionKind::Groups);
//!
//! let class = ClassMetadata::new("M");
//! let hidden = PropertyMetadata::new("p").with_groups(["b"]);
//! assert!(context.should_exclude(&hidden, &class, &TraversalState::default()));
//! ```

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use crate::exclusion::{
    ChainExclusion, ExclusionStrategy, GroupsExclusion, MaxDepthExclusion, NoExclusion,
    TraversalState, VersionExclusion,
};
use crate::mapping::{ClassMetadata, PropertyMetadata};

/// Attribute holding caller-supplied exclusion strategies.
pub const CUSTOM_STRATEGIES: &str = "custom_strategies";

/// Errors from context compilation.
#[derive(Debug, Error)]
pub enum ContextError {
    /// An option has the wrong shape; the message names the option.
    #[error("{0}")]
    InvalidArgument(String),
}

/// Loosely-typed attribute value.
#[derive(Clone)]
pub enum ContextValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    List(Vec<ContextValue>),
    Strategy(Arc<dyn ExclusionStrategy>),
}

impl ContextValue {
    /// Name of the value's type, used in diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            ContextValue::Null => "null",
            ContextValue::Bool(_) => "bool",
            ContextValue::Int(_) => "int",
            ContextValue::Float(_) => "float",
            ContextValue::String(_) => "string",
            ContextValue::List(_) => "list",
            ContextValue::Strategy(_) => "ExclusionStrategy",
        }
    }
}

impl fmt::Debug for ContextValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContextValue::Null => f.write_str("Null"),
            ContextValue::Bool(v) => f.debug_tuple("Bool").field(v).finish(),
            ContextValue::Int(v) => f.debug_tuple("Int").field(v).finish(),
            ContextValue::Float(v) => f.debug_tuple("Float").field(v).finish(),
            ContextValue::String(v) => f.debug_tuple("String").field(v).finish(),
            ContextValue::List(v) => f.debug_tuple("List").field(v).finish(),
            ContextValue::Strategy(s) => f.debug_tuple("Strategy").field(&s.kind()).finish(),
        }
    }
}

/// Strategies compare by identity.
impl PartialEq for ContextValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (ContextValue::Null, ContextValue::Null) => true,
            (ContextValue::Bool(a), ContextValue::Bool(b)) => a == b,
            (ContextValue::Int(a), ContextValue::Int(b)) => a == b,
            (ContextValue::Float(a), ContextValue::Float(b)) => a == b,
            (ContextValue::String(a), ContextValue::String(b)) => a == b,
            (ContextValue::List(a), ContextValue::List(b)) => a == b,
            (ContextValue::Strategy(a), ContextValue::Strategy(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl From<bool> for ContextValue {
    fn from(v: bool) -> Self {
        ContextValue::Bool(v)
    }
}

impl From<i64> for ContextValue {
    fn from(v: i64) -> Self {
        ContextValue::Int(v)
    }
}

impl From<f64> for ContextValue {
    fn from(v: f64) -> Self {
        ContextValue::Float(v)
    }
}

impl From<&str> for ContextValue {
    fn from(v: &str) -> Self {
        ContextValue::String(v.to_string())
    }
}

impl From<String> for ContextValue {
    fn from(v: String) -> Self {
        ContextValue::String(v)
    }
}

impl From<Vec<ContextValue>> for ContextValue {
    fn from(v: Vec<ContextValue>) -> Self {
        ContextValue::List(v)
    }
}

impl From<Arc<dyn ExclusionStrategy>> for ContextValue {
    fn from(v: Arc<dyn ExclusionStrategy>) -> Self {
        ContextValue::Strategy(v)
    }
}

/// Max-depth option: off, on (per-property bounds), or on with a global limit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MaxDepthOption {
    #[default]
    Disabled,
    Enabled,
    Limit(u32),
}

/// Options supplied by the caller for one serialization run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContextOptions {
    /// `Some(true)` serializes null values; unset or `Some(false)` skips them.
    pub serialize_null: Option<bool>,
    pub groups: BTreeSet<String>,
    pub version: Option<String>,
    pub max_depth: MaxDepthOption,
    pub attributes: BTreeMap<String, ContextValue>,
}

impl ContextOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_serialize_null(mut self, serialize_null: bool) -> Self {
        self.serialize_null = Some(serialize_null);
        self
    }

    pub fn with_groups<I, S>(mut self, groups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.groups = groups.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn enable_max_depth(mut self) -> Self {
        self.max_depth = MaxDepthOption::Enabled;
        self
    }

    pub fn with_max_depth(mut self, limit: u32) -> Self {
        self.max_depth = MaxDepthOption::Limit(limit);
        self
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<ContextValue>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Set the [`CUSTOM_STRATEGIES`] attribute.
    pub fn with_custom_strategies(self, strategies: Vec<Arc<dyn ExclusionStrategy>>) -> Self {
        let list = strategies.into_iter().map(ContextValue::Strategy).collect();
        self.with_attribute(CUSTOM_STRATEGIES, ContextValue::List(list))
    }

    /// Shorthand for [`compile`].
    pub fn compile(&self) -> Result<SerializationContext, ContextError> {
        compile(self)
    }
}

/// Compiled options handed to the navigator.
#[derive(Debug, Clone)]
pub struct SerializationContext {
    exclusion: Arc<dyn ExclusionStrategy>,
    ignore_null: bool,
    options: BTreeMap<String, ContextValue>,
}

impl SerializationContext {
    pub fn exclusion(&self) -> &Arc<dyn ExclusionStrategy> {
        &self.exclusion
    }

    /// Whether null values are dropped from the output.
    ///
    /// Consulted by the navigator directly; not an exclusion strategy.
    pub fn is_null_ignored(&self) -> bool {
        self.ignore_null
    }

    /// Pass-through attributes.
    pub fn options(&self) -> &BTreeMap<String, ContextValue> {
        &self.options
    }

    pub fn should_exclude(
        &self,
        property: &PropertyMetadata,
        class: &ClassMetadata,
        state: &TraversalState,
    ) -> bool {
        self.exclusion.should_exclude(property, class, state)
    }
}

fn custom_strategies(value: &ContextValue) -> Result<Vec<Arc<dyn ExclusionStrategy>>, ContextError> {
    let ContextValue::List(items) = value else {
        return Err(ContextError::InvalidArgument(format!(
            "The \"{}\" context attribute must be a list of exclusion strategies.",
            CUSTOM_STRATEGIES
        )));
    };

    items
        .iter()
        .map(|item| match item {
            ContextValue::Strategy(strategy) => Ok(Arc::clone(strategy)),
            other => Err(ContextError::InvalidArgument(format!(
                "The \"{}\" context attribute must be a list of \"ExclusionStrategy\", got \"{}\".",
                CUSTOM_STRATEGIES,
                other.type_name()
            ))),
        })
        .collect()
}

/// Compile options into a [`SerializationContext`].
///
/// # Errors
///
/// `InvalidArgument` when the version does not parse, when the
/// [`CUSTOM_STRATEGIES`] attribute is not a list, or when one of its
/// elements is not a strategy.
pub fn compile(options: &ContextOptions) -> Result<SerializationContext, ContextError> {
    let mut strategies: Vec<Arc<dyn ExclusionStrategy>> = Vec::new();

    if !options.groups.is_empty() {
        strategies.push(Arc::new(GroupsExclusion::new(options.groups.iter().cloned())));
    }

    if let Some(version) = &options.version {
        let strategy = VersionExclusion::parse(version).map_err(|e| {
            ContextError::InvalidArgument(format!(
                "The \"version\" context option ({}) is not a valid version: {}.",
                version, e
            ))
        })?;
        strategies.push(Arc::new(strategy));
    }

    match options.max_depth {
        MaxDepthOption::Disabled => {}
        MaxDepthOption::Enabled => strategies.push(Arc::new(MaxDepthExclusion::new())),
        MaxDepthOption::Limit(limit) => {
            strategies.push(Arc::new(MaxDepthExclusion::with_limit(limit)))
        }
    }

    let mut passthrough = BTreeMap::new();
    for (name, value) in &options.attributes {
        if name == CUSTOM_STRATEGIES {
            strategies.extend(custom_strategies(value)?);
        } else {
            passthrough.insert(name.clone(), value.clone());
        }
    }

    let exclusion: Arc<dyn ExclusionStrategy> = match strategies.len() {
        0 => Arc::new(NoExclusion),
        1 => strategies.remove(0),
        _ => Arc::new(ChainExclusion::new(strategies)),
    };

    Ok(SerializationContext {
        exclusion,
        ignore_null: !options.serialize_null.unwrap_or(false),
        options: passthrough,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exclusion::ExclusionKind;

    fn admits(context: &SerializationContext, property: PropertyMetadata) -> bool {
        !context.should_exclude(&property, &ClassMetadata::new("M"), &TraversalState::default())
    }

    #[test]
    fn no_options_compile_to_no_exclusion() {
        let context = compile(&ContextOptions::new()).expect("compile");

        assert_eq!(context.exclusion().kind(), ExclusionKind::None);
        assert!(context.options().is_empty());
    }

    #[test]
    fn null_handling() {
        assert!(compile(&ContextOptions::new()).expect("default").is_null_ignored());
        assert!(compile(&ContextOptions::new().with_serialize_null(false))
            .expect("false")
            .is_null_ignored());
        assert!(!compile(&ContextOptions::new().with_serialize_null(true))
            .expect("true")
            .is_null_ignored());
    }

    #[test]
    fn groups_compile_to_groups_filter() {
        let context = compile(&ContextOptions::new().with_groups(["a"])).expect("compile");

        assert_eq!(context.exclusion().kind(), ExclusionKind::Groups);
        assert!(!admits(&context, PropertyMetadata::new("p").with_groups(["b"])));
        assert!(admits(&context, PropertyMetadata::new("p").with_groups(["a"])));
        assert!(admits(&context, PropertyMetadata::new("p")));
    }

    #[test]
    fn version_compiles_to_version_filter() {
        let context = compile(&ContextOptions::new().with_version("1.0.0")).expect("compile");
        assert_eq!(context.exclusion().kind(), ExclusionKind::Version);
    }

    #[test]
    fn invalid_version_is_invalid_argument() {
        let err = compile(&ContextOptions::new().with_version("latest")).unwrap_err();
        assert!(err.to_string().contains("\"version\""));
    }

    #[test]
    fn max_depth_variants() {
        let enabled = compile(&ContextOptions::new().enable_max_depth()).expect("enabled");
        assert_eq!(enabled.exclusion().kind(), ExclusionKind::MaxDepth);

        let limited = compile(&ContextOptions::new().with_max_depth(1)).expect("limited");
        assert_eq!(limited.exclusion().kind(), ExclusionKind::MaxDepth);
        assert!(limited.should_exclude(
            &PropertyMetadata::new("p"),
            &ClassMetadata::new("M"),
            &TraversalState::at_depth(2)
        ));
    }

    #[test]
    fn groups_and_version_chain_with_or_semantics() {
        let context = compile(&ContextOptions::new().with_groups(["a"]).with_version("1.0.0"))
            .expect("compile");
        assert_eq!(context.exclusion().kind(), ExclusionKind::Chain);

        let wrong_group = PropertyMetadata::new("p").with_groups(["b"]);
        let too_new = PropertyMetadata::new("p").with_groups(["a"]).with_since("2.0.0");
        let both_ok = PropertyMetadata::new("p").with_groups(["a"]).with_since("1.0.0");

        assert!(!admits(&context, wrong_group));
        assert!(!admits(&context, too_new));
        assert!(admits(&context, both_ok));
    }

    #[test]
    fn single_custom_strategy_is_returned_as_is() {
        let custom: Arc<dyn ExclusionStrategy> = Arc::new(NoExclusion);
        let context = compile(&ContextOptions::new().with_custom_strategies(vec![custom.clone()]))
            .expect("compile");

        assert!(Arc::ptr_eq(context.exclusion(), &custom));
    }

    #[test]
    fn several_custom_strategies_chain() {
        let context = compile(&ContextOptions::new().with_custom_strategies(vec![
            Arc::new(NoExclusion),
            Arc::new(NoExclusion),
        ]))
        .expect("compile");

        assert_eq!(context.exclusion().kind(), ExclusionKind::Chain);
    }

    #[test]
    fn empty_custom_list_contributes_nothing() {
        let context =
            compile(&ContextOptions::new().with_custom_strategies(Vec::new())).expect("compile");
        assert_eq!(context.exclusion().kind(), ExclusionKind::None);
    }

    #[test]
    fn custom_strategies_must_be_a_list() {
        let options = ContextOptions::new().with_attribute(CUSTOM_STRATEGIES, "not-a-list");
        let err = compile(&options).unwrap_err();

        assert_eq!(
            err.to_string(),
            "The \"custom_strategies\" context attribute must be a list of exclusion strategies."
        );
    }

    #[test]
    fn custom_strategy_elements_must_be_strategies() {
        let options = ContextOptions::new()
            .with_attribute(CUSTOM_STRATEGIES, vec![ContextValue::from("x")]);
        let err = compile(&options).unwrap_err();

        assert_eq!(
            err.to_string(),
            "The \"custom_strategies\" context attribute must be a list of \"ExclusionStrategy\", \
             got \"string\"."
        );
    }

    #[test]
    fn other_attributes_pass_through() {
        let options = ContextOptions::new()
            .with_attribute("foo", "bar")
            .with_custom_strategies(vec![Arc::new(NoExclusion)]);
        let context = compile(&options).expect("compile");

        let mut expected = BTreeMap::new();
        expected.insert("foo".to_string(), ContextValue::from("bar"));
        assert_eq!(context.options(), &expected);
    }

    #[test]
    fn options_compile_shorthand() {
        let context = ContextOptions::new().with_groups(["a"]).compile().expect("compile");
        assert_eq!(context.exclusion().kind(), ExclusionKind::Groups);
    }
}
