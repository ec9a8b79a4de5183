//! Property-based tests for merging and cache keys.
//!
//! These tests use proptest to verify invariants hold across
//! randomly generated inputs.

use proptest::prelude::*;

use metamap::cache::{cache_key, is_key_char, validate_key};
use metamap::exclusion::parse_version;
use metamap::mapping::{ClassMetadata, PropertyMetadata};

/// Strategy for generating property names.
fn property_name() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,8}"
}

/// Strategy for optional short strings.
fn maybe_text() -> impl Strategy<Value = Option<String>> {
    prop::option::of("[a-z]{1,6}")
}

/// Strategy for partially-populated properties.
fn property(name: String) -> impl Strategy<Value = PropertyMetadata> {
    (
        maybe_text(),
        maybe_text(),
        prop::option::of(any::<bool>()),
        prop::option::of(0u32..5),
        prop::collection::btree_set("[a-z]{1,4}", 0..3),
    )
        .prop_map(move |(alias, type_hint, readable, depth, groups)| {
            let mut p = PropertyMetadata::new(name.clone());
            if let Some(alias) = alias {
                p = p.with_alias(alias);
            }
            if let Some(type_hint) = type_hint {
                p = p.with_type(type_hint);
            }
            if let Some(readable) = readable {
                p = p.with_readable(readable);
            }
            if let Some(depth) = depth {
                p = p.with_max_depth(depth);
            }
            p.with_groups(groups)
        })
}

/// Strategy for class records with distinct property names.
fn class_metadata() -> impl Strategy<Value = ClassMetadata> {
    prop::collection::btree_set(property_name(), 0..5)
        .prop_flat_map(|names| {
            names
                .into_iter()
                .map(property)
                .collect::<Vec<_>>()
        })
        .prop_map(|properties| {
            properties
                .into_iter()
                .fold(ClassMetadata::new("acme::Model"), |m, p| m.with_property(p))
        })
}

proptest! {
    /// Every value set on the earlier record survives a merge.
    #[test]
    fn merge_keeps_earlier_values(base in class_metadata(), later in class_metadata()) {
        let mut merged = base.clone();
        merged.merge(&later);

        for property in base.properties() {
            let merged_property = merged.property(property.name()).expect("kept");
            if property.alias().is_some() {
                prop_assert_eq!(merged_property.alias(), property.alias());
            }
            if property.type_hint().is_some() {
                prop_assert_eq!(merged_property.type_hint(), property.type_hint());
            }
            if property.max_depth().is_some() {
                prop_assert_eq!(merged_property.max_depth(), property.max_depth());
            }
            if !property.groups().is_empty() {
                prop_assert_eq!(merged_property.groups(), property.groups());
            }
        }
    }

    /// Merged properties are the union, earlier order first.
    #[test]
    fn merge_is_ordered_union(base in class_metadata(), later in class_metadata()) {
        let mut merged = base.clone();
        merged.merge(&later);

        let mut expected: Vec<&str> = base.properties().iter().map(|p| p.name()).collect();
        for p in later.properties() {
            if !expected.contains(&p.name()) {
                expected.push(p.name());
            }
        }

        let actual: Vec<&str> = merged.properties().iter().map(|p| p.name()).collect();
        prop_assert_eq!(actual, expected);
    }

    /// Merging a record into itself changes nothing.
    #[test]
    fn merge_with_self_is_identity(base in class_metadata()) {
        let mut merged = base.clone();
        merged.merge(&base);
        prop_assert_eq!(merged, base);
    }

    /// Any class name normalises to a valid key.
    #[test]
    fn cache_key_always_valid(class in "\\PC{1,40}", prefix in prop::option::of("[A-Za-z0-9_.]{1,10}")) {
        let key = cache_key(prefix.as_deref(), &class);
        prop_assert!(key.chars().all(is_key_char));
        prop_assert!(validate_key(&key).is_ok());
    }

    /// Normalisation is idempotent for names already in the key space.
    #[test]
    fn cache_key_preserves_valid_names(class in "[A-Za-z0-9_.]{1,40}") {
        prop_assert_eq!(cache_key(None, &class), class);
    }

    /// Numeric versions with one to three components always parse.
    #[test]
    fn lenient_versions_parse(parts in prop::collection::vec(0u64..1000, 1..=3)) {
        let raw = parts.iter().map(u64::to_string).collect::<Vec<_>>().join(".");
        let version = parse_version(&raw).expect("parses");
        prop_assert_eq!(version.major, parts[0]);
    }
}
