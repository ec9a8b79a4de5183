//! Integration tests for metadata resolution.
//!
//! These tests assemble the full stack from the on-disk fixtures and verify:
//!
//! 1. Mapping files take precedence over declared attributes and reflection
//! 2. Later loaders fill gaps without overriding earlier values
//! 3. Misconfiguration fails at assembly with the documented messages
//! 4. Strict and lenient handling of classes no loader knows

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tempfile::TempDir;

use metamap::config::{Config, ConfigError};
use metamap::mapping::{
    AnnotationLoader, ChainLoader, ClassMetadataFactory, DirectoryLoader, Mapped, MappingError,
    MetadataFactory, ReflectionLoader, TypeDescriptor, TypeRegistry,
};

// =============================================================================
// Test Fixtures
// =============================================================================

fn fixtures() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

/// The fixture model, as a host application would declare it.
struct Model;

impl Mapped for Model {
    fn type_path() -> &'static str {
        "acme::model::Model"
    }

    fn type_descriptor() -> TypeDescriptor {
        TypeDescriptor::new(Self::type_path())
            .with_xml_root("ignored")
            .annotated("foo", |p| p.with_alias("annotated").with_since("1.0"))
            .annotated("created_at", |p| p.with_type("datetime"))
            .field("extra")
    }
}

/// A type with no mapping file and no attributes.
struct Plain;

impl Mapped for Plain {
    fn type_path() -> &'static str {
        "acme::model::Plain"
    }

    fn type_descriptor() -> TypeDescriptor {
        TypeDescriptor::new(Self::type_path()).field("a").field("b")
    }
}

fn registry() -> Arc<TypeRegistry> {
    let mut registry = TypeRegistry::new();
    registry.register::<Model>();
    registry.register::<Plain>();
    Arc::new(registry)
}

fn fixture_config() -> Config {
    Config::load(Some(&fixtures().join("serializer.toml")))
        .expect("fixture config loads")
        .config
}

// =============================================================================
// Merge Precedence
// =============================================================================

#[test]
fn mapping_file_wins_and_later_loaders_fill_gaps() {
    let service = fixture_config().build(registry()).expect("build");
    let metadata = service
        .class_metadata("acme::model::Model")
        .expect("metadata");

    // File sets the XML root; the declared one is ignored.
    assert_eq!(metadata.xml_root(), Some("model"));

    let names: Vec<&str> = metadata.properties().iter().map(|p| p.name()).collect();
    assert_eq!(names, vec!["id", "foo", "secret", "created_at", "extra"]);

    let foo = metadata.property("foo").expect("foo");
    assert_eq!(foo.alias(), Some("bar"));
    assert_eq!(foo.type_hint(), Some("string"));
    assert!(foo.groups().contains("public"));
    // Not set by the file, filled from the declared attribute.
    assert_eq!(foo.since_version(), Some("1.0"));

    let created_at = metadata.property("created_at").expect("created_at");
    assert_eq!(created_at.type_hint(), Some("datetime"));

    let extra = metadata.property("extra").expect("extra");
    assert_eq!(extra.type_hint(), None);
    assert!(extra.is_readable());

    assert!(!metadata.property("secret").expect("secret").is_readable());
}

#[test]
fn reflection_alone_yields_skeleton() {
    let service = fixture_config().build(registry()).expect("build");
    let metadata = service
        .class_metadata("acme::model::Plain")
        .expect("metadata");

    let names: Vec<&str> = metadata.properties().iter().map(|p| p.name()).collect();
    assert_eq!(names, vec!["a", "b"]);
    assert!(metadata.xml_root().is_none());
}

#[test]
fn chain_order_is_precedence() {
    let registry = registry();
    let directory = DirectoryLoader::new(fixtures().join("mapping")).expect("directory");

    // Annotations first this time: their alias wins.
    let chain = ChainLoader::new(vec![
        Arc::new(AnnotationLoader::new(registry.clone())),
        Arc::new(directory),
        Arc::new(ReflectionLoader::new(registry)),
    ]);
    let factory = MetadataFactory::new(chain);

    let metadata = factory
        .class_metadata("acme::model::Model")
        .expect("metadata");
    assert_eq!(metadata.xml_root(), Some("ignored"));
    assert_eq!(
        metadata.property("foo").and_then(|p| p.alias()),
        Some("annotated")
    );
    assert_eq!(
        metadata.property("foo").and_then(|p| p.type_hint()),
        Some("string")
    );
}

#[test]
fn unknown_class_is_empty_unless_strict() {
    let service = fixture_config().build(registry()).expect("build");
    let metadata = service.class_metadata("acme::Nope").expect("lenient");
    assert!(metadata.is_empty());
    assert_eq!(metadata.name(), "acme::Nope");

    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("serializer.toml"), "[mapping]\nstrict = true\n").unwrap();
    let strict = Config::load(Some(&temp.path().join("serializer.toml")))
        .unwrap()
        .config
        .build(registry())
        .unwrap();

    let err = strict.class_metadata("acme::Nope").unwrap_err();
    assert!(matches!(err, MappingError::Unresolved { .. }));
    assert!(err.is_configuration());
}

// =============================================================================
// Configuration Errors
// =============================================================================

#[test]
fn missing_mapping_path_reports_path() {
    let temp = TempDir::new().unwrap();
    let config_path = temp.path().join("serializer.toml");
    fs::write(&config_path, "[mapping]\npaths = [\"does-not-exist\"]\n").unwrap();

    let err = Config::load(Some(&config_path))
        .unwrap()
        .config
        .build(registry())
        .unwrap_err();

    let expected = format!(
        "The path \"{}\" does not exist.",
        temp.path().join("does-not-exist").display()
    );
    assert_eq!(err.to_string(), expected);
    assert!(matches!(
        err,
        ConfigError::Mapping(MappingError::PathNotFound { .. })
    ));
}

#[test]
fn no_loaders_rejected() {
    let temp = TempDir::new().unwrap();
    let config_path = temp.path().join("serializer.toml");
    fs::write(
        &config_path,
        "[mapping]\nreflection = false\nannotations = false\n",
    )
    .unwrap();

    let err = Config::load(Some(&config_path))
        .unwrap()
        .config
        .build(registry())
        .unwrap_err();

    assert!(matches!(err, ConfigError::Mapping(MappingError::NoLoaders)));
    assert!(err.to_string().contains("at least one class metadata loader"));
}

#[test]
fn malformed_document_fails_assembly() {
    let temp = TempDir::new().unwrap();
    fs::create_dir_all(temp.path().join("mapping")).unwrap();
    fs::write(temp.path().join("mapping/Bad.toml"), "class = \"a::Bad\"\nbogus = 1\n").unwrap();
    fs::write(
        temp.path().join("serializer.toml"),
        "[mapping]\npaths = [\"mapping\"]\n",
    )
    .unwrap();

    let err = Config::load(Some(&temp.path().join("serializer.toml")))
        .unwrap()
        .config
        .build(registry())
        .unwrap_err();

    assert!(matches!(
        err,
        ConfigError::Mapping(MappingError::Parse { .. })
    ));
}

#[test]
fn duplicate_class_in_directory_rejected() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("A.toml"), "class = \"a::A\"\n").unwrap();
    fs::write(temp.path().join("B.json"), r#"{"class": "a::A"}"#).unwrap();

    let err = DirectoryLoader::new(temp.path()).unwrap_err();
    assert!(matches!(err, MappingError::DuplicateMapping { .. }));
}
