//! metamap - Serializer class metadata registry and cache
//!
//! metamap resolves, for a named class, the metadata a serializer needs:
//! which properties exist, how each is named on the wire, its type hint,
//! access rules, version and group membership, and XML layout. Metadata is
//! assembled from ordered sources, merged field by field, cached, and
//! optionally pre-warmed. A small compiler turns per-call serialization
//! options into one exclusion strategy.
//!
//! # Architecture
//!
//! - [`mapping`] - Metadata records, loaders, and factories
//! - [`cache`] - Cache store abstraction and backends
//! - [`warmer`] - Ahead-of-time cache population
//! - [`exclusion`] - Property exclusion strategies
//! - [`context`] - Serialization options compiled into a context
//! - [`config`] - `serializer.toml` loading and assembly
//! - [`service`] - The assembled stack handed to hosts
//! - [`cli`] - The `metamap` command-line interface
//!
//! # Invariants
//!
//! 1. A merged record is a left-biased union: the earliest loader that sets
//!    a field wins, later loaders only fill gaps
//! 2. The cache is an optimisation: store failures degrade to an uncached
//!    build and are logged, never returned
//! 3. Warm-up never fails startup
//! 4. Misconfiguration (no loaders, missing mapping paths, malformed
//!    documents) fails at initialisation, not on first use

pub mod cache;
pub mod cli;
pub mod config;
pub mod context;
pub mod exclusion;
pub mod mapping;
pub mod service;
pub mod warmer;
