//! Data-driven content for the tactics engine.
//!
//! Provides loaders for RON/TOML data files:
//! - Unit templates, equipment, abilities and bonus sources (RON)
//! - Battle maps (RON)
//! - Combat tunables (TOML)
//!
//! Loaded content feeds the catalog and world oracles and never appears in
//! unit state. All loaders deserialize tactics-core types directly.

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{CatalogLoader, ConfigLoader, ContentFactory, LoadResult, MapLoader};
