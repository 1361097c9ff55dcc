//! Content loaders for reading tactics data from files.
//!
//! Each loader turns one RON/TOML file into a tactics-core value that can be
//! handed to [`tactics_core::Env`] or a [`tactics_core::BattlefieldBuilder`].

pub mod catalog;
pub mod config;
pub mod factory;
pub mod map;

pub use catalog::CatalogLoader;
pub use config::ConfigLoader;
pub use factory::ContentFactory;
pub use map::MapLoader;

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
