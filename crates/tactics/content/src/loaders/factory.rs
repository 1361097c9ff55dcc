//! Content factory for building a battlefield from data files.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tactics_core::{
    BattleBounds, Battlefield, BattlefieldBuilder, CatalogSnapshot, CombatConfig, GridWorld,
};

use crate::loaders::{CatalogLoader, ConfigLoader, LoadResult, MapLoader};

/// Content factory that loads all tactics content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── combat.toml
/// ├── catalog.ron
/// └── maps/
///     └── river_crossing.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    /// Creates a new content factory pointing to a data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load combat tunables from `combat.toml`.
    pub fn load_config(&self) -> LoadResult<CombatConfig> {
        let path = self.data_dir.join("combat.toml");
        ConfigLoader::load(&path)
    }

    /// Load the content catalog from `catalog.ron`.
    pub fn load_catalog(&self) -> LoadResult<CatalogSnapshot> {
        let path = self.data_dir.join("catalog.ron");
        CatalogLoader::load(&path)
    }

    /// Load a map from `maps/{map_name}.ron`.
    pub fn load_map(&self, map_name: &str) -> LoadResult<GridWorld> {
        let path = self.data_dir.join("maps").join(format!("{}.ron", map_name));
        MapLoader::load(&path)
    }

    /// Builder for a battle on `map_name`, bounded by the map's extent, with
    /// the directory's catalog and tunables already wired in.
    pub fn battle(&self, map_name: &str) -> LoadResult<BattlefieldBuilder> {
        let config = self.load_config()?;
        let catalog = self.load_catalog()?;
        let world = self.load_map(map_name)?;
        let bounds = BattleBounds::new(
            0.0,
            0.0,
            (world.width() - 1) as f32,
            (world.height() - 1) as f32,
        );
        tracing::info!(map = map_name, data_dir = %self.data_dir.display(), "battle content loaded");

        Ok(Battlefield::builder(Arc::new(world), Arc::new(catalog))
            .config(config)
            .battle(bounds))
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factory_paths() {
        let factory = ContentFactory::new("/tmp/tactics-data");
        assert_eq!(factory.data_dir(), Path::new("/tmp/tactics-data"));
    }

    #[test]
    fn missing_files_name_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let factory = ContentFactory::new(dir.path());
        let err = factory.load_catalog().unwrap_err();
        assert!(err.to_string().contains("catalog.ron"));
    }
}
