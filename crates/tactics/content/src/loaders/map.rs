//! Battle map loader.
//!
//! Maps are rectangular grids: a `fill` tile covers the whole map and
//! individual tiles override it.

use std::path::Path;

use serde::Deserialize;
use tactics_core::env::Biome;
use tactics_core::{GridWorld, TileData};

use crate::loaders::{LoadResult, read_file};

/// Tile description in map files. Unset fields take land defaults.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
struct TileDef {
    biome: Biome,
    hill: bool,
    water: bool,
    impassable: bool,
    elevation: f32,
    defense_bonus: f32,
    improvement_defense_add: f32,
    improvement_defense_pct: f32,
}

impl Default for TileDef {
    fn default() -> Self {
        Self {
            biome: Biome::Grassland,
            hill: false,
            water: false,
            impassable: false,
            elevation: 0.0,
            defense_bonus: 0.0,
            improvement_defense_add: 0.0,
            improvement_defense_pct: 0.0,
        }
    }
}

impl TileDef {
    fn into_tile(self) -> TileData {
        let mut tile = if self.water || self.biome.is_water() {
            TileData {
                biome: self.biome,
                ..TileData::water()
            }
        } else {
            TileData::land(self.biome)
        };
        if self.hill {
            tile = tile.with_hill();
        }
        if self.impassable {
            tile = tile.impassable();
        }
        tile.with_elevation(self.elevation)
            .with_defense_bonus(self.defense_bonus)
            .with_improvement(self.improvement_defense_add, self.improvement_defense_pct)
    }
}

/// Map data structure for RON files.
#[derive(Debug, Deserialize)]
struct MapFile {
    dimensions: (u32, u32),
    #[serde(default)]
    fill: TileDef,
    #[serde(default)]
    tiles: Vec<(u32, u32, TileDef)>,
}

/// Loader for battle maps from RON files.
pub struct MapLoader;

impl MapLoader {
    /// Load a map from a RON file.
    pub fn load(path: &Path) -> LoadResult<GridWorld> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    /// Parse a map from RON text.
    pub fn parse(content: &str) -> LoadResult<GridWorld> {
        let data: MapFile = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse map RON: {}", e))?;

        let (width, height) = data.dimensions;
        if width == 0 || height == 0 {
            anyhow::bail!("Map dimensions must be non-zero, got {}x{}", width, height);
        }

        let mut world = GridWorld::new(width, height, data.fill.into_tile());
        for (x, y, def) in data.tiles {
            if x >= width || y >= height {
                anyhow::bail!(
                    "Tile ({}, {}) lies outside the {}x{} map",
                    x,
                    y,
                    width,
                    height
                );
            }
            world.set(x, y, def.into_tile());
        }

        tracing::debug!(width, height, "map loaded");
        Ok(world)
    }
}

#[cfg(test)]
mod tests {
    use tactics_core::WorldOracle;

    use super::*;

    #[test]
    fn overrides_replace_fill_tiles() {
        let ron = r#"(
            dimensions: (3, 2),
            fill: (biome: Plains),
            tiles: [
                (0, 0, (water: true)),
                (2, 1, (biome: Forest, hill: true, elevation: 2.0)),
            ],
        )"#;
        let world = MapLoader::parse(ron).unwrap();
        let water = world.tile(world.index(0, 0)).unwrap();
        assert!(!water.is_land);
        let hill = world.tile(world.index(2, 1)).unwrap();
        assert!(hill.is_hill);
        assert_eq!(hill.biome, Biome::Forest);
        assert_eq!(hill.elevation, 2.0);
        let plain = world.tile(world.index(1, 0)).unwrap();
        assert_eq!(plain.biome, Biome::Plains);
    }

    #[test]
    fn rejects_tiles_outside_the_map() {
        let ron = "(dimensions: (2, 2), tiles: [(2, 0, ())])";
        assert!(MapLoader::parse(ron).is_err());
    }

    #[test]
    fn rejects_empty_maps() {
        assert!(MapLoader::parse("(dimensions: (0, 4))").is_err());
    }
}
