use crate::state::{Position, TileIndex, UnitId};

/// Read-only view of the external tile world.
///
/// Terrain generation, navigation and rendering live elsewhere; the combat
/// core only asks for per-tile facts, neighbourhoods and paths.
pub trait WorldOracle: Send + Sync {
    fn tile(&self, tile: TileIndex) -> Option<TileData>;

    fn neighbors(&self, tile: TileIndex) -> Vec<TileIndex>;

    /// World-space centre of a tile (elevation included).
    fn tile_center(&self, tile: TileIndex) -> Option<Position>;

    /// Tile containing a world-space position.
    fn tile_at(&self, position: Position) -> Option<TileIndex>;

    /// Path from `from` to `to` (both inclusive), or `None` if unreachable.
    fn find_path(&self, from: TileIndex, to: TileIndex) -> Option<Vec<TileIndex>>;

    fn is_adjacent(&self, a: TileIndex, b: TileIndex) -> bool {
        self.neighbors(a).contains(&b)
    }

    /// Same tile or a direct neighbour.
    fn is_same_or_adjacent(&self, a: TileIndex, b: TileIndex) -> bool {
        a == b || self.is_adjacent(a, b)
    }
}

/// Biome classes that carry a defense bonus.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Biome {
    #[default]
    Grassland,
    Plains,
    Forest,
    Jungle,
    Desert,
    Tundra,
    Snow,
    Swamp,
    Mountain,
    Coast,
    Ocean,
}

impl Biome {
    pub fn is_water(self) -> bool {
        matches!(self, Biome::Coast | Biome::Ocean)
    }
}

/// Per-tile facts supplied by the world.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TileData {
    pub biome: Biome,
    pub is_hill: bool,
    /// Biome defense bonus (flat).
    pub defense_bonus: f32,
    /// Improvement (fort, wall) flat defense.
    pub improvement_defense_add: f32,
    /// Improvement percentage defense (0.25 = +25%).
    pub improvement_defense_pct: f32,
    /// Occupant reported by the world, if it tracks one.
    pub occupant: Option<UnitId>,
    pub is_passable: bool,
    pub is_land: bool,
    pub movement_cost: f32,
    pub elevation: f32,
}

impl TileData {
    pub fn land(biome: Biome) -> Self {
        Self {
            biome,
            is_hill: false,
            defense_bonus: 0.0,
            improvement_defense_add: 0.0,
            improvement_defense_pct: 0.0,
            occupant: None,
            is_passable: true,
            is_land: true,
            movement_cost: 1.0,
            elevation: 0.0,
        }
    }

    pub fn water() -> Self {
        Self {
            is_land: false,
            ..Self::land(Biome::Ocean)
        }
    }

    pub fn with_hill(mut self) -> Self {
        self.is_hill = true;
        self
    }

    pub fn with_defense_bonus(mut self, bonus: f32) -> Self {
        self.defense_bonus = bonus;
        self
    }

    pub fn with_improvement(mut self, add: f32, pct: f32) -> Self {
        self.improvement_defense_add = add;
        self.improvement_defense_pct = pct;
        self
    }

    pub fn with_elevation(mut self, elevation: f32) -> Self {
        self.elevation = elevation;
        self
    }

    pub fn impassable(mut self) -> Self {
        self.is_passable = false;
        self
    }

    /// Defensive snapshot used by the damage formula.
    pub fn combat_context(&self) -> TileContext {
        TileContext {
            biome_defense_bonus: self.defense_bonus,
            is_hill: self.is_hill,
            improvement_defense_add: self.improvement_defense_add,
            improvement_defense_pct: self.improvement_defense_pct,
        }
    }
}

/// Read-only defensive snapshot of the defender's tile.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TileContext {
    pub biome_defense_bonus: f32,
    pub is_hill: bool,
    pub improvement_defense_add: f32,
    pub improvement_defense_pct: f32,
}
