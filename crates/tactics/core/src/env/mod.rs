//! Traits describing read-only world and content data.
//!
//! Oracles expose tile facts, neighbourhoods, paths and static content
//! definitions. The [`Env`] aggregate bundles them so the battlefield can
//! reach everything it needs without coupling to concrete implementations.
mod catalog;
mod error;
mod grid;
mod snapshot;
mod world;

use std::sync::Arc;

pub use catalog::{
    Ability, AbilityUnlock, BonusSource, BonusSourceKind, CatalogOracle, CategoryBonus,
    EquipmentItem, ItemBonus, RangedPayload, TemplateBonus, UnitTemplate,
};
pub use error::OracleError;
pub use grid::GridWorld;
pub use snapshot::CatalogSnapshot;
pub use world::{Biome, TileContext, TileData, WorldOracle};

use crate::state::{AbilityId, BonusSourceId, ItemId, Position, TemplateId, TileIndex};

/// Shared handles to the oracles the battlefield consults.
#[derive(Clone)]
pub struct Env {
    world: Arc<dyn WorldOracle>,
    catalog: Arc<dyn CatalogOracle>,
}

impl Env {
    pub fn new(world: Arc<dyn WorldOracle>, catalog: Arc<dyn CatalogOracle>) -> Self {
        Self { world, catalog }
    }

    pub fn world(&self) -> &dyn WorldOracle {
        self.world.as_ref()
    }

    pub fn catalog(&self) -> &dyn CatalogOracle {
        self.catalog.as_ref()
    }

    /// Returns the tile data, or an error if the world does not know the tile.
    ///
    /// # Errors
    ///
    /// Returns `OracleError::TileNotFound` for unknown indices.
    pub fn require_tile(&self, tile: TileIndex) -> Result<TileData, OracleError> {
        self.world.tile(tile).ok_or(OracleError::TileNotFound(tile))
    }

    /// # Errors
    ///
    /// Returns `OracleError::TileWithoutPosition` if the world cannot place the tile.
    pub fn require_center(&self, tile: TileIndex) -> Result<Position, OracleError> {
        self.world
            .tile_center(tile)
            .ok_or(OracleError::TileWithoutPosition(tile))
    }

    /// Resolves a template, degrading to a zero-stat template when missing.
    pub fn template_or_fallback(&self, id: &TemplateId) -> UnitTemplate {
        self.catalog.template(id).unwrap_or_else(|| {
            tracing::warn!(template = %id, "unit template missing; using zero-stat fallback");
            UnitTemplate::fallback(id.clone())
        })
    }

    /// Resolves an item, logging when the reference dangles.
    pub fn item_or_warn(&self, id: &ItemId) -> Option<EquipmentItem> {
        let item = self.catalog.item(id);
        if item.is_none() {
            tracing::warn!(item = %id, "equipment item missing; treating as no bonus");
        }
        item
    }

    /// Resolves an ability, logging when the reference dangles.
    pub fn ability_or_warn(&self, id: &AbilityId) -> Option<Ability> {
        let ability = self.catalog.ability(id);
        if ability.is_none() {
            tracing::warn!(ability = %id, "ability missing; treating as no modifier");
        }
        ability
    }

    /// Resolves a bonus source, logging when the reference dangles.
    pub fn bonus_source_or_warn(&self, id: &BonusSourceId) -> Option<BonusSource> {
        let source = self.catalog.bonus_source(id);
        if source.is_none() {
            tracing::warn!(source = %id, "faction bonus source missing; ignoring");
        }
        source
    }
}

impl std::fmt::Debug for Env {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Env").finish_non_exhaustive()
    }
}
