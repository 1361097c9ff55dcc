//! The battlefield: owner of every unit and the single entry point for
//! combat, movement, transport and progression.
//!
//! All mutation happens through `&mut Battlefield`, so concurrent attacks on
//! one unit are serialised by the borrow checker. Units are addressed by
//! [`UnitId`] handles; relationships (attack target, carrier, cargo) are
//! stored as ids and resolved through the registry, so a dead or removed
//! unit simply stops resolving.
mod attack;
mod error;
mod movement;
mod progression;
mod tick;
mod transport;

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

pub use attack::Impact;
pub use error::{MoveError, SpawnError, TransportError, UnitError};
pub use progression::Order;

use arrayvec::ArrayVec;

use crate::config::CombatConfig;
use crate::env::{CatalogOracle, Env, EquipmentItem, WorldOracle};
use crate::events::{CombatEvent, EventSink, NullSink};
use crate::projectile::{NullLauncher, PendingHit, ProjectileId, ProjectileLauncher};
use crate::state::{
    Ammo, BattleBounds, Behavior, BehaviorState, EngagementMode, Equipment, FactionId, Fatigue,
    TemplateId, TileIndex, Unit, UnitId,
};
use crate::stats::{CombatStats, Faction, StatBonuses, StatInputs, aggregate};

/// Whether morale collapse makes units flee.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum BattleContext {
    /// Strategic map: morale may reach 0 without routing.
    #[default]
    Strategic,
    /// Tactical battle inside the given bounds.
    Battle(BattleBounds),
}

impl BattleContext {
    pub fn is_battle(&self) -> bool {
        matches!(self, BattleContext::Battle(_))
    }

    pub fn bounds(&self) -> Option<&BattleBounds> {
        match self {
            BattleContext::Battle(bounds) => Some(bounds),
            BattleContext::Strategic => None,
        }
    }
}

/// Unit registry plus everything needed to resolve combat between its units.
pub struct Battlefield {
    env: Env,
    config: CombatConfig,
    context: BattleContext,

    units: BTreeMap<UnitId, Unit>,
    occupancy: HashMap<TileIndex, UnitId>,
    factions: BTreeMap<FactionId, Faction>,
    pending: BTreeMap<ProjectileId, PendingHit>,

    next_unit_id: u32,
    next_projectile_id: u64,

    events: Box<dyn EventSink>,
    launcher: Box<dyn ProjectileLauncher>,
}

/// Builder for [`Battlefield`].
pub struct BattlefieldBuilder {
    env: Env,
    config: CombatConfig,
    context: BattleContext,
    events: Box<dyn EventSink>,
    launcher: Box<dyn ProjectileLauncher>,
}

impl BattlefieldBuilder {
    pub fn config(mut self, config: CombatConfig) -> Self {
        self.config = config;
        self
    }

    pub fn battle(mut self, bounds: BattleBounds) -> Self {
        self.context = BattleContext::Battle(bounds);
        self
    }

    pub fn events(mut self, sink: impl EventSink + 'static) -> Self {
        self.events = Box::new(sink);
        self
    }

    pub fn projectiles(mut self, launcher: impl ProjectileLauncher + 'static) -> Self {
        self.launcher = Box::new(launcher);
        self
    }

    pub fn build(self) -> Battlefield {
        Battlefield {
            env: self.env,
            config: self.config,
            context: self.context,
            units: BTreeMap::new(),
            occupancy: HashMap::new(),
            factions: BTreeMap::new(),
            pending: BTreeMap::new(),
            next_unit_id: 1,
            next_projectile_id: 1,
            events: self.events,
            launcher: self.launcher,
        }
    }
}

impl Battlefield {
    pub fn builder(
        world: Arc<dyn WorldOracle>,
        catalog: Arc<dyn CatalogOracle>,
    ) -> BattlefieldBuilder {
        BattlefieldBuilder {
            env: Env::new(world, catalog),
            config: CombatConfig::default(),
            context: BattleContext::Strategic,
            events: Box::new(NullSink),
            launcher: Box::new(NullLauncher),
        }
    }

    // ===== accessors =====

    pub fn env(&self) -> &Env {
        &self.env
    }

    pub fn config(&self) -> &CombatConfig {
        &self.config
    }

    pub fn context(&self) -> BattleContext {
        self.context
    }

    pub fn is_battle(&self) -> bool {
        self.context.is_battle()
    }

    /// Switches between strategic map and tactical battle.
    ///
    /// Units already routing keep routing; new routs only start in battle.
    pub fn set_context(&mut self, context: BattleContext) {
        tracing::debug!(battle = context.is_battle(), "battle context changed");
        self.context = context;
    }

    pub fn unit(&self, id: UnitId) -> Option<&Unit> {
        self.units.get(&id)
    }

    /// All registered units, dead ones included, in id order.
    pub fn units(&self) -> impl Iterator<Item = &Unit> {
        self.units.values()
    }

    /// Final aggregated stats of a unit.
    pub fn stats(&self, id: UnitId) -> Option<&CombatStats> {
        self.units.get(&id).map(|unit| &unit.stats)
    }

    pub fn occupant(&self, tile: TileIndex) -> Option<UnitId> {
        self.occupancy.get(&tile).copied()
    }

    pub fn faction(&self, id: FactionId) -> Option<&Faction> {
        self.factions.get(&id)
    }

    /// Number of ranged hits still waiting for their projectile.
    pub fn pending_projectiles(&self) -> usize {
        self.pending.len()
    }

    /// Cached engagement mode of a unit; see [`Battlefield::advance`].
    pub fn engagement_mode(&self, id: UnitId) -> Option<EngagementMode> {
        self.units.get(&id).map(|unit| unit.behavior.engagement)
    }

    // ===== lifecycle =====

    /// Creates a unit from a template on a free tile.
    ///
    /// A missing template degrades to a zero-stat fallback with a warning.
    /// The faction is registered on first use.
    ///
    /// # Errors
    ///
    /// Fails if the tile is unknown to the world or already occupied.
    pub fn spawn_unit(
        &mut self,
        template_id: impl Into<TemplateId>,
        faction: FactionId,
        tile: TileIndex,
    ) -> Result<UnitId, SpawnError> {
        let template_id = template_id.into();
        let tile_data = self.env.require_tile(tile)?;
        let position = self.env.require_center(tile)?;
        if let Some(occupant) = self.tile_holder(tile, &tile_data) {
            return Err(SpawnError::TileOccupied { tile, occupant });
        }

        let template = self.env.template_or_fallback(&template_id);
        let id = UnitId(self.next_unit_id);
        self.next_unit_id += 1;
        self.factions
            .entry(faction)
            .or_insert_with(|| Faction::new(faction));

        let mut equipment = Equipment::empty();
        if template.kind.uses_equipment() {
            for (slot, item) in &template.starting_equipment {
                equipment.equip(*slot, item.clone());
            }
        }

        let mut unit = Unit {
            id,
            faction,
            template_id,
            position,
            tile: Some(tile),
            stats: CombatStats::default(),
            health: 0,
            morale: template.max_morale,
            fatigue: Fatigue::new(0.0, &self.config),
            ammo: Ammo::full(template.max_ammo),
            behavior: Behavior::default(),
            equipment,
            abilities: ArrayVec::new(),
            level: 1,
            experience: 0.0,
            cargo: ArrayVec::new(),
            carrier: None,
            template,
        };
        if let Some(ability) = unit.template.unlock_at(1) {
            unit.abilities.push(ability.clone());
        }
        unit.stats = self.compute_stats(&unit);
        unit.health = unit.stats.max_health;
        unit.behavior.engagement = if self.ranged_weapon(&unit).is_some() {
            EngagementMode::Ranged
        } else {
            EngagementMode::Melee
        };

        tracing::debug!(unit = %id, template = %unit.template_id, faction = %faction, tile = %tile, "unit spawned");
        self.units.insert(id, unit);
        self.occupancy.insert(tile, id);
        self.emit(CombatEvent::UnitSpawned { unit: id, tile });
        Ok(id)
    }

    /// Deletes a unit outright (no kill rewards, no `UnitKilled`).
    ///
    /// Its tile is released, it is detached from any carrier, its cargo is
    /// removed with it and projectiles involving it are cancelled.
    pub fn remove_unit(&mut self, id: UnitId) -> Option<Unit> {
        let unit = self.units.remove(&id)?;
        if let Some(tile) = unit.tile {
            self.release_tile(tile, id);
        }
        if let Some(carrier) = unit.carrier.and_then(|c| self.units.get_mut(&c)) {
            carrier.cargo.retain(|cargo| *cargo != id);
        }
        self.cancel_projectiles(id);
        for cargo in unit.cargo.iter().copied() {
            self.remove_unit(cargo);
        }
        tracing::debug!(unit = %id, "unit removed");
        self.emit(CombatEvent::UnitRemoved { unit: id });
        Some(unit)
    }

    // ===== stats =====

    /// Recomputes a unit's stats from its current equipment, abilities and
    /// faction bonuses, then clamps its resources to the new maxima.
    pub fn refresh_stats(&mut self, id: UnitId) {
        let Some(unit) = self.units.get(&id) else {
            return;
        };
        let stats = self.compute_stats(unit);
        let max_ammo = unit.template.max_ammo;
        let Some(unit) = self.units.get_mut(&id) else {
            return;
        };
        let before = (unit.health, unit.stats.max_health);
        unit.stats = stats;
        unit.ammo.set_max(max_ammo);
        unit.reconcile_resources();
        let after = (unit.health, unit.stats.max_health);
        if before != after {
            let (health, max_health) = after;
            self.emit(CombatEvent::HealthChanged {
                unit: id,
                health,
                max_health,
            });
        }
    }

    fn compute_stats(&self, unit: &Unit) -> CombatStats {
        let items = self.equipped_items(unit);
        let abilities: Vec<_> = unit
            .abilities
            .iter()
            .filter_map(|id| self.env.ability_or_warn(id))
            .collect();
        let (unit_faction, equipment_faction) = match self.factions.get(&unit.faction) {
            Some(faction) => (
                faction.unit_bonuses(&self.env, &unit.template_id),
                faction.equipment_bonuses(&self.env, items.iter().map(|item| &item.id)),
            ),
            None => (StatBonuses::new(), StatBonuses::new()),
        };
        aggregate(&StatInputs {
            base: &unit.template.base,
            equipment: &items,
            abilities: &abilities,
            unit_faction: &unit_faction,
            equipment_faction: &equipment_faction,
        })
    }

    /// Catalog entries for every equipped item; dangling ids are skipped.
    fn equipped_items(&self, unit: &Unit) -> Vec<EquipmentItem> {
        if !unit.kind().uses_equipment() {
            return Vec::new();
        }
        unit.equipment
            .items()
            .filter_map(|(_, id)| self.env.item_or_warn(id))
            .collect()
    }

    fn ranged_weapon(&self, unit: &Unit) -> Option<EquipmentItem> {
        self.equipped_items(unit)
            .into_iter()
            .find(EquipmentItem::is_ranged)
    }

    // ===== internal helpers =====

    fn emit(&mut self, event: CombatEvent) {
        self.events.publish(event);
    }

    /// Applies a state transition and publishes it. Illegal transitions are
    /// logged and ignored.
    fn set_state(&mut self, id: UnitId, next: BehaviorState) -> bool {
        let Some(unit) = self.units.get_mut(&id) else {
            return false;
        };
        if unit.behavior.state == next {
            return true;
        }
        match unit.behavior.transition(next) {
            Ok(from) => {
                tracing::trace!(unit = %id, from = from.name(), to = next.name(), "state changed");
                if let BehaviorState::Moving {
                    destination: Some(destination),
                } = from
                    && !matches!(next, BehaviorState::Moving { .. })
                {
                    self.settle_interrupted_move(id, destination);
                }
                self.emit(CombatEvent::StateChanged {
                    unit: id,
                    from,
                    to: next,
                });
                true
            }
            Err(error) => {
                tracing::warn!(unit = %id, %error, "transition rejected");
                false
            }
        }
    }

    /// A move left before arrival ends on the tile it already claimed, so
    /// position and occupancy agree again.
    fn settle_interrupted_move(&mut self, id: UnitId, destination: TileIndex) {
        let Some(center) = self.env.world().tile_center(destination) else {
            return;
        };
        let Some(unit) = self.units.get_mut(&id) else {
            return;
        };
        if unit.tile != Some(destination) || unit.position == center {
            return;
        }
        tracing::debug!(unit = %id, tile = %destination, "move interrupted; settling on claimed tile");
        unit.position = center;
    }

    /// Unit currently holding `tile`: a registered unit, or a foreign
    /// occupant the world reports that this battlefield does not track.
    fn tile_holder(&self, tile: TileIndex, data: &crate::env::TileData) -> Option<UnitId> {
        self.occupancy.get(&tile).copied().or(data.occupant)
    }

    fn release_tile(&mut self, tile: TileIndex, id: UnitId) {
        if self.occupancy.get(&tile) == Some(&id) {
            self.occupancy.remove(&tile);
        }
    }

    fn cancel_projectiles(&mut self, id: UnitId) {
        let before = self.pending.len();
        self.pending.retain(|_, hit| !hit.involves(id));
        let cancelled = before - self.pending.len();
        if cancelled > 0 {
            tracing::debug!(unit = %id, cancelled, "pending projectile hits cancelled");
        }
    }
}

impl std::fmt::Debug for Battlefield {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Battlefield")
            .field("context", &self.context)
            .field("units", &self.units.len())
            .field("pending", &self.pending.len())
            .finish_non_exhaustive()
    }
}
