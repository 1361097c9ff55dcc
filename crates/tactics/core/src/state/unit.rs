//! Unit identity, category and capability descriptors.
//!
//! Units are composed rather than specialised: a [`UnitKind`] tag selects
//! the broad behaviour family, [`UnitCategory`] decides which attackers may
//! target the unit, and [`Capabilities`] lists what the unit itself can do.

use arrayvec::ArrayVec;
use bitflags::bitflags;

use super::behavior::Behavior;
use super::common::{AbilityId, FactionId, Position, TemplateId, TileIndex, UnitId};
use super::equipment::Equipment;
use super::resources::{Ammo, Fatigue};
use crate::config::CombatConfig;
use crate::env::UnitTemplate;
use crate::stats::CombatStats;

/// Broad behaviour family of a unit.
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
pub enum UnitKind {
    /// Soldiers, ships, aircraft: equip items and fight.
    #[default]
    Combat,
    /// Builders and settlers: never attack or counter-attack.
    Worker,
    /// Wildlife: fights in melee only and carries no equipment.
    Animal,
}

impl UnitKind {
    pub fn can_fight(self) -> bool {
        !matches!(self, UnitKind::Worker)
    }

    pub fn uses_equipment(self) -> bool {
        !matches!(self, UnitKind::Animal)
    }
}

/// Movement/targeting domain of a unit.
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
pub enum UnitCategory {
    #[default]
    Land,
    Ship,
    Submarine,
    Aircraft,
    Spaceship,
    Animal,
    Civilian,
}

impl UnitCategory {
    /// Capability an attacker needs to target a unit of this category.
    pub fn required_attack_capability(self) -> Capabilities {
        match self {
            UnitCategory::Aircraft => Capabilities::ATTACK_AIR,
            UnitCategory::Spaceship => Capabilities::ATTACK_SPACE,
            UnitCategory::Submarine => Capabilities::ATTACK_UNDERWATER,
            _ => Capabilities::empty(),
        }
    }

    pub fn is_naval(self) -> bool {
        matches!(self, UnitCategory::Ship | UnitCategory::Submarine)
    }

    pub fn is_airborne(self) -> bool {
        matches!(self, UnitCategory::Aircraft | UnitCategory::Spaceship)
    }
}

bitflags! {
    /// What a unit template is able to do.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct Capabilities: u8 {
        const ATTACK_AIR        = 1 << 0;
        const ATTACK_SPACE      = 1 << 1;
        const ATTACK_UNDERWATER = 1 << 2;
        /// May fall back to melee when out of ammunition.
        const MELEE_FALLBACK    = 1 << 3;
        /// May carry other units.
        const TRANSPORT         = 1 << 4;
    }
}

/// Complete runtime state of one unit.
///
/// # Invariants
///
/// - `0 <= health <= stats.max_health`
/// - `0 <= morale <= template.max_morale`
/// - `0 <= fatigue <= max_fatigue`, `0 <= ammo <= ammo.max`
/// - `tile` is `None` exactly while the unit is carried or dead
/// - `stats` must be refreshed whenever equipment, abilities or faction
///   bonuses change
#[derive(Clone, Debug, PartialEq)]
pub struct Unit {
    pub id: UnitId,
    pub faction: FactionId,
    pub template_id: TemplateId,
    pub template: UnitTemplate,

    pub position: Position,
    pub tile: Option<TileIndex>,

    /// Final aggregated stats.
    pub stats: CombatStats,
    pub health: i32,
    pub morale: f32,
    pub fatigue: Fatigue,
    pub ammo: Ammo,

    pub behavior: Behavior,
    pub equipment: Equipment,
    pub abilities: ArrayVec<AbilityId, { CombatConfig::MAX_ABILITIES }>,
    pub level: u32,
    pub experience: f32,

    pub cargo: ArrayVec<UnitId, { CombatConfig::MAX_TRANSPORT_CAPACITY }>,
    pub carrier: Option<UnitId>,
}

impl Unit {
    pub fn kind(&self) -> UnitKind {
        self.template.kind
    }

    pub fn category(&self) -> UnitCategory {
        self.template.category
    }

    pub fn capabilities(&self) -> Capabilities {
        self.template.capabilities
    }

    pub fn max_morale(&self) -> f32 {
        self.template.max_morale
    }

    pub fn is_dead(&self) -> bool {
        self.behavior.state.is_dead()
    }

    pub fn is_routing(&self) -> bool {
        self.behavior.state.is_routing()
    }

    pub fn is_transported(&self) -> bool {
        self.carrier.is_some()
    }

    /// Alive and placed on the map (not carried).
    pub fn is_active(&self) -> bool {
        !self.is_dead() && self.carrier.is_none() && self.tile.is_some()
    }

    pub fn transport_capacity(&self) -> usize {
        if self.capabilities().contains(Capabilities::TRANSPORT) {
            (self.template.transport_capacity as usize).min(CombatConfig::MAX_TRANSPORT_CAPACITY)
        } else {
            0
        }
    }

    pub fn remaining_capacity(&self) -> usize {
        self.transport_capacity().saturating_sub(self.cargo.len())
    }

    /// Sets morale, clamped to `[0, max_morale]`. Returns the applied delta.
    pub fn set_morale(&mut self, morale: f32) -> f32 {
        let before = self.morale;
        self.morale = morale.clamp(0.0, self.max_morale());
        self.morale - before
    }

    /// Sets health, clamped to `[0, max_health]`.
    pub fn set_health(&mut self, health: i32) {
        self.health = health.clamp(0, self.stats.max_health.max(0));
    }

    /// Clamps every resource to its current maximum after a stat refresh.
    pub fn reconcile_resources(&mut self) {
        self.set_health(self.health);
        self.set_morale(self.morale);
        self.ammo.clamp_to_max();
    }

    pub fn health_fraction(&self) -> f32 {
        if self.stats.max_health <= 0 {
            return 0.0;
        }
        self.health as f32 / self.stats.max_health as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn category_parses_case_insensitively() {
        assert_eq!(
            UnitCategory::from_str("Submarine").unwrap(),
            UnitCategory::Submarine
        );
        assert_eq!(UnitCategory::Aircraft.to_string(), "aircraft");
    }

    #[test]
    fn restricted_categories_require_capability() {
        assert_eq!(
            UnitCategory::Aircraft.required_attack_capability(),
            Capabilities::ATTACK_AIR
        );
        assert!(UnitCategory::Land.required_attack_capability().is_empty());
    }

    #[test]
    fn workers_do_not_fight() {
        assert!(!UnitKind::Worker.can_fight());
        assert!(UnitKind::Animal.can_fight());
        assert!(!UnitKind::Animal.uses_equipment());
    }
}
