//! Equipment, experience, faction bonuses and standing orders.
//!
//! Every operation that can change a unit's stat inputs ends with a stat
//! refresh so the cached [`CombatStats`](crate::stats::CombatStats) never
//! goes stale.

use super::{Battlefield, UnitError};
use crate::env::BonusSourceKind;
use crate::events::CombatEvent;
use crate::state::{
    BehaviorState, BonusSourceId, EquipmentSlot, FactionId, ItemId, StateError, Unit, UnitId,
};
use crate::stats::Faction;

/// Standing orders a controller may give outside of combat.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Order {
    /// Stop and stand.
    Hold,
    /// Brace: no fatigue change, still counter-attacks.
    Defend,
}

impl Battlefield {
    /// Puts `item` into `slot`, returning whatever it replaced.
    ///
    /// # Errors
    ///
    /// Fails for dead units, units that take no equipment, unknown items and
    /// items that belong in another slot.
    pub fn equip(
        &mut self,
        id: UnitId,
        slot: EquipmentSlot,
        item: impl Into<ItemId>,
    ) -> Result<Option<ItemId>, UnitError> {
        let item = item.into();
        self.equippable(id)?;
        let Some(entry) = self.env.catalog().item(&item) else {
            tracing::warn!(unit = %id, item = %item, "equip rejected: unknown item");
            return Err(UnitError::UnknownItem(item));
        };
        if entry.slot != slot {
            return Err(UnitError::SlotMismatch {
                item,
                expected: entry.slot,
                actual: slot,
            });
        }

        let previous = match self.units.get_mut(&id) {
            Some(unit) => unit.equipment.equip(slot, item.clone()),
            None => return Err(UnitError::UnknownUnit(id)),
        };
        self.refresh_stats(id);
        tracing::debug!(unit = %id, %slot, item = %item, "item equipped");
        self.emit(CombatEvent::EquipmentChanged {
            unit: id,
            slot,
            item: Some(item),
        });
        Ok(previous)
    }

    /// Empties `slot`, returning the removed item.
    ///
    /// # Errors
    ///
    /// Fails for unknown or dead units and units that take no equipment.
    pub fn unequip(&mut self, id: UnitId, slot: EquipmentSlot) -> Result<Option<ItemId>, UnitError> {
        self.equippable(id)?;
        let removed = match self.units.get_mut(&id) {
            Some(unit) => unit.equipment.unequip(slot),
            None => return Err(UnitError::UnknownUnit(id)),
        };
        if removed.is_some() {
            self.refresh_stats(id);
            self.emit(CombatEvent::EquipmentChanged {
                unit: id,
                slot,
                item: None,
            });
        }
        Ok(removed)
    }

    fn equippable(&self, id: UnitId) -> Result<&Unit, UnitError> {
        let unit = self.living(id)?;
        if !unit.kind().uses_equipment() {
            return Err(UnitError::NoEquipment(id));
        }
        Ok(unit)
    }

    fn living(&self, id: UnitId) -> Result<&Unit, UnitError> {
        let unit = self.units.get(&id).ok_or(UnitError::UnknownUnit(id))?;
        if unit.is_dead() {
            return Err(UnitError::UnitDead(id));
        }
        Ok(unit)
    }

    /// Refills a unit's ammunition. Returns the new count.
    ///
    /// # Errors
    ///
    /// Fails for unknown or dead units.
    pub fn resupply(&mut self, id: UnitId) -> Result<u32, UnitError> {
        self.living(id)?;
        let (before, after) = match self.units.get_mut(&id) {
            Some(unit) => {
                let before = unit.ammo.current();
                unit.ammo.resupply();
                (before, unit.ammo.current())
            }
            None => return Err(UnitError::UnknownUnit(id)),
        };
        if before != after {
            self.emit(CombatEvent::AmmoChanged {
                unit: id,
                ammo: after,
            });
        }
        Ok(after)
    }

    /// Applies a standing order.
    ///
    /// # Errors
    ///
    /// Fails for unknown or dead units. Routing units ignore orders until
    /// they rally.
    pub fn order(&mut self, id: UnitId, order: Order) -> Result<(), UnitError> {
        let current = self.living(id)?.behavior.state;
        let next = match order {
            Order::Hold => BehaviorState::Idle,
            Order::Defend => BehaviorState::Defending,
        };
        if current.is_routing() || !current.can_transition_to(&next) {
            return Err(StateError::IllegalTransition {
                from: current.name(),
                to: next.name(),
            }
            .into());
        }
        self.set_state(id, next);
        Ok(())
    }

    /// Adds experience and processes any level-ups it triggers.
    ///
    /// Reaching level `n + 1` costs `n * experience_per_level`; each new level
    /// may unlock an ability from the unit's template.
    pub fn grant_experience(&mut self, id: UnitId, amount: f32) {
        if amount <= 0.0 {
            return;
        }
        let mut levels = Vec::new();
        {
            let config = &self.config;
            let Some(unit) = self.units.get_mut(&id) else {
                return;
            };
            if unit.is_dead() {
                return;
            }
            unit.experience += amount;
            loop {
                let needed = config.experience_for_next_level(unit.level);
                if needed <= 0.0 || unit.experience < needed {
                    break;
                }
                unit.experience -= needed;
                unit.level += 1;
                let unlocked = unit.template.unlock_at(unit.level).cloned();
                let ability = match unlocked {
                    Some(ability) if !unit.abilities.contains(&ability) => {
                        if unit.abilities.try_push(ability.clone()).is_ok() {
                            Some(ability)
                        } else {
                            tracing::warn!(unit = %id, ability = %ability, "ability slots full");
                            None
                        }
                    }
                    _ => None,
                };
                levels.push((unit.level, ability));
            }
        }

        if levels.is_empty() {
            return;
        }
        self.refresh_stats(id);
        for (level, ability) in levels {
            tracing::debug!(unit = %id, level, "level up");
            self.emit(CombatEvent::LevelUp {
                unit: id,
                level,
                ability,
            });
        }
    }

    /// Registers a faction. Returns `false` if it already existed.
    pub fn add_faction(&mut self, id: FactionId) -> bool {
        if self.factions.contains_key(&id) {
            return false;
        }
        self.factions.insert(id, Faction::new(id));
        true
    }

    /// Completes a research for a faction. Returns `false` if it was already
    /// researched.
    pub fn research(&mut self, faction: FactionId, source: impl Into<BonusSourceId>) -> bool {
        self.activate_source(faction, BonusSourceKind::Research, source.into())
    }

    /// Adopts a culture for a faction. Returns `false` if it was already
    /// adopted.
    pub fn adopt_culture(&mut self, faction: FactionId, source: impl Into<BonusSourceId>) -> bool {
        self.activate_source(faction, BonusSourceKind::Culture, source.into())
    }

    fn activate_source(
        &mut self,
        faction: FactionId,
        kind: BonusSourceKind,
        source: BonusSourceId,
    ) -> bool {
        let entry = self
            .factions
            .entry(faction)
            .or_insert_with(|| Faction::new(faction));
        if !entry.activate(kind, source.clone()) {
            return false;
        }
        tracing::debug!(%faction, %kind, source = %source, "faction bonus source activated");

        let members: Vec<UnitId> = self
            .units
            .values()
            .filter(|unit| unit.faction == faction && !unit.is_dead())
            .map(|unit| unit.id)
            .collect();
        for id in members {
            self.refresh_stats(id);
        }
        self.emit(CombatEvent::FactionBonusesChanged { faction });
        true
    }
}
