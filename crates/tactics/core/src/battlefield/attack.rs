//! Attack resolution: validation, damage, counter-attacks, deferred ranged
//! hits, routing and death.

use super::Battlefield;
use crate::combat::{
    AttackError, AttackOutcome, DamageBreakdown, DamageInputs, Strike, calculate_damage,
    check_attack, plan_attack, select_mode,
};
use crate::env::TileContext;
use crate::events::CombatEvent;
use crate::projectile::{PendingHit, ProjectileId, ProjectileRequest};
use crate::state::{BehaviorState, EngagementMode, Unit, UnitId};

/// Damage landed by a projectile reported through
/// [`Battlefield::projectile_arrived`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Impact {
    pub attacker: UnitId,
    pub defender: UnitId,
    pub damage: i32,
    pub killed: bool,
}

/// Credited killer of a unit.
#[derive(Clone, Copy, Debug)]
struct Kill {
    killer: UnitId,
    damage: i32,
}

impl Battlefield {
    /// Whether `attacker` could attack `defender` right now.
    pub fn can_attack(&self, attacker: UnitId, defender: UnitId) -> bool {
        match (self.units.get(&attacker), self.units.get(&defender)) {
            (Some(a), Some(d)) => check_attack(a, d).is_ok(),
            _ => false,
        }
    }

    /// Resolves one attack.
    ///
    /// Melee resolves immediately and may provoke a counter-attack. Ranged
    /// attacks consume one round, launch a projectile and apply their damage
    /// when [`Battlefield::projectile_arrived`] is called.
    ///
    /// # Errors
    ///
    /// A rejected attack changes nothing. See [`AttackError`] for the rules.
    pub fn attack(
        &mut self,
        attacker_id: UnitId,
        defender_id: UnitId,
    ) -> Result<AttackOutcome, AttackError> {
        let attacker = self
            .units
            .get(&attacker_id)
            .ok_or(AttackError::UnknownUnit(attacker_id))?;
        let defender = self
            .units
            .get(&defender_id)
            .ok_or(AttackError::UnknownUnit(defender_id))?;
        check_attack(attacker, defender)?;

        let distance = attacker.position.distance(&defender.position);
        let ranged_weapon = self.ranged_weapon(attacker);
        // melee only when both the engaged target and this defender are close
        let engaged = self
            .engaged_distance(attacker)
            .map(|engaged| engaged.max(distance));
        let mode = select_mode(ranged_weapon.is_some(), engaged, &self.config);
        let plan = plan_attack(attacker, mode, distance, &self.config)?;

        // validated; from here on the attack commits
        self.set_state(
            attacker_id,
            BehaviorState::Attacking {
                target: defender_id,
            },
        );
        if let Some(unit) = self.units.get_mut(&attacker_id) {
            unit.behavior.engagement = plan.mode;
        }

        match (plan.mode, ranged_weapon) {
            (EngagementMode::Ranged, Some(weapon)) => {
                let Some(payload) = weapon.ranged else {
                    return Err(AttackError::OutOfAmmo(attacker_id));
                };
                self.fire(attacker_id, defender_id, payload)
            }
            _ => {
                let strike = self.strike(attacker_id, defender_id, plan.fallback)?;
                let counter = if strike.killed {
                    None
                } else {
                    self.counter_attack(defender_id, attacker_id)
                };
                Ok(AttackOutcome::Melee {
                    strike,
                    fallback: plan.fallback,
                    counter,
                })
            }
        }
    }

    /// Applies the parked damage of a projectile that reached its target.
    ///
    /// Returns `None` when the hit is unknown or was cancelled, or when
    /// either participant is dead, removed or no longer on the map.
    pub fn projectile_arrived(&mut self, projectile: ProjectileId) -> Option<Impact> {
        let hit = self.pending.remove(&projectile)?;
        let attacker_alive = self
            .units
            .get(&hit.attacker)
            .is_some_and(|unit| !unit.is_dead());
        let defender_active = self
            .units
            .get(&hit.defender)
            .is_some_and(Unit::is_active);
        if !attacker_alive || !defender_active {
            tracing::debug!(%projectile, "projectile landed on nothing");
            return None;
        }
        let killed = self.apply_damage(hit.defender, hit.damage, Some(hit.attacker));
        Some(Impact {
            attacker: hit.attacker,
            defender: hit.defender,
            damage: hit.damage,
            killed,
        })
    }

    fn fire(
        &mut self,
        attacker_id: UnitId,
        defender_id: UnitId,
        payload: crate::env::RangedPayload,
    ) -> Result<AttackOutcome, AttackError> {
        let breakdown = self.breakdown(attacker_id, defender_id, false)?;
        let (from, to) = match (self.units.get(&attacker_id), self.units.get(&defender_id)) {
            (Some(a), Some(d)) => (a.position, d.position),
            _ => return Err(AttackError::UnknownUnit(defender_id)),
        };
        let ammo = match self.units.get_mut(&attacker_id) {
            Some(unit) => {
                if !unit.ammo.consume() {
                    return Err(AttackError::OutOfAmmo(attacker_id));
                }
                unit.ammo.current()
            }
            None => return Err(AttackError::UnknownUnit(attacker_id)),
        };
        self.emit(CombatEvent::AmmoChanged {
            unit: attacker_id,
            ammo,
        });

        let id = ProjectileId(self.next_projectile_id);
        self.next_projectile_id += 1;
        self.pending.insert(
            id,
            PendingHit {
                attacker: attacker_id,
                defender: defender_id,
                damage: breakdown.damage,
            },
        );
        self.launcher.launch(ProjectileRequest {
            id,
            attacker: attacker_id,
            defender: defender_id,
            payload,
            from,
            to,
        });
        tracing::debug!(projectile = %id, attacker = %attacker_id, defender = %defender_id, damage = breakdown.damage, "projectile launched");
        self.emit(CombatEvent::ProjectileLaunched {
            projectile: id,
            attacker: attacker_id,
            defender: defender_id,
        });
        Ok(AttackOutcome::Ranged {
            projectile: id,
            breakdown,
        })
    }

    fn strike(
        &mut self,
        attacker_id: UnitId,
        defender_id: UnitId,
        fallback: bool,
    ) -> Result<Strike, AttackError> {
        let breakdown = self.breakdown(attacker_id, defender_id, fallback)?;
        let killed = self.apply_damage(defender_id, breakdown.damage, Some(attacker_id));
        Ok(Strike {
            attacker: attacker_id,
            defender: defender_id,
            breakdown,
            killed,
        })
    }

    /// The defender answers a melee strike with its own attack. Counters are
    /// not countered.
    fn counter_attack(&mut self, defender_id: UnitId, attacker_id: UnitId) -> Option<Strike> {
        let defender = self.units.get(&defender_id)?;
        let attacker = self.units.get(&attacker_id)?;
        if let Err(reason) = check_attack(defender, attacker) {
            tracing::trace!(unit = %defender_id, %reason, "no counter-attack");
            return None;
        }
        self.strike(defender_id, attacker_id, false).ok()
    }

    /// Evaluates the damage formula for one strike without applying it.
    fn breakdown(
        &self,
        attacker_id: UnitId,
        defender_id: UnitId,
        fallback: bool,
    ) -> Result<DamageBreakdown, AttackError> {
        let attacker = self
            .units
            .get(&attacker_id)
            .ok_or(AttackError::UnknownUnit(attacker_id))?;
        let defender = self
            .units
            .get(&defender_id)
            .ok_or(AttackError::UnknownUnit(defender_id))?;

        let penalty = if fallback {
            self.config.melee_fallback_penalty
        } else {
            1.0
        };
        let attack_vs: i32 = self
            .equipped_items(attacker)
            .iter()
            .map(|item| item.attack_bonus_against(defender.category()))
            .sum();
        let defense_vs: i32 = self
            .equipped_items(defender)
            .iter()
            .map(|item| item.defense_bonus_against(attacker.category()))
            .sum();

        let inputs = DamageInputs {
            attack: attacker.stats.attack as f32 * attacker.fatigue.factor(&self.config) * penalty,
            attack_vs_category: attack_vs as f32,
            defense: defender.stats.defense as f32 * defender.fatigue.factor(&self.config),
            defense_vs_category: defense_vs as f32,
            tile: self.tile_context(defender),
            damage_multiplier: attacker.stats.damage_multiplier,
            adjacent_allies: self.adjacent_allies(attacker, defender),
            elevation_diff: attacker.position.elevation - defender.position.elevation,
        };
        Ok(calculate_damage(&inputs, &self.config))
    }

    /// Distance to the live target the unit is already attacking, if any.
    pub(super) fn engaged_distance(&self, unit: &Unit) -> Option<f32> {
        unit.behavior
            .state
            .target()
            .and_then(|target| self.units.get(&target))
            .filter(|target| target.is_active())
            .map(|target| unit.position.distance(&target.position))
    }

    fn tile_context(&self, unit: &Unit) -> TileContext {
        let data = unit.tile.and_then(|tile| self.env.world().tile(tile));
        match data {
            Some(data) => data.combat_context(),
            None => {
                tracing::warn!(unit = %unit.id, "defender tile unknown; no terrain bonus");
                TileContext::default()
            }
        }
    }

    /// Living units of the attacker's faction on tiles adjacent to the
    /// defender, the attacker itself included.
    fn adjacent_allies(&self, attacker: &Unit, defender: &Unit) -> u32 {
        let Some(tile) = defender.tile else {
            return 0;
        };
        self.env
            .world()
            .neighbors(tile)
            .into_iter()
            .filter_map(|neighbor| self.occupancy.get(&neighbor))
            .filter_map(|id| self.units.get(id))
            .filter(|unit| unit.faction == attacker.faction && !unit.is_dead())
            .count() as u32
    }

    /// Subtracts health, applies the matching morale loss and handles death
    /// or routing. Returns `true` if this damage killed the unit.
    ///
    /// Damage to a dead unit is ignored, so kill handling runs once.
    pub(super) fn apply_damage(
        &mut self,
        target: UnitId,
        amount: i32,
        source: Option<UnitId>,
    ) -> bool {
        let amount = amount.max(0);
        let rout_fraction = self.config.rout_health_fraction;
        let Some(unit) = self.units.get_mut(&target) else {
            return false;
        };
        if unit.is_dead() {
            tracing::warn!(unit = %target, "damage to dead unit ignored");
            return false;
        }

        unit.set_health(unit.health - amount);
        let morale_loss = amount as f32 * unit.template.morale_lost_per_health;
        let morale_delta = unit.set_morale(unit.morale - morale_loss);
        let (health, max_health, morale) = (unit.health, unit.stats.max_health, unit.morale);
        let low_health = unit.health_fraction() <= rout_fraction;
        let routing = unit.is_routing();

        self.emit(CombatEvent::DamageApplied {
            unit: target,
            source,
            amount,
        });
        self.emit(CombatEvent::HealthChanged {
            unit: target,
            health,
            max_health,
        });
        if morale_delta != 0.0 {
            self.emit(CombatEvent::MoraleChanged {
                unit: target,
                morale,
            });
        }

        if health <= 0 {
            let kill = source.map(|killer| Kill {
                killer,
                damage: amount,
            });
            self.die(target, kill);
            return true;
        }
        if self.is_battle() && !routing && (low_health || morale <= 0.0) {
            self.rout(target);
        }
        false
    }

    /// Breaks a unit: morale drops to 0 and it starts fleeing.
    fn rout(&mut self, id: UnitId) {
        if let Some(unit) = self.units.get_mut(&id) {
            if unit.set_morale(0.0) != 0.0 {
                self.emit(CombatEvent::MoraleChanged {
                    unit: id,
                    morale: 0.0,
                });
            }
        }
        if self.set_state(id, BehaviorState::Routing) {
            tracing::debug!(unit = %id, "unit routed");
        }
    }

    /// Kills a unit exactly once. Its tile is released, projectiles
    /// involving it are cancelled and anything it carries dies with it.
    fn die(&mut self, id: UnitId, kill: Option<Kill>) {
        let Some(unit) = self.units.get(&id) else {
            return;
        };
        if unit.is_dead() {
            return;
        }
        let (tile, carrier) = (unit.tile, unit.carrier);

        self.set_state(id, BehaviorState::Dead);
        let cargo = match self.units.get_mut(&id) {
            Some(unit) => {
                unit.tile = None;
                unit.carrier = None;
                std::mem::take(&mut unit.cargo)
            }
            None => return,
        };
        if let Some(tile) = tile {
            self.release_tile(tile, id);
        }
        if let Some(carrier) = carrier.and_then(|c| self.units.get_mut(&c)) {
            carrier.cargo.retain(|c| *c != id);
        }
        self.cancel_projectiles(id);

        let killer = kill.map(|k| k.killer);
        tracing::debug!(unit = %id, killer = ?killer, "unit killed");
        self.emit(CombatEvent::UnitKilled { unit: id, killer });

        for passenger in cargo {
            self.die(passenger, None);
        }
        if let Some(kill) = kill {
            self.reward_kill(kill);
        }
    }

    fn reward_kill(&mut self, kill: Kill) {
        let bonus = self.config.kill_morale_bonus;
        let experience = kill.damage as f32 * self.config.experience_per_damage;
        let Some(unit) = self.units.get_mut(&kill.killer) else {
            return;
        };
        if unit.is_dead() {
            return;
        }
        let delta = unit.set_morale(unit.morale + bonus);
        let morale = unit.morale;
        if delta != 0.0 {
            self.emit(CombatEvent::MoraleChanged {
                unit: kill.killer,
                morale,
            });
        }
        self.grant_experience(kill.killer, experience);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::env::{Biome, CatalogSnapshot, GridWorld, TileData, UnitTemplate};
    use crate::state::{BattleBounds, FactionId, TemplateId, TileIndex};
    use crate::stats::BaseStats;

    fn template(id: &str, attack: i32, defense: i32, health: i32) -> UnitTemplate {
        UnitTemplate {
            base: BaseStats::new(attack, defense, health, 1.5, 1.0),
            max_morale: 100.0,
            morale_lost_per_health: 1.0,
            ..UnitTemplate::fallback(TemplateId::new(id))
        }
    }

    fn battlefield(battle: bool) -> Battlefield {
        let world = GridWorld::new(5, 5, TileData::land(Biome::Grassland));
        let catalog = CatalogSnapshot::new()
            .with_template(template("striker", 10, 0, 10))
            .with_template(template("wall", 0, 4, 10));
        let builder = Battlefield::builder(Arc::new(world), Arc::new(catalog));
        if battle {
            builder.battle(BattleBounds::new(0.0, 0.0, 4.0, 4.0)).build()
        } else {
            builder.build()
        }
    }

    #[test]
    fn damage_reduces_morale_by_applied_amount() {
        let mut field = battlefield(false);
        let wall = field
            .spawn_unit("wall", FactionId(2), TileIndex(0))
            .unwrap();
        assert!(!field.apply_damage(wall, 3, None));
        let unit = field.unit(wall).unwrap();
        assert_eq!(unit.health, 7);
        assert_eq!(unit.morale, 97.0);
    }

    #[test]
    fn lethal_damage_kills_once() {
        let mut field = battlefield(false);
        let wall = field
            .spawn_unit("wall", FactionId(2), TileIndex(0))
            .unwrap();
        assert!(field.apply_damage(wall, 50, None));
        assert!(!field.apply_damage(wall, 50, None));
        assert!(field.unit(wall).unwrap().is_dead());
        assert_eq!(field.occupant(TileIndex(0)), None);
    }

    #[test]
    fn low_health_routs_only_in_battle() {
        let mut strategic = battlefield(false);
        let a = strategic
            .spawn_unit("wall", FactionId(2), TileIndex(0))
            .unwrap();
        strategic.apply_damage(a, 8, None);
        assert!(!strategic.unit(a).unwrap().is_routing());

        let mut battle = battlefield(true);
        let b = battle
            .spawn_unit("wall", FactionId(2), TileIndex(0))
            .unwrap();
        battle.apply_damage(b, 8, None);
        let unit = battle.unit(b).unwrap();
        assert!(unit.is_routing());
        assert_eq!(unit.morale, 0.0);
    }
}
