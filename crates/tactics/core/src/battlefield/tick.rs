//! Time-driven updates: per-frame [`Battlefield::advance`] and per-turn
//! [`Battlefield::end_turn`].

use super::Battlefield;
use crate::combat::select_mode;
use crate::events::CombatEvent;
use crate::state::{BehaviorState, EngagementMode, Position, UnitId};

impl Battlefield {
    /// Advances continuous simulation by `dt` seconds.
    ///
    /// Per unit on the map: fatigue follows the behaviour state, attackers
    /// whose target is gone stand down, the engagement mode is re-evaluated
    /// on its timer, moving units travel and routing units flee.
    pub fn advance(&mut self, dt: f32) {
        if dt <= 0.0 {
            return;
        }
        let ids: Vec<UnitId> = self
            .units
            .values()
            .filter(|unit| unit.is_active())
            .map(|unit| unit.id)
            .collect();

        for id in ids {
            let Some(unit) = self.units.get_mut(&id) else {
                continue;
            };
            if !unit.is_active() {
                // killed earlier in this tick
                continue;
            }
            let state = unit.behavior.state;
            unit.fatigue.advance(&state, dt, &self.config);

            match state {
                BehaviorState::Attacking { target } => {
                    if self.units.get(&target).is_some_and(|t| t.is_active()) {
                        self.refresh_engagement(id, dt);
                    } else {
                        tracing::trace!(unit = %id, target = %target, "target gone; standing down");
                        self.set_state(id, BehaviorState::Idle);
                    }
                }
                BehaviorState::Moving {
                    destination: Some(destination),
                } => self.advance_movement(id, destination, dt),
                BehaviorState::Moving { destination: None } => {
                    self.set_state(id, BehaviorState::Idle);
                }
                BehaviorState::Routing => {
                    if self.can_recover(id) {
                        self.set_state(id, BehaviorState::Idle);
                    } else {
                        self.flee(id, dt);
                    }
                }
                BehaviorState::Idle | BehaviorState::Defending => self.refresh_engagement(id, dt),
                BehaviorState::Dead => {}
            }
        }
    }

    /// Turn boundary: every living unit recovers morale, and routing units
    /// whose morale is restored return to Idle.
    pub fn end_turn(&mut self) {
        let recovery = self.config.morale_recovery_per_turn;
        let ids: Vec<UnitId> = self
            .units
            .values()
            .filter(|unit| !unit.is_dead())
            .map(|unit| unit.id)
            .collect();

        for id in ids {
            let Some(unit) = self.units.get_mut(&id) else {
                continue;
            };
            let delta = unit.set_morale(unit.morale + recovery);
            let morale = unit.morale;
            if delta != 0.0 {
                self.emit(CombatEvent::MoraleChanged { unit: id, morale });
            }
            if self.can_recover(id) {
                tracing::debug!(unit = %id, "unit rallied");
                self.set_state(id, BehaviorState::Idle);
            }
        }
    }

    /// A routing unit rallies once its morale is back above zero.
    fn can_recover(&self, id: UnitId) -> bool {
        self.units
            .get(&id)
            .is_some_and(|unit| unit.is_routing() && unit.morale > 0.0)
    }

    /// Re-evaluates melee/ranged on the engagement timer.
    fn refresh_engagement(&mut self, id: UnitId, dt: f32) {
        let interval = self.config.engagement_refresh_interval;
        let Some(unit) = self.units.get_mut(&id) else {
            return;
        };
        unit.behavior.engagement_refresh_in -= dt;
        if unit.behavior.engagement_refresh_in > 0.0 {
            return;
        }
        unit.behavior.engagement_refresh_in = interval;

        let Some(unit) = self.units.get(&id) else {
            return;
        };
        let mode = select_mode(
            self.ranged_weapon(unit).is_some(),
            self.engaged_distance(unit),
            &self.config,
        );
        if let Some(unit) = self.units.get_mut(&id) {
            if unit.behavior.engagement != mode {
                tracing::trace!(unit = %id, ranged = (mode == EngagementMode::Ranged), "engagement mode changed");
                unit.behavior.engagement = mode;
            }
        }
    }

    /// Moves a routing unit directly away from the nearest hostile unit.
    ///
    /// The threat is re-sampled every `flee_refresh_interval`; the step is
    /// clamped to the battle bounds and only crosses into a free tile.
    fn flee(&mut self, id: UnitId, dt: f32) {
        let interval = self.config.flee_refresh_interval;
        let needs_threat = match self.units.get_mut(&id) {
            Some(unit) => {
                unit.behavior.flee_refresh_in -= dt;
                unit.behavior.flee_from.is_none() || unit.behavior.flee_refresh_in <= 0.0
            }
            None => return,
        };
        if needs_threat {
            let threat = self.nearest_threat(id);
            if let Some(unit) = self.units.get_mut(&id) {
                unit.behavior.flee_refresh_in = interval;
                unit.behavior.flee_from = threat.or(unit.behavior.flee_from);
            }
        }

        let Some(unit) = self.units.get(&id) else {
            return;
        };
        let Some(threat) = unit.behavior.flee_from else {
            return;
        };
        let dx = unit.position.x - threat.x;
        let dy = unit.position.y - threat.y;
        let length = (dx * dx + dy * dy).sqrt();
        if length <= f32::EPSILON {
            return;
        }
        let step = unit.stats.movement * unit.fatigue.factor(&self.config) * dt;
        let mut next = Position::new(
            unit.position.x + dx / length * step,
            unit.position.y + dy / length * step,
            unit.position.elevation,
        );
        if let Some(bounds) = self.context.bounds() {
            next = bounds.clamp(next);
        }

        let current_tile = unit.tile;
        let next_tile = self.env.world().tile_at(next);
        match (current_tile, next_tile) {
            (Some(current), Some(tile)) if current != tile => {
                if self.check_tile(unit, tile).is_err() {
                    return;
                }
                if let Some(center) = self.env.world().tile_center(tile) {
                    next.elevation = center.elevation;
                }
                self.release_tile(current, id);
                self.occupancy.insert(tile, id);
                if let Some(unit) = self.units.get_mut(&id) {
                    unit.tile = Some(tile);
                    unit.position = next;
                }
            }
            (_, Some(_)) => {
                if let Some(unit) = self.units.get_mut(&id) {
                    unit.position = next;
                }
            }
            // stepping off the world
            (_, None) => {}
        }
    }

    fn nearest_threat(&self, id: UnitId) -> Option<Position> {
        let unit = self.units.get(&id)?;
        self.units
            .values()
            .filter(|other| other.faction != unit.faction && other.is_active())
            .map(|other| (unit.position.distance(&other.position), other.position))
            .min_by(|a, b| a.0.total_cmp(&b.0))
            .map(|(_, position)| position)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::env::{Biome, CatalogSnapshot, GridWorld, TileData, UnitTemplate};
    use crate::state::{BattleBounds, FactionId, TemplateId, TileIndex};
    use crate::stats::BaseStats;

    fn field() -> Battlefield {
        let world = GridWorld::new(6, 1, TileData::land(Biome::Plains));
        let soldier = UnitTemplate {
            base: BaseStats::new(5, 1, 10, 1.5, 1.0),
            max_morale: 50.0,
            morale_lost_per_health: 10.0,
            ..UnitTemplate::fallback(TemplateId::new("soldier"))
        };
        let catalog = CatalogSnapshot::new().with_template(soldier);
        Battlefield::builder(Arc::new(world), Arc::new(catalog))
            .battle(BattleBounds::new(0.0, 0.0, 5.0, 0.0))
            .build()
    }

    #[test]
    fn routing_unit_flees_from_enemy() {
        let mut field = field();
        let enemy = field
            .spawn_unit("soldier", FactionId(2), TileIndex(1))
            .unwrap();
        let coward = field
            .spawn_unit("soldier", FactionId(1), TileIndex(2))
            .unwrap();
        field.apply_damage(coward, 5, Some(enemy));
        assert!(field.unit(coward).unwrap().is_routing());

        field.advance(1.0);
        let unit = field.unit(coward).unwrap();
        assert!(unit.position.x > 2.0);
        assert_eq!(unit.behavior.flee_from.map(|p| p.x), Some(1.0));
    }

    #[test]
    fn flee_is_clamped_to_battle_bounds() {
        let mut field = field();
        field
            .spawn_unit("soldier", FactionId(2), TileIndex(4))
            .unwrap();
        let coward = field
            .spawn_unit("soldier", FactionId(1), TileIndex(5))
            .unwrap();
        field.apply_damage(coward, 5, None);
        for _ in 0..10 {
            field.advance(1.0);
        }
        let unit = field.unit(coward).unwrap();
        assert_eq!(unit.position.x, 5.0);
        assert_eq!(unit.tile, Some(TileIndex(5)));
    }

    #[test]
    fn end_turn_rallies_routing_units() {
        let mut field = field();
        let unit = field
            .spawn_unit("soldier", FactionId(1), TileIndex(0))
            .unwrap();
        field.apply_damage(unit, 5, None);
        assert!(field.unit(unit).unwrap().is_routing());

        field.end_turn();
        let unit = field.unit(unit).unwrap();
        assert_eq!(unit.morale, 10.0);
        assert_eq!(unit.behavior.state, BehaviorState::Idle);
    }

    #[test]
    fn attackers_stand_down_when_target_dies() {
        let mut field = field();
        let a = field
            .spawn_unit("soldier", FactionId(1), TileIndex(0))
            .unwrap();
        let b = field
            .spawn_unit("soldier", FactionId(2), TileIndex(1))
            .unwrap();
        field.attack(a, b).unwrap();
        field.apply_damage(b, 100, None);
        field.advance(0.1);
        assert_eq!(field.unit(a).unwrap().behavior.state, BehaviorState::Idle);
    }
}
