//! Tile legality and ordered movement.

use super::{Battlefield, MoveError};
use crate::events::CombatEvent;
use crate::state::{BehaviorState, TileIndex, Unit, UnitCategory, UnitId};

impl Battlefield {
    /// Whether `unit` may occupy `tile`: the tile exists, is passable, suits
    /// the unit's domain and holds no other unit.
    pub fn can_move_to(&self, unit: UnitId, tile: TileIndex) -> bool {
        match self.units.get(&unit) {
            Some(unit) if !unit.is_dead() => self.check_tile(unit, tile).is_ok(),
            _ => false,
        }
    }

    pub(super) fn check_tile(&self, unit: &Unit, tile: TileIndex) -> Result<(), MoveError> {
        let data = self.env.require_tile(tile)?;
        let category = unit.category();
        if !category.is_airborne() {
            if !data.is_passable {
                return Err(MoveError::Impassable(tile));
            }
            let domain_ok = match category {
                UnitCategory::Ship | UnitCategory::Submarine => !data.is_land,
                _ => data.is_land,
            };
            if !domain_ok {
                return Err(MoveError::WrongDomain { category, tile });
            }
        }
        match self.tile_holder(tile, &data) {
            Some(occupant) if occupant != unit.id => Err(MoveError::Occupied { tile, occupant }),
            _ => Ok(()),
        }
    }

    /// Orders a deployed unit to `destination`.
    ///
    /// The destination is claimed immediately; the unit then travels toward
    /// it during [`Battlefield::advance`] and reports `MovementCompleted` on
    /// arrival.
    ///
    /// # Errors
    ///
    /// Fails if the unit cannot act, the tile is illegal, or no path exists.
    pub fn move_unit(&mut self, id: UnitId, destination: TileIndex) -> Result<(), MoveError> {
        let unit = self.units.get(&id).ok_or(MoveError::UnknownUnit(id))?;
        if unit.is_dead() {
            return Err(MoveError::UnitDead(id));
        }
        let origin = unit.tile.filter(|_| unit.carrier.is_none());
        let Some(origin) = origin else {
            return Err(MoveError::NotDeployed(id));
        };
        if unit.is_routing() {
            return Err(MoveError::Routing(id));
        }
        if unit.stats.movement <= 0.0 {
            return Err(MoveError::Immobile(id));
        }
        if origin == destination {
            return Ok(());
        }
        self.check_tile(unit, destination)?;
        if self.env.world().find_path(origin, destination).is_none() {
            return Err(MoveError::NoPath {
                from: origin,
                to: destination,
            });
        }

        self.release_tile(origin, id);
        self.occupancy.insert(destination, id);
        self.set_state(
            id,
            BehaviorState::Moving {
                destination: Some(destination),
            },
        );
        if let Some(unit) = self.units.get_mut(&id) {
            unit.tile = Some(destination);
            unit.behavior.move_origin = Some(origin);
        }
        tracing::debug!(unit = %id, from = %origin, to = %destination, "move ordered");
        Ok(())
    }

    /// Steps a moving unit toward its destination's centre.
    pub(super) fn advance_movement(&mut self, id: UnitId, destination: TileIndex, dt: f32) {
        let Some(target) = self.env.world().tile_center(destination) else {
            tracing::warn!(unit = %id, tile = %destination, "destination has no position; stopping");
            self.set_state(id, BehaviorState::Idle);
            return;
        };
        let config = &self.config;
        let Some(unit) = self.units.get_mut(&id) else {
            return;
        };
        let step = unit.stats.movement * unit.fatigue.factor(config) * dt;
        let remaining = unit.position.distance(&target);
        let arrived = remaining <= step || remaining <= f32::EPSILON;
        if arrived {
            unit.position = target;
        } else {
            let t = step / remaining;
            unit.position.x += (target.x - unit.position.x) * t;
            unit.position.y += (target.y - unit.position.y) * t;
            unit.position.elevation += (target.elevation - unit.position.elevation) * t;
        }
        let from = unit.behavior.move_origin;
        if arrived {
            self.set_state(id, BehaviorState::Idle);
            self.emit(CombatEvent::MovementCompleted {
                unit: id,
                from,
                to: destination,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::battlefield::Order;
    use crate::env::{Biome, CatalogSnapshot, GridWorld, TileData, UnitTemplate};
    use crate::state::{FactionId, TemplateId};
    use crate::stats::BaseStats;

    fn field() -> Battlefield {
        let world = GridWorld::new(4, 1, TileData::land(Biome::Plains))
            .with_tile(2, 0, TileData::water())
            .with_tile(3, 0, TileData::land(Biome::Plains).impassable());
        let ship = UnitTemplate {
            category: UnitCategory::Ship,
            base: BaseStats::new(1, 1, 10, 1.0, 1.0),
            ..UnitTemplate::fallback(TemplateId::new("ship"))
        };
        let soldier = UnitTemplate {
            base: BaseStats::new(1, 1, 10, 1.0, 1.0),
            ..UnitTemplate::fallback(TemplateId::new("soldier"))
        };
        let catalog = CatalogSnapshot::new().with_template(ship).with_template(soldier);
        Battlefield::builder(Arc::new(world), Arc::new(catalog)).build()
    }

    #[test]
    fn land_units_stay_on_land() {
        let mut field = field();
        let soldier = field
            .spawn_unit("soldier", FactionId(1), TileIndex(0))
            .unwrap();
        assert!(field.can_move_to(soldier, TileIndex(1)));
        assert!(!field.can_move_to(soldier, TileIndex(2)));
        assert!(!field.can_move_to(soldier, TileIndex(3)));
        assert!(!field.can_move_to(soldier, TileIndex(99)));
    }

    #[test]
    fn ships_need_water() {
        let mut field = field();
        let ship = field.spawn_unit("ship", FactionId(1), TileIndex(2)).unwrap();
        assert!(!field.can_move_to(ship, TileIndex(1)));
        assert!(field.can_move_to(ship, TileIndex(2)));
    }

    #[test]
    fn occupied_tiles_are_rejected() {
        let mut field = field();
        let a = field
            .spawn_unit("soldier", FactionId(1), TileIndex(0))
            .unwrap();
        field
            .spawn_unit("soldier", FactionId(2), TileIndex(1))
            .unwrap();
        assert!(matches!(
            field.move_unit(a, TileIndex(1)),
            Err(MoveError::Occupied { .. })
        ));
    }

    #[test]
    fn move_claims_destination_then_arrives() {
        let mut field = field();
        let a = field
            .spawn_unit("soldier", FactionId(1), TileIndex(0))
            .unwrap();
        field.move_unit(a, TileIndex(1)).unwrap();
        assert_eq!(field.occupant(TileIndex(0)), None);
        assert_eq!(field.occupant(TileIndex(1)), Some(a));

        field.advance(2.0);
        let unit = field.unit(a).unwrap();
        assert_eq!(unit.behavior.state, BehaviorState::Idle);
        assert_eq!(unit.position.x, 1.0);
    }

    #[test]
    fn hold_before_arrival_settles_on_claimed_tile() {
        let mut field = field();
        let a = field
            .spawn_unit("soldier", FactionId(1), TileIndex(0))
            .unwrap();
        field.move_unit(a, TileIndex(1)).unwrap();
        field.advance(0.2);
        assert!(field.unit(a).unwrap().position.x < 0.5);

        field.order(a, Order::Hold).unwrap();
        let unit = field.unit(a).unwrap();
        assert_eq!(unit.behavior.state, BehaviorState::Idle);
        assert_eq!(unit.tile, Some(TileIndex(1)));
        assert_eq!(unit.position.x, 1.0);
        assert_eq!(field.occupant(TileIndex(1)), Some(a));
        assert_eq!(field.occupant(TileIndex(0)), None);

        // nothing left to travel
        field.advance(1.0);
        assert_eq!(field.unit(a).unwrap().position.x, 1.0);
    }

    #[test]
    fn attacking_mid_move_settles_on_claimed_tile() {
        let mut field = field();
        let a = field
            .spawn_unit("soldier", FactionId(1), TileIndex(0))
            .unwrap();
        field.move_unit(a, TileIndex(1)).unwrap();
        let b = field
            .spawn_unit("soldier", FactionId(2), TileIndex(0))
            .unwrap();

        field.attack(a, b).unwrap();
        let unit = field.unit(a).unwrap();
        assert_eq!(unit.behavior.state, BehaviorState::Attacking { target: b });
        assert_eq!(unit.position.x, 1.0);
        assert_eq!(field.occupant(TileIndex(1)), Some(a));
        assert_eq!(field.occupant(TileIndex(0)), Some(b));
    }
}
