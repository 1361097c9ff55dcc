//! Loading units into carriers and putting them back on the map.

use super::{Battlefield, MoveError, TransportError};
use crate::events::CombatEvent;
use crate::state::{BehaviorState, Capabilities, TileIndex, Unit, UnitId};

impl Battlefield {
    /// Units currently aboard `carrier`, in load order.
    pub fn transported_units(&self, carrier: UnitId) -> &[UnitId] {
        self.units
            .get(&carrier)
            .map(|unit| unit.cargo.as_slice())
            .unwrap_or(&[])
    }

    /// Free cargo slots; 0 for unknown units and non-transports.
    pub fn remaining_capacity(&self, carrier: UnitId) -> usize {
        self.units
            .get(&carrier)
            .map(Unit::remaining_capacity)
            .unwrap_or(0)
    }

    pub fn can_load(&self, carrier: UnitId, cargo: UnitId) -> bool {
        self.check_load(carrier, cargo).is_ok()
    }

    fn check_load(&self, carrier_id: UnitId, cargo_id: UnitId) -> Result<(), TransportError> {
        if carrier_id == cargo_id {
            return Err(TransportError::SelfLoad(carrier_id));
        }
        let carrier = self.live_unit(carrier_id)?;
        let cargo = self.live_unit(cargo_id)?;
        let carrier_tile = deployed_tile(carrier)?;
        let cargo_tile = deployed_tile(cargo)?;

        if !carrier.capabilities().contains(Capabilities::TRANSPORT) {
            return Err(TransportError::NotATransport(carrier_id));
        }
        if carrier.faction != cargo.faction {
            return Err(TransportError::ForeignFaction {
                carrier: carrier_id,
                cargo: cargo_id,
            });
        }
        if !cargo.cargo.is_empty() {
            return Err(TransportError::NestedTransport(cargo_id));
        }
        if carrier.remaining_capacity() == 0 {
            return Err(TransportError::CarrierFull {
                carrier: carrier_id,
                capacity: carrier.transport_capacity(),
            });
        }
        if !self.env.world().is_same_or_adjacent(carrier_tile, cargo_tile) {
            return Err(TransportError::TooFar {
                carrier_tile,
                tile: cargo_tile,
            });
        }
        Ok(())
    }

    /// Takes `cargo` off the map and aboard `carrier`.
    ///
    /// # Errors
    ///
    /// Both units must be alive, deployed and of one faction; the carrier
    /// must be a transport with free capacity; the cargo must stand on or
    /// next to the carrier's tile and carry nothing itself.
    pub fn load_unit(&mut self, carrier_id: UnitId, cargo_id: UnitId) -> Result<(), TransportError> {
        self.check_load(carrier_id, cargo_id)?;

        let Some(cargo) = self.units.get(&cargo_id) else {
            return Err(TransportError::UnknownUnit(cargo_id));
        };
        let (cargo_tile, cargo_state) = (cargo.tile, cargo.behavior.state);
        if matches!(
            cargo_state,
            BehaviorState::Attacking { .. } | BehaviorState::Moving { .. }
        ) {
            self.set_state(cargo_id, BehaviorState::Idle);
        }
        if let Some(tile) = cargo_tile {
            self.release_tile(tile, cargo_id);
        }
        if let Some(cargo) = self.units.get_mut(&cargo_id) {
            cargo.tile = None;
            cargo.carrier = Some(carrier_id);
        }
        if let Some(carrier) = self.units.get_mut(&carrier_id) {
            // capacity checked above
            let _ = carrier.cargo.try_push(cargo_id);
        }

        tracing::debug!(carrier = %carrier_id, cargo = %cargo_id, "unit loaded");
        self.emit(CombatEvent::UnitLoaded {
            carrier: carrier_id,
            cargo: cargo_id,
        });
        Ok(())
    }

    /// Puts `cargo` back on the map at `tile`, which must be the carrier's
    /// tile or adjacent to it and legal for the cargo.
    ///
    /// # Errors
    ///
    /// See [`TransportError`]; a failed unload leaves the cargo aboard.
    pub fn unload_unit(
        &mut self,
        carrier_id: UnitId,
        cargo_id: UnitId,
        tile: TileIndex,
    ) -> Result<(), TransportError> {
        let carrier = self.live_unit(carrier_id)?;
        let cargo = self.live_unit(cargo_id)?;
        if cargo.carrier != Some(carrier_id) {
            return Err(TransportError::NotCarried {
                carrier: carrier_id,
                cargo: cargo_id,
            });
        }
        let carrier_tile = deployed_tile(carrier)?;
        if !self.env.world().is_same_or_adjacent(carrier_tile, tile) {
            return Err(TransportError::TooFar { carrier_tile, tile });
        }
        self.check_tile(cargo, tile)?;
        let position = self
            .env
            .require_center(tile)
            .map_err(MoveError::from)?;

        if let Some(carrier) = self.units.get_mut(&carrier_id) {
            carrier.cargo.retain(|id| *id != cargo_id);
        }
        if let Some(cargo) = self.units.get_mut(&cargo_id) {
            cargo.carrier = None;
            cargo.tile = Some(tile);
            cargo.position = position;
        }
        self.occupancy.insert(tile, cargo_id);

        tracing::debug!(carrier = %carrier_id, cargo = %cargo_id, tile = %tile, "unit unloaded");
        self.emit(CombatEvent::UnitUnloaded {
            carrier: carrier_id,
            cargo: cargo_id,
            tile,
        });
        self.emit(CombatEvent::MovementCompleted {
            unit: cargo_id,
            from: Some(carrier_tile),
            to: tile,
        });
        Ok(())
    }

    fn live_unit(&self, id: UnitId) -> Result<&Unit, TransportError> {
        let unit = self
            .units
            .get(&id)
            .ok_or(TransportError::UnknownUnit(id))?;
        if unit.is_dead() {
            return Err(TransportError::UnitDead(id));
        }
        Ok(unit)
    }
}

fn deployed_tile(unit: &Unit) -> Result<TileIndex, TransportError> {
    match (unit.tile, unit.carrier) {
        (Some(tile), None) => Ok(tile),
        _ => Err(TransportError::NotDeployed(unit.id)),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::env::{Biome, CatalogSnapshot, GridWorld, TileData, UnitTemplate};
    use crate::state::{FactionId, TemplateId, UnitCategory};
    use crate::stats::BaseStats;

    fn field() -> Battlefield {
        let world = GridWorld::new(4, 1, TileData::land(Biome::Plains))
            .with_tile(0, 0, TileData::water());
        let ship = UnitTemplate {
            category: UnitCategory::Ship,
            capabilities: Capabilities::TRANSPORT,
            transport_capacity: 1,
            base: BaseStats::new(1, 1, 20, 1.0, 1.0),
            ..UnitTemplate::fallback(TemplateId::new("galley"))
        };
        let soldier = UnitTemplate {
            base: BaseStats::new(1, 1, 10, 1.0, 1.0),
            ..UnitTemplate::fallback(TemplateId::new("soldier"))
        };
        let catalog = CatalogSnapshot::new().with_template(ship).with_template(soldier);
        Battlefield::builder(Arc::new(world), Arc::new(catalog)).build()
    }

    #[test]
    fn capacity_is_enforced() {
        let mut field = field();
        let galley = field
            .spawn_unit("galley", FactionId(1), TileIndex(0))
            .unwrap();
        let a = field
            .spawn_unit("soldier", FactionId(1), TileIndex(1))
            .unwrap();
        let b = field
            .spawn_unit("soldier", FactionId(1), TileIndex(2))
            .unwrap();
        field.load_unit(galley, a).unwrap();
        assert_eq!(field.remaining_capacity(galley), 0);
        assert!(matches!(
            field.load_unit(galley, b),
            Err(TransportError::CarrierFull { .. })
        ));
    }

    #[test]
    fn only_own_faction_boards() {
        let mut field = field();
        let galley = field
            .spawn_unit("galley", FactionId(1), TileIndex(0))
            .unwrap();
        let enemy = field
            .spawn_unit("soldier", FactionId(2), TileIndex(1))
            .unwrap();
        assert!(!field.can_load(galley, enemy));
        assert!(!field.can_load(enemy, galley));
    }

    #[test]
    fn unload_rejects_illegal_tile() {
        let mut field = field();
        let galley = field
            .spawn_unit("galley", FactionId(1), TileIndex(0))
            .unwrap();
        let a = field
            .spawn_unit("soldier", FactionId(1), TileIndex(1))
            .unwrap();
        field.load_unit(galley, a).unwrap();
        assert_eq!(
            field.unload_unit(galley, a, TileIndex(0)),
            Err(TransportError::IllegalTile(MoveError::WrongDomain {
                category: UnitCategory::Land,
                tile: TileIndex(0)
            }))
        );
        assert!(matches!(
            field.unload_unit(galley, a, TileIndex(3)),
            Err(TransportError::TooFar { .. })
        ));
        assert_eq!(field.transported_units(galley), &[a]);
    }
}
