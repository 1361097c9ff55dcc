//! Errors for spawning, movement, transport and unit management.

use crate::env::OracleError;
use crate::error::{ErrorSeverity, GameError};
use crate::state::{EquipmentSlot, ItemId, StateError, TileIndex, UnitCategory, UnitId};

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SpawnError {
    #[error(transparent)]
    Oracle(#[from] OracleError),

    #[error("tile {tile} is occupied by {occupant}")]
    TileOccupied { tile: TileIndex, occupant: UnitId },
}

impl GameError for SpawnError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            SpawnError::Oracle(inner) => inner.severity(),
            SpawnError::TileOccupied { .. } => ErrorSeverity::Recoverable,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            SpawnError::Oracle(inner) => inner.error_code(),
            SpawnError::TileOccupied { .. } => "SPAWN_TILE_OCCUPIED",
        }
    }
}

/// Why a unit may not enter a tile.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    #[error("unit {0} does not exist")]
    UnknownUnit(UnitId),

    #[error("unit {0} is dead")]
    UnitDead(UnitId),

    #[error("unit {0} is not deployed on the map")]
    NotDeployed(UnitId),

    #[error("unit {0} is routing")]
    Routing(UnitId),

    #[error("unit {0} cannot move")]
    Immobile(UnitId),

    #[error(transparent)]
    Oracle(#[from] OracleError),

    #[error("tile {0} is impassable")]
    Impassable(TileIndex),

    #[error("{category} units cannot enter tile {tile}")]
    WrongDomain {
        category: UnitCategory,
        tile: TileIndex,
    },

    #[error("tile {tile} is occupied by {occupant}")]
    Occupied { tile: TileIndex, occupant: UnitId },

    #[error("no path from {from} to {to}")]
    NoPath { from: TileIndex, to: TileIndex },
}

impl GameError for MoveError {
    fn severity(&self) -> ErrorSeverity {
        use MoveError::*;
        match self {
            UnitDead(_) => ErrorSeverity::Internal,
            Routing(_) | Occupied { .. } | NoPath { .. } => ErrorSeverity::Recoverable,
            Oracle(inner) => inner.severity(),
            UnknownUnit(_) | NotDeployed(_) | Immobile(_) | Impassable(_) | WrongDomain { .. } => {
                ErrorSeverity::Validation
            }
        }
    }

    fn error_code(&self) -> &'static str {
        use MoveError::*;
        match self {
            UnknownUnit(_) => "MOVE_UNKNOWN_UNIT",
            UnitDead(_) => "MOVE_UNIT_DEAD",
            NotDeployed(_) => "MOVE_NOT_DEPLOYED",
            Routing(_) => "MOVE_ROUTING",
            Immobile(_) => "MOVE_IMMOBILE",
            Oracle(inner) => inner.error_code(),
            Impassable(_) => "MOVE_IMPASSABLE",
            WrongDomain { .. } => "MOVE_WRONG_DOMAIN",
            Occupied { .. } => "MOVE_OCCUPIED",
            NoPath { .. } => "MOVE_NO_PATH",
        }
    }
}

/// Why a load or unload was rejected.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    #[error("unit {0} does not exist")]
    UnknownUnit(UnitId),

    #[error("unit {0} is dead")]
    UnitDead(UnitId),

    #[error("unit {0} cannot load itself")]
    SelfLoad(UnitId),

    #[error("unit {0} is not deployed on the map")]
    NotDeployed(UnitId),

    #[error("unit {0} cannot carry units")]
    NotATransport(UnitId),

    #[error("carrier {carrier} is full ({capacity} units)")]
    CarrierFull { carrier: UnitId, capacity: usize },

    #[error("unit {cargo} does not belong to the faction of carrier {carrier}")]
    ForeignFaction { carrier: UnitId, cargo: UnitId },

    #[error("unit {0} is carrying units and cannot be loaded")]
    NestedTransport(UnitId),

    #[error("tile {tile} is not adjacent to carrier tile {carrier_tile}")]
    TooFar {
        carrier_tile: TileIndex,
        tile: TileIndex,
    },

    #[error("unit {cargo} is not carried by {carrier}")]
    NotCarried { carrier: UnitId, cargo: UnitId },

    #[error(transparent)]
    IllegalTile(#[from] MoveError),
}

impl GameError for TransportError {
    fn severity(&self) -> ErrorSeverity {
        use TransportError::*;
        match self {
            UnitDead(_) => ErrorSeverity::Internal,
            CarrierFull { .. } | TooFar { .. } => ErrorSeverity::Recoverable,
            IllegalTile(inner) => inner.severity(),
            UnknownUnit(_)
            | SelfLoad(_)
            | NotDeployed(_)
            | NotATransport(_)
            | ForeignFaction { .. }
            | NestedTransport(_)
            | NotCarried { .. } => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        use TransportError::*;
        match self {
            UnknownUnit(_) => "TRANSPORT_UNKNOWN_UNIT",
            UnitDead(_) => "TRANSPORT_UNIT_DEAD",
            SelfLoad(_) => "TRANSPORT_SELF_LOAD",
            NotDeployed(_) => "TRANSPORT_NOT_DEPLOYED",
            NotATransport(_) => "TRANSPORT_NOT_A_TRANSPORT",
            CarrierFull { .. } => "TRANSPORT_CARRIER_FULL",
            ForeignFaction { .. } => "TRANSPORT_FOREIGN_FACTION",
            NestedTransport(_) => "TRANSPORT_NESTED",
            TooFar { .. } => "TRANSPORT_TOO_FAR",
            NotCarried { .. } => "TRANSPORT_NOT_CARRIED",
            IllegalTile(inner) => inner.error_code(),
        }
    }
}

/// Errors of unit-management operations (equipment, orders, resupply).
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum UnitError {
    #[error("unit {0} does not exist")]
    UnknownUnit(UnitId),

    #[error("unit {0} is dead")]
    UnitDead(UnitId),

    #[error("unit {0} cannot use equipment")]
    NoEquipment(UnitId),

    #[error("item '{0}' not found")]
    UnknownItem(ItemId),

    #[error("item '{item}' belongs in the {expected} slot, not {actual}")]
    SlotMismatch {
        item: ItemId,
        expected: EquipmentSlot,
        actual: EquipmentSlot,
    },

    #[error(transparent)]
    State(#[from] StateError),
}

impl GameError for UnitError {
    fn severity(&self) -> ErrorSeverity {
        use UnitError::*;
        match self {
            UnitDead(_) => ErrorSeverity::Internal,
            State(inner) => inner.severity(),
            UnknownUnit(_) | NoEquipment(_) | UnknownItem(_) | SlotMismatch { .. } => {
                ErrorSeverity::Validation
            }
        }
    }

    fn error_code(&self) -> &'static str {
        use UnitError::*;
        match self {
            UnknownUnit(_) => "UNIT_UNKNOWN",
            UnitDead(_) => "UNIT_DEAD",
            NoEquipment(_) => "UNIT_NO_EQUIPMENT",
            UnknownItem(_) => "UNIT_UNKNOWN_ITEM",
            SlotMismatch { .. } => "UNIT_SLOT_MISMATCH",
            State(inner) => inner.error_code(),
        }
    }
}
