//! Tactical combat rules for units on a tile world.
//!
//! `tactics-core` resolves stat aggregation, attacks and counter-attacks,
//! morale and routing, fatigue and ammunition, and unit transport. All state
//! lives in a [`Battlefield`]; the surrounding world (terrain, pathing) and
//! static content (templates, items, abilities, research) are reached through
//! the oracle traits in [`env`], and every observable change is published to a
//! caller-supplied [`events::EventSink`].
pub mod battlefield;
pub mod combat;
pub mod config;
pub mod env;
pub mod error;
pub mod events;
pub mod projectile;
pub mod state;
pub mod stats;

pub use battlefield::{
    BattleContext, Battlefield, BattlefieldBuilder, Impact, MoveError, Order, SpawnError,
    TransportError, UnitError,
};
pub use combat::{AttackError, AttackOutcome, DamageBreakdown, Strike};
pub use config::CombatConfig;
pub use env::{
    Ability, BonusSource, BonusSourceKind, CatalogOracle, CatalogSnapshot, Env, EquipmentItem,
    GridWorld, OracleError, TileData, UnitTemplate, WorldOracle,
};
pub use error::{ErrorSeverity, GameError};
pub use events::{CombatEvent, EventSink, NullSink};
pub use projectile::{NullLauncher, ProjectileId, ProjectileLauncher, ProjectileRequest};
pub use state::{
    BattleBounds, BehaviorState, Capabilities, EngagementMode, EquipmentSlot, FactionId,
    Position, StateError, TileIndex, Unit, UnitCategory, UnitId, UnitKind,
};
pub use stats::{BaseStats, CombatStats, StatKind, StatModifier};
