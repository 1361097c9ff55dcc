//! Runtime unit state.
//!
//! This module owns the data that changes during a battle: identity and
//! placement, resources, behaviour and equipment. The battlefield mutates it
//! exclusively; collaborators read it through queries.
mod behavior;
mod common;
mod equipment;
mod resources;
mod unit;

pub use behavior::{Behavior, BehaviorState, EngagementMode, StateError};
pub use common::{
    AbilityId, BattleBounds, BonusSourceId, FactionId, ItemId, Position, TemplateId, TileIndex,
    UnitId,
};
pub use equipment::{Equipment, EquipmentSlot};
pub use resources::{Ammo, Fatigue, lerp};
pub use unit::{Capabilities, Unit, UnitCategory, UnitKind};
