//! Events emitted for rendering, animation, UI and notification layers.
//!
//! The caller owns the channel and hands its sending half to the
//! battlefield at construction; nothing is global.

use std::sync::mpsc;

use crate::projectile::ProjectileId;
use crate::state::{AbilityId, BehaviorState, EquipmentSlot, FactionId, ItemId, TileIndex, UnitId};

/// Lifecycle events of units on the battlefield.
#[derive(Clone, Debug, PartialEq)]
pub enum CombatEvent {
    UnitSpawned {
        unit: UnitId,
        tile: TileIndex,
    },
    DamageApplied {
        unit: UnitId,
        source: Option<UnitId>,
        amount: i32,
    },
    HealthChanged {
        unit: UnitId,
        health: i32,
        max_health: i32,
    },
    MoraleChanged {
        unit: UnitId,
        morale: f32,
    },
    StateChanged {
        unit: UnitId,
        from: BehaviorState,
        to: BehaviorState,
    },
    UnitKilled {
        unit: UnitId,
        killer: Option<UnitId>,
    },
    UnitRemoved {
        unit: UnitId,
    },
    ProjectileLaunched {
        projectile: ProjectileId,
        attacker: UnitId,
        defender: UnitId,
    },
    AmmoChanged {
        unit: UnitId,
        ammo: u32,
    },
    MovementCompleted {
        unit: UnitId,
        from: Option<TileIndex>,
        to: TileIndex,
    },
    EquipmentChanged {
        unit: UnitId,
        slot: EquipmentSlot,
        item: Option<ItemId>,
    },
    LevelUp {
        unit: UnitId,
        level: u32,
        ability: Option<AbilityId>,
    },
    UnitLoaded {
        carrier: UnitId,
        cargo: UnitId,
    },
    UnitUnloaded {
        carrier: UnitId,
        cargo: UnitId,
        tile: TileIndex,
    },
    FactionBonusesChanged {
        faction: FactionId,
    },
}

/// Receives events as they happen. Delivery is best-effort.
pub trait EventSink: Send {
    fn publish(&mut self, event: CombatEvent);
}

/// Discards every event.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn publish(&mut self, _event: CombatEvent) {}
}

impl EventSink for Vec<CombatEvent> {
    fn publish(&mut self, event: CombatEvent) {
        self.push(event);
    }
}

impl EventSink for mpsc::Sender<CombatEvent> {
    fn publish(&mut self, event: CombatEvent) {
        if self.send(event).is_err() {
            // Receiver dropped - nobody is listening, which is fine
            tracing::trace!("combat event dropped: receiver closed");
        }
    }
}
