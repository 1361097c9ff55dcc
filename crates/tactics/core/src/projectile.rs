//! Deferred ranged damage.
//!
//! A ranged attack computes its damage when fired, hands a
//! [`ProjectileRequest`] to the external projectile system, and parks the
//! hit until the caller reports arrival. Only one suspension point exists per
//! shot; a pending hit whose attacker or defender is gone resolves to nothing.

use std::sync::mpsc;

use crate::env::RangedPayload;
use crate::state::{Position, UnitId};

/// Handle correlating a launched projectile with its pending hit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProjectileId(pub u64);

impl std::fmt::Display for ProjectileId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "projectile:{}", self.0)
    }
}

/// What the projectile system needs to animate a shot.
#[derive(Clone, Debug, PartialEq)]
pub struct ProjectileRequest {
    pub id: ProjectileId,
    pub attacker: UnitId,
    pub defender: UnitId,
    pub payload: RangedPayload,
    pub from: Position,
    pub to: Position,
}

/// Spawns projectiles; arrival is reported back via
/// [`Battlefield::projectile_arrived`](crate::Battlefield::projectile_arrived).
pub trait ProjectileLauncher: Send {
    fn launch(&mut self, request: ProjectileRequest);
}

/// Launcher that drops requests; arrivals must be signalled manually.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullLauncher;

impl ProjectileLauncher for NullLauncher {
    fn launch(&mut self, _request: ProjectileRequest) {}
}

impl ProjectileLauncher for Vec<ProjectileRequest> {
    fn launch(&mut self, request: ProjectileRequest) {
        self.push(request);
    }
}

impl ProjectileLauncher for mpsc::Sender<ProjectileRequest> {
    fn launch(&mut self, request: ProjectileRequest) {
        if self.send(request).is_err() {
            tracing::trace!("projectile request dropped: receiver closed");
        }
    }
}

/// Damage waiting for its projectile to land.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PendingHit {
    pub attacker: UnitId,
    pub defender: UnitId,
    pub damage: i32,
}

impl PendingHit {
    pub fn involves(&self, unit: UnitId) -> bool {
        self.attacker == unit || self.defender == unit
    }
}
