//! Attack outcome types.

use super::damage::DamageBreakdown;
use crate::projectile::ProjectileId;
use crate::state::UnitId;

/// One application of the damage formula.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Strike {
    pub attacker: UnitId,
    pub defender: UnitId,
    pub breakdown: DamageBreakdown,
    /// Whether the strike reduced the defender to 0 health.
    pub killed: bool,
}

impl Strike {
    pub fn damage(&self) -> i32 {
        self.breakdown.damage
    }
}

/// Result of a successful [`attack`](crate::Battlefield::attack) call.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AttackOutcome {
    /// Melee resolved synchronously, possibly answered by a counter-attack.
    Melee {
        strike: Strike,
        /// Out-of-ammo melee with the fallback penalty applied.
        fallback: bool,
        counter: Option<Strike>,
    },
    /// Ranged shot in flight; damage lands on `projectile_arrived`.
    Ranged {
        projectile: ProjectileId,
        breakdown: DamageBreakdown,
    },
}

impl AttackOutcome {
    /// Damage dealt (melee) or pending (ranged) to the defender.
    pub fn damage(&self) -> i32 {
        match self {
            AttackOutcome::Melee { strike, .. } => strike.damage(),
            AttackOutcome::Ranged { breakdown, .. } => breakdown.damage,
        }
    }
}
