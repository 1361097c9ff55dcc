//! Attack validation errors.

use crate::error::{ErrorSeverity, GameError};
use crate::state::{UnitCategory, UnitId};

/// Why an attack was rejected. A rejected attack has no effect.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum AttackError {
    #[error("unit {0} does not exist")]
    UnknownUnit(UnitId),

    #[error("attacker {0} is dead")]
    AttackerDead(UnitId),

    #[error("target {0} is dead")]
    TargetDead(UnitId),

    #[error("unit {0} cannot attack itself")]
    SelfTarget(UnitId),

    #[error("unit {0} is not deployed on the map")]
    NotDeployed(UnitId),

    #[error("unit {0} is not a fighting unit")]
    CannotFight(UnitId),

    #[error("unit {0} is routing")]
    Routing(UnitId),

    #[error("unit {attacker} and {target} belong to the same faction")]
    FriendlyTarget { attacker: UnitId, target: UnitId },

    #[error("attacker lacks the capability to engage {category} targets")]
    CategoryRestricted { category: UnitCategory },

    #[error("target at distance {distance:.2} exceeds range {range:.2}")]
    OutOfRange { distance: f32, range: f32 },

    #[error("unit {0} has no ammunition")]
    OutOfAmmo(UnitId),
}

impl GameError for AttackError {
    fn severity(&self) -> ErrorSeverity {
        use AttackError::*;
        match self {
            AttackerDead(_) | TargetDead(_) => ErrorSeverity::Internal,
            Routing(_) | OutOfRange { .. } | OutOfAmmo(_) => ErrorSeverity::Recoverable,
            UnknownUnit(_)
            | SelfTarget(_)
            | NotDeployed(_)
            | CannotFight(_)
            | FriendlyTarget { .. }
            | CategoryRestricted { .. } => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        use AttackError::*;
        match self {
            UnknownUnit(_) => "ATTACK_UNKNOWN_UNIT",
            AttackerDead(_) => "ATTACK_ATTACKER_DEAD",
            TargetDead(_) => "ATTACK_TARGET_DEAD",
            SelfTarget(_) => "ATTACK_SELF_TARGET",
            NotDeployed(_) => "ATTACK_NOT_DEPLOYED",
            CannotFight(_) => "ATTACK_CANNOT_FIGHT",
            Routing(_) => "ATTACK_ROUTING",
            FriendlyTarget { .. } => "ATTACK_FRIENDLY_TARGET",
            CategoryRestricted { .. } => "ATTACK_CATEGORY_RESTRICTED",
            OutOfRange { .. } => "ATTACK_OUT_OF_RANGE",
            OutOfAmmo(_) => "ATTACK_OUT_OF_AMMO",
        }
    }
}
