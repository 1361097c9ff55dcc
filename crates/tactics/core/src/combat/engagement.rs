//! Attack legality and weapon-mode selection.
//!
//! These checks are pure: they read two units and never mutate anything.
//! The battlefield runs them before every attack and counter-attack.

use super::error::AttackError;
use crate::config::CombatConfig;
use crate::state::{Capabilities, EngagementMode, Unit};

/// How the next strike is delivered.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AttackPlan {
    pub mode: EngagementMode,
    /// Melee forced by an empty magazine; attack is penalised.
    pub fallback: bool,
}

/// Validates that `attacker` may attack `target` right now.
///
/// # Errors
///
/// Returns the first failing rule, checked in this order: liveness,
/// deployment, unit kind, routing, faction, category capability, range.
pub fn check_attack(attacker: &Unit, target: &Unit) -> Result<(), AttackError> {
    if attacker.is_dead() {
        return Err(AttackError::AttackerDead(attacker.id));
    }
    if target.is_dead() {
        return Err(AttackError::TargetDead(target.id));
    }
    if attacker.id == target.id {
        return Err(AttackError::SelfTarget(attacker.id));
    }
    if !attacker.is_active() {
        return Err(AttackError::NotDeployed(attacker.id));
    }
    if !target.is_active() {
        return Err(AttackError::NotDeployed(target.id));
    }
    if !attacker.kind().can_fight() {
        return Err(AttackError::CannotFight(attacker.id));
    }
    if attacker.is_routing() {
        return Err(AttackError::Routing(attacker.id));
    }
    if attacker.faction == target.faction {
        return Err(AttackError::FriendlyTarget {
            attacker: attacker.id,
            target: target.id,
        });
    }
    let required = target.category().required_attack_capability();
    if !attacker.capabilities().contains(required) {
        return Err(AttackError::CategoryRestricted {
            category: target.category(),
        });
    }
    let distance = attacker.position.distance(&target.position);
    if distance > attacker.stats.range {
        return Err(AttackError::OutOfRange {
            distance,
            range: attacker.stats.range,
        });
    }
    Ok(())
}

/// Chooses the weapon for an attacker.
///
/// A unit is melee-engaged when it carries no ranged weapon, or when the
/// target it is engaging is alive and within `melee_engage_distance`.
/// Otherwise it fires its ranged weapon.
pub fn select_mode(
    has_ranged_weapon: bool,
    engaged_target_distance: Option<f32>,
    config: &CombatConfig,
) -> EngagementMode {
    if !has_ranged_weapon {
        return EngagementMode::Melee;
    }
    match engaged_target_distance {
        Some(distance) if distance <= config.melee_engage_distance => EngagementMode::Melee,
        _ => EngagementMode::Ranged,
    }
}

/// Resolves the selected mode against the attacker's ammunition.
///
/// # Errors
///
/// Returns `OutOfAmmo` when a ranged attack has no ammunition and the unit
/// cannot fall back to melee at this distance.
pub fn plan_attack(
    attacker: &Unit,
    mode: EngagementMode,
    distance: f32,
    config: &CombatConfig,
) -> Result<AttackPlan, AttackError> {
    if mode == EngagementMode::Melee {
        return Ok(AttackPlan {
            mode,
            fallback: false,
        });
    }
    if !attacker.ammo.is_empty() {
        return Ok(AttackPlan {
            mode: EngagementMode::Ranged,
            fallback: false,
        });
    }
    let can_fall_back = attacker
        .capabilities()
        .contains(Capabilities::MELEE_FALLBACK)
        && distance <= config.melee_engage_distance;
    if can_fall_back {
        Ok(AttackPlan {
            mode: EngagementMode::Melee,
            fallback: true,
        })
    } else {
        Err(AttackError::OutOfAmmo(attacker.id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn units_without_ranged_weapon_always_melee() {
        let config = CombatConfig::default();
        assert_eq!(select_mode(false, None, &config), EngagementMode::Melee);
        assert_eq!(select_mode(false, Some(50.0), &config), EngagementMode::Melee);
    }

    #[test]
    fn close_target_switches_archer_to_melee() {
        let config = CombatConfig::default();
        assert_eq!(select_mode(true, None, &config), EngagementMode::Ranged);
        assert_eq!(select_mode(true, Some(5.0), &config), EngagementMode::Ranged);
        assert_eq!(select_mode(true, Some(1.0), &config), EngagementMode::Melee);
    }
}
