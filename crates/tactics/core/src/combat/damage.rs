//! Damage calculation.

use crate::config::CombatConfig;
use crate::env::TileContext;

/// Everything the damage formula consumes for a single strike.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DamageInputs {
    /// Attacker's aggregated attack, already attenuated by fatigue and any
    /// melee-fallback penalty.
    pub attack: f32,
    /// Attacker equipment bonus against the defender's category.
    pub attack_vs_category: f32,
    /// Defender's aggregated defense, already attenuated by fatigue.
    pub defense: f32,
    /// Defender equipment bonus against the attacker's category.
    pub defense_vs_category: f32,
    pub tile: TileContext,
    /// Product of the attacker's ability damage multipliers.
    pub damage_multiplier: f32,
    /// Living attacker-faction units adjacent to the defender, attacker included.
    pub adjacent_allies: u32,
    /// `attacker.elevation - defender.elevation`.
    pub elevation_diff: f32,
}

/// Intermediate values of one damage evaluation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DamageBreakdown {
    pub tile_bonus: f32,
    pub attacker_value: f32,
    pub defender_value: f32,
    /// `max(0, attacker - defender - tile)`; never negative.
    pub raw: f32,
    pub flank_multiplier: f32,
    pub elevation_multiplier: f32,
    pub damage: i32,
}

/// Biome bonus plus the hill bonus.
pub fn tile_bonus(tile: &TileContext, config: &CombatConfig) -> f32 {
    let hill = if tile.is_hill {
        config.hill_defense_bonus
    } else {
        0.0
    };
    tile.biome_defense_bonus + hill
}

/// Flanking multiplier for `adjacent_allies` attackers around the defender.
///
/// Only applies when allies beyond the attacker itself are adjacent; then
/// every adjacent ally counts: three flankers give `1.3`, a lone attacker `1.0`.
pub fn flank_multiplier(adjacent_allies: u32, config: &CombatConfig) -> f32 {
    let supporting = adjacent_allies.saturating_sub(1);
    if supporting == 0 {
        return 1.0;
    }
    1.0 + config.flank_bonus_per_ally * adjacent_allies as f32
}

/// `1 + clamp(diff × step, -cap, cap)`.
pub fn elevation_multiplier(elevation_diff: f32, config: &CombatConfig) -> f32 {
    1.0 + (elevation_diff * config.elevation_step)
        .clamp(-config.elevation_cap, config.elevation_cap)
}

/// Evaluates the damage formula once.
///
/// # Formula
///
/// ```text
/// tile     = biome_bonus + (hill ? hill_bonus : 0)
/// attacker = attack + attack_vs(defender.category)
/// defender = (defense + defense_vs(attacker.category) + improvement_add) × (1 + improvement_pct)
/// raw      = max(0, attacker - defender - tile)
/// damage   = round(raw × ability_multiplier)
/// damage   = round(damage × flank)          if flanked
/// damage   = max(0, round(damage × elevation))
/// ```
pub fn calculate_damage(inputs: &DamageInputs, config: &CombatConfig) -> DamageBreakdown {
    let tile_bonus = tile_bonus(&inputs.tile, config);
    let attacker_value = inputs.attack + inputs.attack_vs_category;
    let defender_value = (inputs.defense
        + inputs.defense_vs_category
        + inputs.tile.improvement_defense_add)
        * (1.0 + inputs.tile.improvement_defense_pct);

    let raw = (attacker_value - defender_value - tile_bonus).max(0.0);
    let mut damage = (raw * inputs.damage_multiplier).round();

    let flank = flank_multiplier(inputs.adjacent_allies, config);
    if flank != 1.0 {
        damage = (damage * flank).round();
    }

    let elevation = elevation_multiplier(inputs.elevation_diff, config);
    let damage = (damage * elevation).round().max(0.0) as i32;

    DamageBreakdown {
        tile_bonus,
        attacker_value,
        defender_value,
        raw,
        flank_multiplier: flank,
        elevation_multiplier: elevation,
        damage,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(attack: f32, defense: f32) -> DamageInputs {
        DamageInputs {
            attack,
            attack_vs_category: 0.0,
            defense,
            defense_vs_category: 0.0,
            tile: TileContext::default(),
            damage_multiplier: 1.0,
            adjacent_allies: 1,
            elevation_diff: 0.0,
        }
    }

    #[test]
    fn basic_exchange() {
        let config = CombatConfig::default();
        let result = calculate_damage(&plain(10.0, 4.0), &config);
        assert_eq!(result.raw, 6.0);
        assert_eq!(result.damage, 6);
    }

    #[test]
    fn raw_never_negative() {
        let config = CombatConfig::default();
        let mut inputs = plain(3.0, 10.0);
        inputs.tile.is_hill = true;
        inputs.elevation_diff = -100.0;
        let result = calculate_damage(&inputs, &config);
        assert_eq!(result.raw, 0.0);
        assert_eq!(result.damage, 0);
    }

    #[test]
    fn hill_and_biome_reduce_damage() {
        let config = CombatConfig::default();
        let mut inputs = plain(10.0, 4.0);
        inputs.tile.is_hill = true;
        inputs.tile.biome_defense_bonus = 1.0;
        assert_eq!(calculate_damage(&inputs, &config).damage, 3);
    }

    #[test]
    fn improvements_scale_defense() {
        let config = CombatConfig::default();
        let mut inputs = plain(20.0, 4.0);
        inputs.defense_vs_category = 2.0;
        inputs.tile.improvement_defense_add = 2.0;
        inputs.tile.improvement_defense_pct = 0.5;
        // defender = (4 + 2 + 2) × 1.5 = 12
        let result = calculate_damage(&inputs, &config);
        assert_eq!(result.defender_value, 12.0);
        assert_eq!(result.damage, 8);
    }

    #[test]
    fn category_bonus_adds_to_attack() {
        let config = CombatConfig::default();
        let mut inputs = plain(10.0, 4.0);
        inputs.attack_vs_category = 5.0;
        assert_eq!(calculate_damage(&inputs, &config).damage, 11);
    }

    #[test]
    fn ability_multiplier_scales_raw() {
        let config = CombatConfig::default();
        let mut inputs = plain(10.0, 5.0);
        inputs.damage_multiplier = 1.5;
        // round(5 × 1.5) = round(7.5) = 8
        assert_eq!(calculate_damage(&inputs, &config).damage, 8);
    }

    #[test]
    fn flanking_multipliers() {
        let config = CombatConfig::default();
        assert_eq!(flank_multiplier(1, &config), 1.0);
        assert_eq!(flank_multiplier(0, &config), 1.0);
        assert!((flank_multiplier(3, &config) - 1.3).abs() < 1e-6);

        let mut inputs = plain(20.0, 0.0);
        inputs.adjacent_allies = 3;
        assert_eq!(calculate_damage(&inputs, &config).damage, 26);
    }

    #[test]
    fn elevation_is_capped() {
        let config = CombatConfig::default();
        assert!((elevation_multiplier(2.0, &config) - 1.04).abs() < 1e-6);
        assert!((elevation_multiplier(50.0, &config) - 1.1).abs() < 1e-6);
        assert!((elevation_multiplier(-50.0, &config) - 0.9).abs() < 1e-6);

        let mut inputs = plain(20.0, 0.0);
        inputs.elevation_diff = 10.0;
        assert_eq!(calculate_damage(&inputs, &config).damage, 22);
    }
}
