//! Stat aggregation.
//!
//! For every derived stat `S`:
//!
//! ```text
//! S  = S_base + S_equipment + S_ability
//! S' = (S  + unit_faction_add)      × (1 + unit_faction_pct)
//! S" = (S' + equipment_faction_add) × (1 + equipment_faction_pct)
//! ```
//!
//! Attack, defense and health are rounded to the nearest integer after the
//! last multiplicative step; range and movement stay fractional. The two
//! faction stages are distinct: reordering them changes results.

use super::bonus::{Bonus, BonusStack, StatBounds};
use crate::env::{Ability, EquipmentItem};

/// A stat that modifiers can target.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum StatKind {
    Attack,
    Defense,
    Health,
    Range,
    Movement,
}

/// Additive and fractional change to one stat (`percent` 0.1 = +10%).
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatModifier {
    pub stat: StatKind,
    #[cfg_attr(feature = "serde", serde(default))]
    pub flat: f32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub percent: f32,
}

impl StatModifier {
    pub fn flat(stat: StatKind, value: f32) -> Self {
        Self {
            stat,
            flat: value,
            percent: 0.0,
        }
    }

    pub fn percent(stat: StatKind, fraction: f32) -> Self {
        Self {
            stat,
            flat: 0.0,
            percent: fraction,
        }
    }

    pub fn new(stat: StatKind, flat: f32, percent: f32) -> Self {
        Self { stat, flat, percent }
    }
}

/// Template base values.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BaseStats {
    pub attack: i32,
    pub defense: i32,
    pub health: i32,
    pub range: f32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub movement: f32,
}

impl BaseStats {
    pub fn new(attack: i32, defense: i32, health: i32, range: f32, movement: f32) -> Self {
        Self {
            attack,
            defense,
            health,
            range,
            movement,
        }
    }

    pub fn get(&self, stat: StatKind) -> f32 {
        match stat {
            StatKind::Attack => self.attack as f32,
            StatKind::Defense => self.defense as f32,
            StatKind::Health => self.health as f32,
            StatKind::Range => self.range,
            StatKind::Movement => self.movement,
        }
    }
}

/// One bonus stack per stat.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StatBonuses {
    pub attack: BonusStack,
    pub defense: BonusStack,
    pub health: BonusStack,
    pub range: BonusStack,
    pub movement: BonusStack,
}

impl StatBonuses {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stack(&self, stat: StatKind) -> &BonusStack {
        match stat {
            StatKind::Attack => &self.attack,
            StatKind::Defense => &self.defense,
            StatKind::Health => &self.health,
            StatKind::Range => &self.range,
            StatKind::Movement => &self.movement,
        }
    }

    pub fn stack_mut(&mut self, stat: StatKind) -> &mut BonusStack {
        match stat {
            StatKind::Attack => &mut self.attack,
            StatKind::Defense => &mut self.defense,
            StatKind::Health => &mut self.health,
            StatKind::Range => &mut self.range,
            StatKind::Movement => &mut self.movement,
        }
    }

    /// Folds a modifier into the stack of its stat.
    pub fn add_modifier(&mut self, modifier: &StatModifier) {
        let stack = self.stack_mut(modifier.stat);
        if modifier.flat != 0.0 {
            stack.add(Bonus::flat(modifier.flat));
        }
        if modifier.percent != 0.0 {
            stack.add(Bonus::increased(modifier.percent));
        }
    }

    pub fn from_modifiers<'a>(modifiers: impl IntoIterator<Item = &'a StatModifier>) -> Self {
        let mut bonuses = Self::new();
        for modifier in modifiers {
            bonuses.add_modifier(modifier);
        }
        bonuses
    }
}

/// Final combat values of a unit.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatStats {
    pub attack: i32,
    pub defense: i32,
    pub max_health: i32,
    pub range: f32,
    pub movement: f32,
    /// Product of all unlocked abilities' damage multipliers.
    pub damage_multiplier: f32,
}

impl Default for CombatStats {
    fn default() -> Self {
        Self {
            attack: 0,
            defense: 0,
            max_health: 1,
            range: 0.0,
            movement: 0.0,
            damage_multiplier: 1.0,
        }
    }
}

/// Everything the aggregator needs for one unit.
#[derive(Clone, Copy, Debug)]
pub struct StatInputs<'a> {
    pub base: &'a BaseStats,
    pub equipment: &'a [EquipmentItem],
    pub abilities: &'a [Ability],
    /// Research/culture bonuses keyed by the unit's template, summed over sources.
    pub unit_faction: &'a StatBonuses,
    /// Research/culture bonuses keyed by any equipped item, summed over items and sources.
    pub equipment_faction: &'a StatBonuses,
}

/// Computes the final stats of a unit.
pub fn aggregate(inputs: &StatInputs<'_>) -> CombatStats {
    let value = |stat: StatKind, bounds: StatBounds| -> f32 {
        let staged = staged_base(inputs, stat);
        let after_unit = inputs.unit_faction.stack(stat).apply_unclamped(staged);
        inputs
            .equipment_faction
            .stack(stat)
            .apply(after_unit, bounds)
    };

    let damage_multiplier = inputs
        .abilities
        .iter()
        .fold(BonusStack::new(), |stack, ability| {
            stack.more(ability.damage_multiplier)
        })
        .more_product();

    CombatStats {
        attack: value(StatKind::Attack, StatBounds::COMBAT).round() as i32,
        defense: value(StatKind::Defense, StatBounds::COMBAT).round() as i32,
        max_health: value(StatKind::Health, StatBounds::HEALTH).round() as i32,
        range: value(StatKind::Range, StatBounds::DISTANCE),
        movement: value(StatKind::Movement, StatBounds::DISTANCE),
        damage_multiplier,
    }
}

/// `S_base + S_equipment + S_ability`.
///
/// Item percentages scale the base value and count as part of
/// `S_equipment`.
fn staged_base(inputs: &StatInputs<'_>, stat: StatKind) -> f32 {
    let base = inputs.base.get(stat);
    let equipment: f32 = inputs
        .equipment
        .iter()
        .flat_map(|item| item.modifiers.iter())
        .filter(|modifier| modifier.stat == stat)
        .map(|modifier| modifier.flat + base * modifier.percent)
        .sum();
    let ability: f32 = inputs
        .abilities
        .iter()
        .map(|ability| match stat {
            StatKind::Attack => ability.attack as f32,
            StatKind::Defense => ability.defense as f32,
            StatKind::Health => ability.health as f32,
            StatKind::Range => ability.range,
            StatKind::Movement => 0.0,
        })
        .sum();
    base + equipment + ability
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::EquipmentSlot;

    fn inputs<'a>(
        base: &'a BaseStats,
        equipment: &'a [EquipmentItem],
        abilities: &'a [Ability],
        unit_faction: &'a StatBonuses,
        equipment_faction: &'a StatBonuses,
    ) -> StatInputs<'a> {
        StatInputs {
            base,
            equipment,
            abilities,
            unit_faction,
            equipment_faction,
        }
    }

    #[test]
    fn base_only() {
        let base = BaseStats::new(10, 4, 20, 1.0, 2.0);
        let empty = StatBonuses::new();
        let stats = aggregate(&inputs(&base, &[], &[], &empty, &empty));
        assert_eq!(stats.attack, 10);
        assert_eq!(stats.defense, 4);
        assert_eq!(stats.max_health, 20);
        assert_eq!(stats.range, 1.0);
        assert_eq!(stats.damage_multiplier, 1.0);
    }

    #[test]
    fn equipment_and_abilities_are_additive_before_faction_stages() {
        let base = BaseStats::new(10, 4, 20, 1.0, 2.0);
        let sword = EquipmentItem::new("sword", EquipmentSlot::Weapon)
            .with_modifier(StatModifier::flat(StatKind::Attack, 3.0))
            .with_modifier(StatModifier::percent(StatKind::Attack, 0.5));
        let mut veteran = Ability::new("veteran");
        veteran.attack = 2;
        veteran.damage_multiplier = 1.5;
        let mut brutal = Ability::new("brutal");
        brutal.damage_multiplier = 2.0;

        let empty = StatBonuses::new();
        let equipment = [sword];
        let abilities = [veteran, brutal];
        let stats = aggregate(&inputs(&base, &equipment, &abilities, &empty, &empty));

        // 10 + (3 + 10 × 0.5) + 2
        assert_eq!(stats.attack, 20);
        assert_eq!(stats.damage_multiplier, 3.0);
    }

    #[test]
    fn unit_faction_stage_precedes_equipment_faction_stage() {
        let base = BaseStats::new(10, 0, 10, 0.0, 0.0);
        let unit_faction = StatBonuses::from_modifiers(&[StatModifier::new(
            StatKind::Attack,
            2.0,
            0.5,
        )]);
        let equipment_faction = StatBonuses::from_modifiers(&[StatModifier::new(
            StatKind::Attack,
            4.0,
            0.25,
        )]);

        let stats = aggregate(&inputs(&base, &[], &[], &unit_faction, &equipment_faction));
        // ((10 + 2) × 1.5 + 4) × 1.25 = 27.5 → 28
        assert_eq!(stats.attack, 28);

        let swapped = aggregate(&inputs(&base, &[], &[], &equipment_faction, &unit_faction));
        // ((10 + 4) × 1.25 + 2) × 1.5 = 29.25 → 29
        assert_eq!(swapped.attack, 29);
    }

    #[test]
    fn faction_sources_sum_before_single_application() {
        let base = BaseStats::new(100, 0, 10, 0.0, 0.0);
        let summed = StatBonuses::from_modifiers(&[
            StatModifier::percent(StatKind::Attack, 0.5),
            StatModifier::percent(StatKind::Attack, 0.5),
        ]);
        let empty = StatBonuses::new();
        let stats = aggregate(&inputs(&base, &[], &[], &summed, &empty));
        // 100 × (1 + 0.5 + 0.5); source-by-source would give 225
        assert_eq!(stats.attack, 200);
    }

    #[test]
    fn range_stays_fractional() {
        let base = BaseStats::new(0, 0, 1, 2.5, 0.0);
        let empty = StatBonuses::new();
        let bonus = StatBonuses::from_modifiers(&[StatModifier::percent(StatKind::Range, 0.1)]);
        let stats = aggregate(&inputs(&base, &[], &[], &bonus, &empty));
        assert!((stats.range - 2.75).abs() < 1e-5);
    }
}
