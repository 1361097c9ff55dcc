//! Faction-wide research and culture bonuses.
//!
//! A faction only records which sources it has researched or adopted. The
//! bonus for a unit is recomputed from those sources on every query, summing
//! all matching modifiers into one stack so the additive part and the
//! percentage part are each applied once.

use super::aggregate::StatBonuses;
use crate::env::{BonusSource, BonusSourceKind, Env};
use crate::state::{BonusSourceId, FactionId, ItemId, TemplateId};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Faction {
    pub id: FactionId,
    researched: Vec<BonusSourceId>,
    cultures: Vec<BonusSourceId>,
}

impl Faction {
    pub fn new(id: FactionId) -> Self {
        Self {
            id,
            researched: Vec::new(),
            cultures: Vec::new(),
        }
    }

    pub fn researched(&self) -> &[BonusSourceId] {
        &self.researched
    }

    pub fn cultures(&self) -> &[BonusSourceId] {
        &self.cultures
    }

    /// Records a source. Returns `false` if it was already active.
    pub fn activate(&mut self, kind: BonusSourceKind, source: BonusSourceId) -> bool {
        let list = match kind {
            BonusSourceKind::Research => &mut self.researched,
            BonusSourceKind::Culture => &mut self.cultures,
        };
        if list.contains(&source) {
            return false;
        }
        list.push(source);
        true
    }

    fn sources<'a>(&'a self, env: &'a Env) -> impl Iterator<Item = BonusSource> + 'a {
        self.researched
            .iter()
            .chain(self.cultures.iter())
            .filter_map(|id| env.bonus_source_or_warn(id))
    }

    /// Bonuses all active sources grant to units of `template`.
    pub fn unit_bonuses(&self, env: &Env, template: &TemplateId) -> StatBonuses {
        let mut bonuses = StatBonuses::new();
        for source in self.sources(env) {
            for bonus in source.unit_bonuses.iter().filter(|b| &b.template == template) {
                bonuses.add_modifier(&bonus.modifier);
            }
        }
        bonuses
    }

    /// Bonuses all active sources grant to the given equipped items, summed
    /// over every item.
    pub fn equipment_bonuses<'i>(
        &self,
        env: &Env,
        items: impl IntoIterator<Item = &'i ItemId> + Clone,
    ) -> StatBonuses {
        let mut bonuses = StatBonuses::new();
        for source in self.sources(env) {
            for item in items.clone() {
                for bonus in source.equipment_bonuses.iter().filter(|b| &b.item == item) {
                    bonuses.add_modifier(&bonus.modifier);
                }
            }
        }
        bonuses
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::env::{Biome, CatalogSnapshot, GridWorld, TileData};
    use crate::stats::{StatKind, StatModifier};

    fn env() -> Env {
        let catalog = CatalogSnapshot::new()
            .with_bonus_source(
                BonusSource::new("bronze_working", BonusSourceKind::Research)
                    .with_unit_bonus("spearman", StatModifier::new(StatKind::Attack, 1.0, 0.1))
                    .with_equipment_bonus("spear", StatModifier::flat(StatKind::Attack, 2.0)),
            )
            .with_bonus_source(
                BonusSource::new("militarism", BonusSourceKind::Culture)
                    .with_unit_bonus("spearman", StatModifier::new(StatKind::Attack, 1.0, 0.2)),
            );
        Env::new(
            Arc::new(GridWorld::new(1, 1, TileData::land(Biome::Plains))),
            Arc::new(catalog),
        )
    }

    #[test]
    fn research_and_culture_sum() {
        let env = env();
        let mut faction = Faction::new(FactionId(1));
        faction.activate(BonusSourceKind::Research, "bronze_working".into());
        faction.activate(BonusSourceKind::Culture, "militarism".into());

        let bonuses = faction.unit_bonuses(&env, &"spearman".into());
        assert_eq!(bonuses.attack.flat_sum(), 2.0);
        assert!((bonuses.attack.increased_sum() - 0.3).abs() < 1e-6);

        let other = faction.unit_bonuses(&env, &"archer".into());
        assert!(other.attack.is_empty());
    }

    #[test]
    fn equipment_bonuses_follow_equipped_items() {
        let env = env();
        let mut faction = Faction::new(FactionId(1));
        faction.activate(BonusSourceKind::Research, "bronze_working".into());

        let spear = ItemId::new("spear");
        let bonuses = faction.equipment_bonuses(&env, [&spear, &spear]);
        assert_eq!(bonuses.attack.flat_sum(), 4.0);
        assert!(
            faction
                .equipment_bonuses(&env, Vec::<&ItemId>::new())
                .attack
                .is_empty()
        );
    }

    #[test]
    fn activation_is_idempotent_and_missing_sources_are_ignored() {
        let env = env();
        let mut faction = Faction::new(FactionId(1));
        assert!(faction.activate(BonusSourceKind::Research, "unknown".into()));
        assert!(!faction.activate(BonusSourceKind::Research, "unknown".into()));
        assert!(faction.unit_bonuses(&env, &"spearman".into()).attack.is_empty());
    }
}
