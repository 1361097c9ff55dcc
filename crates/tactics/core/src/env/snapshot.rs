//! In-memory catalog backed by hash maps.

use std::collections::HashMap;

use super::catalog::{Ability, BonusSource, CatalogOracle, EquipmentItem, UnitTemplate};
use crate::state::{AbilityId, BonusSourceId, ItemId, TemplateId};

/// Owned catalog snapshot. Loaders fill it; tests build it by hand.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CatalogSnapshot {
    templates: HashMap<TemplateId, UnitTemplate>,
    items: HashMap<ItemId, EquipmentItem>,
    abilities: HashMap<AbilityId, Ability>,
    bonus_sources: HashMap<BonusSourceId, BonusSource>,
}

impl CatalogSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_template(&mut self, template: UnitTemplate) {
        self.templates.insert(template.id.clone(), template);
    }

    pub fn insert_item(&mut self, item: EquipmentItem) {
        self.items.insert(item.id.clone(), item);
    }

    pub fn insert_ability(&mut self, ability: Ability) {
        self.abilities.insert(ability.id.clone(), ability);
    }

    pub fn insert_bonus_source(&mut self, source: BonusSource) {
        self.bonus_sources.insert(source.id.clone(), source);
    }

    pub fn with_template(mut self, template: UnitTemplate) -> Self {
        self.insert_template(template);
        self
    }

    pub fn with_item(mut self, item: EquipmentItem) -> Self {
        self.insert_item(item);
        self
    }

    pub fn with_ability(mut self, ability: Ability) -> Self {
        self.insert_ability(ability);
        self
    }

    pub fn with_bonus_source(mut self, source: BonusSource) -> Self {
        self.insert_bonus_source(source);
        self
    }

    pub fn template_count(&self) -> usize {
        self.templates.len()
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    pub fn ability_count(&self) -> usize {
        self.abilities.len()
    }

    pub fn bonus_source_count(&self) -> usize {
        self.bonus_sources.len()
    }
}

impl CatalogOracle for CatalogSnapshot {
    fn template(&self, id: &TemplateId) -> Option<UnitTemplate> {
        self.templates.get(id).cloned()
    }

    fn item(&self, id: &ItemId) -> Option<EquipmentItem> {
        self.items.get(id).cloned()
    }

    fn ability(&self, id: &AbilityId) -> Option<Ability> {
        self.abilities.get(id).cloned()
    }

    fn bonus_source(&self, id: &BonusSourceId) -> Option<BonusSource> {
        self.bonus_sources.get(id).cloned()
    }
}
