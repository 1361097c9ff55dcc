use crate::state::{
    AbilityId, BonusSourceId, Capabilities, EquipmentSlot, ItemId, TemplateId, UnitCategory,
    UnitKind,
};
use crate::stats::{BaseStats, StatModifier};

/// Static content definitions: unit templates, equipment, abilities and the
/// research/culture sources of faction bonuses.
pub trait CatalogOracle: Send + Sync {
    fn template(&self, id: &TemplateId) -> Option<UnitTemplate>;
    fn item(&self, id: &ItemId) -> Option<EquipmentItem>;
    fn ability(&self, id: &AbilityId) -> Option<Ability>;
    fn bonus_source(&self, id: &BonusSourceId) -> Option<BonusSource>;
}

/// Data template a unit is spawned from.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnitTemplate {
    pub id: TemplateId,
    #[cfg_attr(feature = "serde", serde(default))]
    pub kind: UnitKind,
    #[cfg_attr(feature = "serde", serde(default))]
    pub category: UnitCategory,
    #[cfg_attr(feature = "serde", serde(default))]
    pub capabilities: Capabilities,
    pub base: BaseStats,
    pub max_morale: f32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub max_ammo: u32,
    /// Morale lost per point of damage taken.
    pub morale_lost_per_health: f32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub transport_capacity: u8,
    #[cfg_attr(feature = "serde", serde(default))]
    pub starting_equipment: Vec<(EquipmentSlot, ItemId)>,
    /// Abilities unlocked on reaching a level.
    #[cfg_attr(feature = "serde", serde(default))]
    pub ability_unlocks: Vec<AbilityUnlock>,
}

impl UnitTemplate {
    /// Zero-stat stand-in used when a template reference cannot be resolved.
    pub fn fallback(id: TemplateId) -> Self {
        Self {
            id,
            kind: UnitKind::Combat,
            category: UnitCategory::Land,
            capabilities: Capabilities::empty(),
            base: BaseStats::default(),
            max_morale: 0.0,
            max_ammo: 0,
            morale_lost_per_health: 0.0,
            transport_capacity: 0,
            starting_equipment: Vec::new(),
            ability_unlocks: Vec::new(),
        }
    }

    /// Ability unlocked when reaching exactly `level`, if any.
    pub fn unlock_at(&self, level: u32) -> Option<&AbilityId> {
        self.ability_unlocks
            .iter()
            .find(|unlock| unlock.level == level)
            .map(|unlock| &unlock.ability)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AbilityUnlock {
    pub level: u32,
    pub ability: AbilityId,
}

/// Launch descriptor of a ranged weapon; its presence makes the item ranged.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RangedPayload {
    /// Projectile kind the renderer should spawn.
    pub projectile: String,
    pub speed: f32,
}

/// Category-specific bonus row of an item.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CategoryBonus {
    pub category: UnitCategory,
    pub value: i32,
}

/// Static equipment definition, shared by every unit that equips it.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EquipmentItem {
    pub id: ItemId,
    pub slot: EquipmentSlot,
    #[cfg_attr(feature = "serde", serde(default))]
    pub modifiers: Vec<StatModifier>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub ranged: Option<RangedPayload>,
    /// Extra attack against specific enemy categories.
    #[cfg_attr(feature = "serde", serde(default))]
    pub attack_vs: Vec<CategoryBonus>,
    /// Extra defense when attacked by specific categories.
    #[cfg_attr(feature = "serde", serde(default))]
    pub defense_vs: Vec<CategoryBonus>,
}

impl EquipmentItem {
    pub fn new(id: impl Into<ItemId>, slot: EquipmentSlot) -> Self {
        Self {
            id: id.into(),
            slot,
            modifiers: Vec::new(),
            ranged: None,
            attack_vs: Vec::new(),
            defense_vs: Vec::new(),
        }
    }

    pub fn with_modifier(mut self, modifier: StatModifier) -> Self {
        self.modifiers.push(modifier);
        self
    }

    pub fn with_ranged(mut self, projectile: impl Into<String>, speed: f32) -> Self {
        self.ranged = Some(RangedPayload {
            projectile: projectile.into(),
            speed,
        });
        self
    }

    pub fn with_attack_vs(mut self, category: UnitCategory, value: i32) -> Self {
        self.attack_vs.push(CategoryBonus { category, value });
        self
    }

    pub fn with_defense_vs(mut self, category: UnitCategory, value: i32) -> Self {
        self.defense_vs.push(CategoryBonus { category, value });
        self
    }

    pub fn is_ranged(&self) -> bool {
        self.ranged.is_some()
    }

    pub fn attack_bonus_against(&self, category: UnitCategory) -> i32 {
        sum_for(&self.attack_vs, category)
    }

    pub fn defense_bonus_against(&self, category: UnitCategory) -> i32 {
        sum_for(&self.defense_vs, category)
    }
}

fn sum_for(rows: &[CategoryBonus], category: UnitCategory) -> i32 {
    rows.iter()
        .filter(|row| row.category == category)
        .map(|row| row.value)
        .sum()
}

/// Unlockable ability. Flat modifiers sum; damage multipliers multiply.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Ability {
    pub id: AbilityId,
    #[cfg_attr(feature = "serde", serde(default))]
    pub attack: i32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub defense: i32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub health: i32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub range: f32,
    #[cfg_attr(feature = "serde", serde(default = "default_multiplier"))]
    pub damage_multiplier: f32,
}

#[cfg(feature = "serde")]
fn default_multiplier() -> f32 {
    1.0
}

impl Ability {
    pub fn new(id: impl Into<AbilityId>) -> Self {
        Self {
            id: id.into(),
            attack: 0,
            defense: 0,
            health: 0,
            range: 0.0,
            damage_multiplier: 1.0,
        }
    }
}

/// Whether a bonus source is a technology or a culture.
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
pub enum BonusSourceKind {
    Research,
    Culture,
}

/// Modifier targeting one unit template.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TemplateBonus {
    pub template: TemplateId,
    pub modifier: StatModifier,
}

/// Modifier targeting one equipment template.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemBonus {
    pub item: ItemId,
    pub modifier: StatModifier,
}

/// A researched technology or adopted culture and the bonuses it grants.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BonusSource {
    pub id: BonusSourceId,
    pub kind: BonusSourceKind,
    #[cfg_attr(feature = "serde", serde(default))]
    pub unit_bonuses: Vec<TemplateBonus>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub equipment_bonuses: Vec<ItemBonus>,
}

impl BonusSource {
    pub fn new(id: impl Into<BonusSourceId>, kind: BonusSourceKind) -> Self {
        Self {
            id: id.into(),
            kind,
            unit_bonuses: Vec::new(),
            equipment_bonuses: Vec::new(),
        }
    }

    pub fn with_unit_bonus(mut self, template: impl Into<TemplateId>, modifier: StatModifier) -> Self {
        self.unit_bonuses.push(TemplateBonus {
            template: template.into(),
            modifier,
        });
        self
    }

    pub fn with_equipment_bonus(mut self, item: impl Into<ItemId>, modifier: StatModifier) -> Self {
        self.equipment_bonuses.push(ItemBonus {
            item: item.into(),
            modifier,
        });
        self
    }
}
