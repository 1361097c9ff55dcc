//! Equipment slots.
//!
//! Slots reference item definitions by [`ItemId`]; the definitions live in
//! the content catalog and are shared by every unit that equips them.

use super::common::ItemId;

/// The five independent equipment slots.
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
pub enum EquipmentSlot {
    Weapon,
    RangedWeapon,
    Shield,
    Armor,
    Misc,
}

impl EquipmentSlot {
    pub const ALL: [EquipmentSlot; 5] = [
        EquipmentSlot::Weapon,
        EquipmentSlot::RangedWeapon,
        EquipmentSlot::Shield,
        EquipmentSlot::Armor,
        EquipmentSlot::Misc,
    ];
}

/// Items currently equipped by a unit.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Equipment {
    pub weapon: Option<ItemId>,
    pub ranged_weapon: Option<ItemId>,
    pub shield: Option<ItemId>,
    pub armor: Option<ItemId>,
    pub misc: Option<ItemId>,
}

impl Equipment {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn get(&self, slot: EquipmentSlot) -> Option<&ItemId> {
        self.slot(slot).as_ref()
    }

    /// Equips `item` in `slot`, returning the previously equipped item.
    pub fn equip(&mut self, slot: EquipmentSlot, item: ItemId) -> Option<ItemId> {
        self.slot_mut(slot).replace(item)
    }

    pub fn unequip(&mut self, slot: EquipmentSlot) -> Option<ItemId> {
        self.slot_mut(slot).take()
    }

    /// Iterates over every equipped item.
    pub fn items(&self) -> impl Iterator<Item = (EquipmentSlot, &ItemId)> {
        EquipmentSlot::ALL
            .into_iter()
            .filter_map(|slot| self.get(slot).map(|item| (slot, item)))
    }

    fn slot(&self, slot: EquipmentSlot) -> &Option<ItemId> {
        match slot {
            EquipmentSlot::Weapon => &self.weapon,
            EquipmentSlot::RangedWeapon => &self.ranged_weapon,
            EquipmentSlot::Shield => &self.shield,
            EquipmentSlot::Armor => &self.armor,
            EquipmentSlot::Misc => &self.misc,
        }
    }

    fn slot_mut(&mut self, slot: EquipmentSlot) -> &mut Option<ItemId> {
        match slot {
            EquipmentSlot::Weapon => &mut self.weapon,
            EquipmentSlot::RangedWeapon => &mut self.ranged_weapon,
            EquipmentSlot::Shield => &mut self.shield,
            EquipmentSlot::Armor => &mut self.armor,
            EquipmentSlot::Misc => &mut self.misc,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equip_returns_previous_item() {
        let mut equipment = Equipment::empty();
        assert_eq!(equipment.equip(EquipmentSlot::Weapon, "sword".into()), None);
        assert_eq!(
            equipment.equip(EquipmentSlot::Weapon, "axe".into()),
            Some(ItemId::new("sword"))
        );
        assert_eq!(equipment.items().count(), 1);
        assert_eq!(equipment.unequip(EquipmentSlot::Weapon), Some(ItemId::new("axe")));
        assert_eq!(equipment.items().count(), 0);
    }
}
