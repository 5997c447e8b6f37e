//! Equipped item instances and their durability state.
//!
//! Item *definitions* (stats tables) are external: the core only stores a
//! handle plus the mutable durability meter. Stats are looked up through
//! [`crate::env::ItemOracle`]. An item at zero durability stays equipped but
//! contributes nothing offensively or defensively.

use std::fmt;

use super::common::Meter;

/// Opaque reference into the external item catalog.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemHandle(pub u16);

impl fmt::Display for ItemHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "item:{}", self.0)
    }
}

/// A weapon, shield, armor piece, or ammunition stack carried by an actor.
///
/// Durability monotonically decreases and is floored at zero; breaking does
/// not unequip the item.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EquippedItem {
    pub handle: ItemHandle,
    pub durability: Meter,
}

impl EquippedItem {
    pub fn new(handle: ItemHandle, max_durability: u32) -> Self {
        Self {
            handle,
            durability: Meter::full(max_durability),
        }
    }

    /// Applies durability wear, clamped at zero.
    pub fn damage_durability(&mut self, amount: u32) {
        self.durability.damage(amount);
    }

    /// Returns true if the item still has durability to contribute.
    #[inline]
    pub fn is_intact(&self) -> bool {
        !self.durability.is_empty()
    }
}

/// Armor slot identifiers. Each slot maps onto body parts via
/// [`super::body::BodyPartKind::armor_layers`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::EnumIter)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ArmorSlot {
    Helmet,
    BodyArmor,
    Shirt,
    Gloves,
    LegArmor,
    Boots,
}

/// Everything an actor has equipped.
///
/// The off hand holds either a shield or a second weapon; dual wielding is
/// detected by both hands holding weapons (see the resolver's hand-efficiency
/// averaging). Ammunition is paired with the main-hand weapon for projectile
/// attacks.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Equipment {
    pub main_hand: Option<EquippedItem>,
    pub off_hand: Option<EquippedItem>,
    pub ammo: Option<EquippedItem>,

    pub helmet: Option<EquippedItem>,
    pub body_armor: Option<EquippedItem>,
    pub shirt: Option<EquippedItem>,
    pub gloves: Option<EquippedItem>,
    pub leg_armor: Option<EquippedItem>,
    pub boots: Option<EquippedItem>,
}

impl Equipment {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn armor(&self, slot: ArmorSlot) -> Option<&EquippedItem> {
        self.armor_slot(slot).as_ref()
    }

    pub fn armor_mut(&mut self, slot: ArmorSlot) -> Option<&mut EquippedItem> {
        self.armor_slot_mut(slot).as_mut()
    }

    pub fn set_armor(&mut self, slot: ArmorSlot, item: Option<EquippedItem>) {
        *self.armor_slot_mut(slot) = item;
    }

    /// Drops the off-hand item (block fumble). Returns the dropped item.
    pub fn fumble_off_hand(&mut self) -> Option<EquippedItem> {
        self.off_hand.take()
    }

    fn armor_slot(&self, slot: ArmorSlot) -> &Option<EquippedItem> {
        match slot {
            ArmorSlot::Helmet => &self.helmet,
            ArmorSlot::BodyArmor => &self.body_armor,
            ArmorSlot::Shirt => &self.shirt,
            ArmorSlot::Gloves => &self.gloves,
            ArmorSlot::LegArmor => &self.leg_armor,
            ArmorSlot::Boots => &self.boots,
        }
    }

    fn armor_slot_mut(&mut self, slot: ArmorSlot) -> &mut Option<EquippedItem> {
        match slot {
            ArmorSlot::Helmet => &mut self.helmet,
            ArmorSlot::BodyArmor => &mut self.body_armor,
            ArmorSlot::Shirt => &mut self.shirt,
            ArmorSlot::Gloves => &mut self.gloves,
            ArmorSlot::LegArmor => &mut self.leg_armor,
            ArmorSlot::Boots => &mut self.boots,
        }
    }
}
