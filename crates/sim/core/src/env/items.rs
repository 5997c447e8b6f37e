//! Read-only equipment stat queries.
//!
//! Item definitions (stat tables) live outside the core; the simulation
//! looks them up by handle. Durability is the one mutable item property and
//! it lives in [`crate::state::EquippedItem`], not here.

use crate::state::ItemHandle;

/// Broad weapon classification driving the AP-cost modifier table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum WeaponClass {
    Unarmed,
    Knife,
    Sword,
    Axe,
    Mace,
    Spear,
    Bow,
    Crossbow,
    Thrown,
    /// Content-defined class unknown to the core's cost table.
    Other(u16),
}

/// Static weapon definition.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WeaponStats {
    pub class: WeaponClass,
    pub damage: u32,
    pub min_range: u32,
    pub max_range: u32,
    /// How strongly this weapon chews through armor durability, [0, 1]-ish.
    pub effectiveness: f32,
    /// Fraction of post-reduction damage that bypasses armor, clamped [0, 1].
    pub armor_pierce: f32,
    /// Requires both hands; excludes an off-hand weapon or shield.
    pub two_handed: bool,
    /// Fires a projectile and pairs with equipped ammunition.
    pub projectile: bool,
    /// Usable to block incoming melee when no shield is held.
    pub can_block: bool,
    pub encumbrance: f32,
}

impl WeaponStats {
    /// Returns true if this weapon can deliver a melee hit (range 1).
    pub fn is_melee(&self) -> bool {
        self.min_range <= 1 && !self.projectile
    }
}

/// Static armor-piece definition.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ArmorStats {
    pub defense: f32,
    pub encumbrance: f32,
}

/// Static shield definition.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ShieldStats {
    pub defense: f32,
    /// Chance to block an incoming hit, percent.
    pub block_chance: u32,
    pub encumbrance: f32,
}

/// Static ammunition definition; averaged with the launcher's stats for
/// projectile attacks.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AmmoStats {
    pub damage: u32,
    pub effectiveness: f32,
    pub armor_pierce: f32,
}

/// Read-only item catalog queries.
///
/// A handle resolves to at most one category; lookups in the wrong
/// category return `None` and the combat formulas fall back to their
/// unarmed/no-armor constants.
pub trait ItemOracle: Send + Sync {
    fn weapon(&self, handle: ItemHandle) -> Option<WeaponStats>;
    fn armor(&self, handle: ItemHandle) -> Option<ArmorStats>;
    fn shield(&self, handle: ItemHandle) -> Option<ShieldStats>;
    fn ammo(&self, handle: ItemHandle) -> Option<AmmoStats>;
}

/// Empty catalog: every lookup misses, so all combat falls back to the
/// unarmed/no-armor constants. Default for headless hosts and tests.
#[derive(Clone, Copy, Debug, Default)]
pub struct EmptyCatalog;

impl ItemOracle for EmptyCatalog {
    fn weapon(&self, _handle: ItemHandle) -> Option<WeaponStats> {
        None
    }

    fn armor(&self, _handle: ItemHandle) -> Option<ArmorStats> {
        None
    }

    fn shield(&self, _handle: ItemHandle) -> Option<ShieldStats> {
        None
    }

    fn ammo(&self, _handle: ItemHandle) -> Option<AmmoStats> {
        None
    }
}
