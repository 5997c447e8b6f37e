//! Balance parameter tables.
//!
//! Every tunable constant in the combat and movement formulas is read
//! through [`BalanceOracle`] so hosts can swap numbers without touching the
//! pipelines. [`DefaultBalance`] is the compiled-in table.

use super::items::WeaponClass;

/// Movement cost and pacing parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MovementParams {
    /// AP cost of entering an ordinary cell before modifiers.
    pub base_tile_cost: f32,
    /// Multiplier for diagonal steps.
    pub diagonal_factor: f32,
    /// Presentation ticks per cell transition.
    pub transit_ticks: u64,
}

/// Turning parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TurnParams {
    /// AP budget granted at each turn hand-off.
    pub ap_per_turn: u32,
    /// AP cost per 45-degree rotation segment.
    pub segment_cost: f32,
    /// Presentation ticks per rotation segment.
    pub ticks_per_segment: u64,
}

/// Attack pacing and damage constants.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AttackParams {
    /// AP cost of an attack before the weapon-class modifier.
    pub base_cost: u32,
    /// Damage dealt bare-handed with no gloves equipped.
    pub unarmed_damage: u32,
    /// Armor-durability effectiveness of an unarmed strike.
    pub unarmed_effectiveness: f32,
    /// Armor pierce of an unarmed strike.
    pub unarmed_pierce: f32,
    /// Flat damage added per intact glove when striking unarmed.
    pub glove_damage_bonus: u32,
    /// Per-hand efficiency applied to each weapon's damage when dual wielding.
    pub dual_wield_efficiency: f32,
    /// Weapon durability wear proportional to armor defense absorbed.
    pub weapon_wear_factor: f32,
    /// Flat weapon durability wear per landed hit.
    pub weapon_wear_base: u32,
    /// Presentation ticks for an attack animation.
    pub swing_ticks: u64,
    /// Ticks the melee-hit marker stays fresh for reaction systems.
    pub melee_hit_window: u64,
}

/// Defensive roll parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DefenseParams {
    /// Base dodge chance, percent.
    pub dodge_chance: u32,
    /// Block chance when blocking with a weapon rather than a shield, percent.
    pub weapon_block_chance: u32,
    /// Chance a successful block knocks the blocking item from hand, percent.
    pub fumble_chance: u32,
    /// Hit-location weights in [`crate::state::BodyPartKind`] declaration
    /// order (head, torso, arm, hand, leg, foot). Need not sum to 100.
    pub hit_weights: [u32; 6],
}

/// Costs for the instant utility actions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UtilityParams {
    pub interact_cost: u32,
    pub inventory_cost: u32,
    /// Maximum step distance at which an interaction target is reachable.
    pub interact_range: u32,
}

/// Balance tables consumed by the simulation core.
pub trait BalanceOracle: Send + Sync {
    fn movement(&self) -> MovementParams;
    fn turning(&self) -> TurnParams;
    fn attack(&self) -> AttackParams;
    fn defense(&self) -> DefenseParams;
    fn utility(&self) -> UtilityParams;

    /// AP-cost multiplier for a weapon class, or `None` for classes this
    /// table does not recognize. Callers fall back to 1.0 and surface a
    /// diagnostic; an unknown class is never fatal.
    fn attack_cost_modifier(&self, class: WeaponClass) -> Option<f32>;
}

/// Compiled-in balance table.
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultBalance;

impl BalanceOracle for DefaultBalance {
    fn movement(&self) -> MovementParams {
        MovementParams {
            base_tile_cost: 3.0,
            diagonal_factor: 1.4,
            transit_ticks: 4,
        }
    }

    fn turning(&self) -> TurnParams {
        TurnParams {
            ap_per_turn: 20,
            segment_cost: 1.0,
            ticks_per_segment: 1,
        }
    }

    fn attack(&self) -> AttackParams {
        AttackParams {
            base_cost: 6,
            unarmed_damage: 5,
            unarmed_effectiveness: 0.2,
            unarmed_pierce: 0.0,
            glove_damage_bonus: 1,
            dual_wield_efficiency: 0.75,
            weapon_wear_factor: 0.25,
            weapon_wear_base: 1,
            swing_ticks: 6,
            melee_hit_window: 8,
        }
    }

    fn defense(&self) -> DefenseParams {
        DefenseParams {
            dodge_chance: 15,
            weapon_block_chance: 10,
            fumble_chance: 10,
            hit_weights: [10, 40, 15, 10, 15, 10],
        }
    }

    fn utility(&self) -> UtilityParams {
        UtilityParams {
            interact_cost: 2,
            inventory_cost: 4,
            interact_range: 1,
        }
    }

    fn attack_cost_modifier(&self, class: WeaponClass) -> Option<f32> {
        match class {
            WeaponClass::Unarmed => Some(0.8),
            WeaponClass::Knife => Some(0.8),
            WeaponClass::Sword => Some(1.0),
            WeaponClass::Axe => Some(1.2),
            WeaponClass::Mace => Some(1.2),
            WeaponClass::Spear => Some(1.1),
            WeaponClass::Bow => Some(1.3),
            WeaponClass::Crossbow => Some(1.5),
            WeaponClass::Thrown => Some(1.0),
            WeaponClass::Other(_) => None,
        }
    }
}
