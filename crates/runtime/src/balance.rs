//! Data-driven balance tables.
//!
//! Hosts ship tuning as JSON; anything absent falls back to the built-in
//! defaults. The weapon-class cost table is keyed by class name so
//! designers can tune it without touching code.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

use sim_core::{
    AttackParams, BalanceOracle, DefaultBalance, DefenseParams, MovementParams, TurnParams,
    UtilityParams, WeaponClass,
};

use crate::error::Result;

/// Balance override table, deserializable from JSON.
///
/// Every section is optional; missing sections resolve to the defaults in
/// [`DefaultBalance`].
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BalanceConfig {
    pub movement: Option<MovementParams>,
    pub turning: Option<TurnParams>,
    pub attack: Option<AttackParams>,
    pub defense: Option<DefenseParams>,
    pub utility: Option<UtilityParams>,
    /// AP cost multiplier per weapon class name ("sword", "bow", ...).
    pub attack_cost_modifiers: BTreeMap<String, f32>,
}

impl BalanceConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

impl BalanceOracle for BalanceConfig {
    fn movement(&self) -> MovementParams {
        self.movement.unwrap_or_else(|| DefaultBalance.movement())
    }

    fn turning(&self) -> TurnParams {
        self.turning.unwrap_or_else(|| DefaultBalance.turning())
    }

    fn attack(&self) -> AttackParams {
        self.attack.unwrap_or_else(|| DefaultBalance.attack())
    }

    fn defense(&self) -> DefenseParams {
        self.defense.unwrap_or_else(|| DefaultBalance.defense())
    }

    fn utility(&self) -> UtilityParams {
        self.utility.unwrap_or_else(|| DefaultBalance.utility())
    }

    fn attack_cost_modifier(&self, class: WeaponClass) -> Option<f32> {
        let key = class_key(class);
        match self.attack_cost_modifiers.get(key) {
            Some(&modifier) => Some(modifier),
            None => {
                let fallback = DefaultBalance.attack_cost_modifier(class);
                if fallback.is_none() {
                    // Unknown subtype is a tuning gap, not an error: the
                    // scheduler will fall back to the base attack cost.
                    warn!(
                        target: "runtime::balance",
                        class = key,
                        "no AP cost modifier for weapon class, using base cost"
                    );
                }
                fallback
            }
        }
    }
}

fn class_key(class: WeaponClass) -> &'static str {
    match class {
        WeaponClass::Unarmed => "unarmed",
        WeaponClass::Knife => "knife",
        WeaponClass::Sword => "sword",
        WeaponClass::Axe => "axe",
        WeaponClass::Mace => "mace",
        WeaponClass::Spear => "spear",
        WeaponClass::Bow => "bow",
        WeaponClass::Crossbow => "crossbow",
        WeaponClass::Thrown => "thrown",
        WeaponClass::Other(_) => "other",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_matches_defaults() {
        let config = BalanceConfig::from_json("{}").unwrap();
        assert_eq!(
            config.movement().base_tile_cost,
            DefaultBalance.movement().base_tile_cost
        );
        assert_eq!(config.attack().base_cost, DefaultBalance.attack().base_cost);
    }

    #[test]
    fn sections_override_independently() {
        let config = BalanceConfig::from_json(
            r#"{
                "turning": {
                    "ap_per_turn": 30,
                    "segment_cost": 2.0,
                    "ticks_per_segment": 1
                },
                "attack_cost_modifiers": { "sword": 1.5 }
            }"#,
        )
        .unwrap();

        assert_eq!(config.turning().ap_per_turn, 30);
        assert_eq!(config.attack_cost_modifier(WeaponClass::Sword), Some(1.5));
        // Untouched sections keep their defaults.
        assert_eq!(
            config.movement().transit_ticks,
            DefaultBalance.movement().transit_ticks
        );
    }

    #[test]
    fn unknown_class_modifier_is_absent() {
        let config = BalanceConfig::default();
        assert_eq!(config.attack_cost_modifier(WeaponClass::Other(99)), None);
    }
}
