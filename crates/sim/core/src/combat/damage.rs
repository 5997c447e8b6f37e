//! Layered damage resolution.
//!
//! Pure functions turning (base damage, armor stats, durability state) into
//! final damage plus durability deltas. The feedback loop is the point:
//! incoming damage chews armor durability, and the durability the armor had
//! left determines how much reduction it actually provided on this hit.

use crate::env::AttackParams;

/// Damage parameters of one strike entering the armor stack.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StrikeDamage {
    pub base_damage: f32,
    /// How strongly the strike damages armor durability.
    pub effectiveness: f32,
    /// Fraction of post-reduction damage bypassing armor, clamped [0, 1].
    pub armor_pierce: f32,
}

impl StrikeDamage {
    pub fn new(base_damage: f32, effectiveness: f32, armor_pierce: f32) -> Self {
        Self {
            base_damage,
            effectiveness,
            armor_pierce: armor_pierce.clamp(0.0, 1.0),
        }
    }
}

/// One armor layer as the pipeline sees it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayerState {
    pub defense: f32,
    pub durability: u32,
}

/// What one layer did to the strike.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayerOutcome {
    /// Durability the layer loses, rounded for meter application.
    pub durability_damage: u32,
    /// Fraction of the durability hit the layer could actually absorb.
    /// Below 1.0 the layer broke mid-hit and mitigates proportionally less.
    pub done_ratio: f32,
    /// Damage reduction this layer provided (`defense x done_ratio`).
    pub reduction: f32,
    /// Damage passed through to the next layer (pierced + excess).
    pub passed: f32,
}

/// Complete outcome of the two-layer pipeline.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DamageOutcome {
    /// Health damage delivered to the body part. Never negative.
    pub final_damage: u32,
    pub layer1: Option<LayerOutcome>,
    pub layer2: Option<LayerOutcome>,
    /// Durability wear for the attacking weapon (and paired ammunition).
    pub attacker_wear: u32,
}

/// Runs one armor layer.
///
/// Durability damage is `incoming x effectiveness`. If the layer lacks the
/// durability to absorb all of it, only the covered fraction
/// (`done_ratio`) counts toward mitigation: reduction shrinks, and the
/// uncovered share of the retained damage leaks through as excess on top
/// of the pierced share.
pub fn resolve_layer(incoming: f32, strike: &StrikeDamage, layer: &LayerState) -> LayerOutcome {
    let durability_damage = incoming * strike.effectiveness;
    let done_ratio = if durability_damage <= f32::EPSILON {
        1.0
    } else {
        (layer.durability as f32 / durability_damage).min(1.0)
    };

    let reduction = layer.defense * done_ratio;
    let remaining = (incoming - reduction).max(0.0);
    let pierced = remaining * strike.armor_pierce;
    let excess = remaining * (1.0 - strike.armor_pierce) * (1.0 - done_ratio);

    LayerOutcome {
        durability_damage: durability_damage.round() as u32,
        done_ratio,
        reduction,
        passed: pierced + excess,
    }
}

/// Runs the full two-layer pipeline for one (strike, body part) pairing.
///
/// Missing layers pass damage through untouched. Weapon wear scales with
/// the defense each layer actually presented (`defense x done_ratio`) plus
/// a flat per-hit constant.
pub fn resolve_damage(
    strike: &StrikeDamage,
    layer1: Option<LayerState>,
    layer2: Option<LayerState>,
    params: &AttackParams,
) -> DamageOutcome {
    let mut carried = strike.base_damage;
    let mut absorbed_defense = 0.0;

    let layer1 = layer1.map(|layer| {
        let outcome = resolve_layer(carried, strike, &layer);
        carried = outcome.passed;
        absorbed_defense += outcome.reduction;
        outcome
    });

    let layer2 = layer2.map(|layer| {
        let outcome = resolve_layer(carried, strike, &layer);
        carried = outcome.passed;
        absorbed_defense += outcome.reduction;
        outcome
    });

    let attacker_wear =
        (absorbed_defense * params.weapon_wear_factor).round() as u32 + params.weapon_wear_base;

    DamageOutcome {
        final_damage: carried.max(0.0).round() as u32,
        layer1,
        layer2,
        attacker_wear,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::{BalanceOracle, DefaultBalance};

    fn params() -> AttackParams {
        DefaultBalance.attack()
    }

    #[test]
    fn unarmored_strike_passes_through() {
        // Base damage 5 against a bare body part: all 5 arrives.
        let strike = StrikeDamage::new(5.0, 0.5, 0.1);
        let outcome = resolve_damage(&strike, None, None, &params());
        assert_eq!(outcome.final_damage, 5);
        assert!(outcome.layer1.is_none());
        assert!(outcome.layer2.is_none());
    }

    #[test]
    fn single_layer_with_ample_durability() {
        // 20 damage, effectiveness 0.6, pierce 0.2, defense 10, durability
        // far above the 12-point durability hit: reduction is the full 10,
        // remaining 10 splits into 2 pierced + 0 excess.
        let strike = StrikeDamage::new(20.0, 0.6, 0.2);
        let layer = LayerState {
            defense: 10.0,
            durability: 500,
        };
        let outcome = resolve_damage(&strike, Some(layer), None, &params());

        let layer1 = outcome.layer1.unwrap();
        assert_eq!(layer1.durability_damage, 12);
        assert!((layer1.done_ratio - 1.0).abs() < 1e-6);
        assert!((layer1.reduction - 10.0).abs() < 1e-6);
        assert_eq!(outcome.final_damage, 2);
    }

    #[test]
    fn breaking_layer_mitigates_proportionally() {
        // Same strike, but only 6 durability against a 12-point durability
        // hit: done_ratio 0.5, reduction 5, remaining 15, pierced 3,
        // excess 15 * 0.8 * 0.5 = 6 -> 9 delivered.
        let strike = StrikeDamage::new(20.0, 0.6, 0.2);
        let layer = LayerState {
            defense: 10.0,
            durability: 6,
        };
        let outcome = resolve_damage(&strike, Some(layer), None, &params());

        let layer1 = outcome.layer1.unwrap();
        assert!((layer1.done_ratio - 0.5).abs() < 1e-6);
        assert!((layer1.reduction - 5.0).abs() < 1e-6);
        assert_eq!(outcome.final_damage, 9);
    }

    #[test]
    fn broken_layer_provides_no_reduction() {
        let strike = StrikeDamage::new(20.0, 0.6, 0.2);
        let layer = LayerState {
            defense: 10.0,
            durability: 0,
        };
        let outcome = resolve_damage(&strike, Some(layer), None, &params());

        let layer1 = outcome.layer1.unwrap();
        assert_eq!(layer1.done_ratio, 0.0);
        assert_eq!(layer1.reduction, 0.0);
        // remaining 20: pierced 4, excess 20 * 0.8 * 1.0 = 16 -> all 20.
        assert_eq!(outcome.final_damage, 20);
    }

    #[test]
    fn second_layer_applies_same_formula() {
        let strike = StrikeDamage::new(20.0, 0.6, 0.2);
        let outer = LayerState {
            defense: 10.0,
            durability: 500,
        };
        let inner = LayerState {
            defense: 1.0,
            durability: 500,
        };
        let outcome = resolve_damage(&strike, Some(outer), Some(inner), &params());

        // Layer 1 passes 2.0. Layer 2: reduction 1.0, remaining 1.0,
        // pierced 0.2, excess 0 -> 0.2 rounds to 0.
        let layer2 = outcome.layer2.unwrap();
        assert!((layer2.reduction - 1.0).abs() < 1e-6);
        assert_eq!(outcome.final_damage, 0);
    }

    #[test]
    fn damage_is_monotone_in_defense() {
        let strike = StrikeDamage::new(30.0, 0.5, 0.3);
        let mut previous = u32::MAX;
        for defense in 0..20 {
            let layer = LayerState {
                defense: defense as f32,
                durability: 1000,
            };
            let outcome = resolve_damage(&strike, Some(layer), None, &params());
            assert!(outcome.final_damage <= previous);
            previous = outcome.final_damage;
        }
    }

    #[test]
    fn final_damage_never_negative() {
        let strike = StrikeDamage::new(2.0, 0.9, 0.0);
        let layer = LayerState {
            defense: 50.0,
            durability: 1000,
        };
        let outcome = resolve_damage(&strike, Some(layer), None, &params());
        assert_eq!(outcome.final_damage, 0);
    }

    #[test]
    fn wear_includes_flat_constant() {
        let strike = StrikeDamage::new(10.0, 0.5, 0.0);
        let outcome = resolve_damage(&strike, None, None, &params());
        assert_eq!(outcome.attacker_wear, params().weapon_wear_base);
    }
}
