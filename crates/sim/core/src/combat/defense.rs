//! Dodge and block arbitration.
//!
//! Per (attacker, defender) pairing within one attack instance the defender
//! rolls dodge first; only a failed dodge earns a block attempt, so the two
//! outcomes are mutually exclusive. A block trades durability for health:
//! the blocking item and the attacking weapon wear instead of the body part
//! bleeding, and the blocking item may be fumbled from the hand.

use crate::env::{RollChannel, SimEnv, roll_seed};
use crate::state::{ActorId, ActorState, Tick};

use super::context::HandSlot;

/// Result of the defensive arbitration for one incoming strike.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DefenseRoll {
    /// Strike fully avoided; no block attempt follows.
    Dodged,
    /// Strike caught on an item held in `slot`.
    Blocked {
        slot: HandSlot,
        /// Defense value of the blocking item, scales attacker wear.
        block_defense: f32,
    },
    /// Neither defense connected; the damage pipeline runs.
    Hit,
}

/// Rolls dodge, then block, for one defender.
///
/// Blocking prefers an intact off-hand shield; failing that, an intact
/// main-hand weapon flagged as able to block. Broken items contribute
/// nothing and are skipped.
pub fn roll_defense(
    defender: &ActorState,
    attacker: ActorId,
    tick: Tick,
    env: &SimEnv<'_>,
) -> DefenseRoll {
    let defense = env.balance.defense();

    let dodge_seed = roll_seed(tick, attacker, defender.id, RollChannel::Dodge);
    if env.rng.roll_d100(dodge_seed) <= defense.dodge_chance {
        return DefenseRoll::Dodged;
    }

    let Some((slot, chance, block_defense)) = blocking_option(defender, env) else {
        return DefenseRoll::Hit;
    };

    let block_seed = roll_seed(tick, attacker, defender.id, RollChannel::Block);
    if env.rng.roll_d100(block_seed) <= chance {
        DefenseRoll::Blocked {
            slot,
            block_defense,
        }
    } else {
        DefenseRoll::Hit
    }
}

/// Rolls whether a successful block knocks the blocking item from hand.
pub fn roll_fumble(defender: ActorId, attacker: ActorId, tick: Tick, env: &SimEnv<'_>) -> bool {
    let fumble_seed = roll_seed(tick, attacker, defender, RollChannel::Fumble);
    env.rng.roll_d100(fumble_seed) <= env.balance.defense().fumble_chance
}

fn blocking_option(defender: &ActorState, env: &SimEnv<'_>) -> Option<(HandSlot, u32, f32)> {
    if let Some(off_hand) = &defender.equipment.off_hand
        && off_hand.is_intact()
        && let Some(shield) = env.items.shield(off_hand.handle)
    {
        return Some((HandSlot::OffHand, shield.block_chance, shield.defense));
    }

    if let Some(main_hand) = &defender.equipment.main_hand
        && main_hand.is_intact()
        && let Some(weapon) = env.items.weapon(main_hand.handle)
        && weapon.can_block
    {
        let chance = env.balance.defense().weapon_block_chance;
        return Some((HandSlot::MainHand, chance, 0.0));
    }

    None
}
