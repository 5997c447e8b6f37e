//! Per-attempt attack context.

use arrayvec::ArrayVec;
use bitflags::bitflags;

use crate::config::SimConfig;
use crate::state::{ActorId, BodyPartKind, EquippedItem, GridPosition};

use super::damage::StrikeDamage;

/// Attack variants the resolver understands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AttackKind {
    /// Single adjacent target.
    Melee,
    /// Arc hitting the target cell plus the two flanking cells.
    Swipe,
    /// Projectile attack; checks the intervening-actor line.
    Ranged,
}

impl AttackKind {
    pub fn is_melee(self) -> bool {
        matches!(self, AttackKind::Melee | AttackKind::Swipe)
    }

    /// Whether intervening actors block the attack line. Melee variants
    /// reach past nobody by construction; ranged shots refuse to fire
    /// through an occupied cell.
    pub fn blocked_by_intervening_actors(self) -> bool {
        matches!(self, AttackKind::Ranged)
    }
}

bitflags! {
    /// Outcome flags for one (attacker, defender) pairing.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct AttackFlags: u8 {
        const DODGED = 1 << 0;
        const BLOCKED = 1 << 1;
        const FUMBLED = 1 << 2;
        const KNOCKED_BACK = 1 << 3;
        const KILLED = 1 << 4;
    }
}

/// Which hand delivered the strike, for durability accounting.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HandSlot {
    MainHand,
    OffHand,
}

/// The offensive profile of one attack attempt, derived once from the
/// attacker's equipment and reused against every defender in the area.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StrikeProfile {
    pub damage: StrikeDamage,
    /// Hand whose weapon takes wear; `None` for unarmed strikes.
    pub weapon_slot: Option<HandSlot>,
    /// Paired ammunition shares the attacker's durability wear.
    pub uses_ammo: bool,
}

/// Ephemeral state for one attack attempt: who swings, at what, with which
/// profile, against which resolved defenders. Built by the resolver,
/// discarded when the report is produced.
#[derive(Clone, Debug)]
pub struct AttackContext {
    pub attacker: ActorId,
    pub kind: AttackKind,
    pub origin: GridPosition,
    pub target_cell: GridPosition,
    pub strike: StrikeProfile,
    pub defenders: ArrayVec<ActorId, { SimConfig::MAX_AREA_TARGETS }>,
}

/// Resolution result for one defender.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DefenderOutcome {
    pub defender: ActorId,
    pub flags: AttackFlags,
    pub damage: u32,
    /// Hit location, when the strike connected.
    pub body_part: Option<BodyPartKind>,
    /// Blocking item knocked from the defender's hand, for the host's
    /// inventory layer to place back into the world.
    pub fumbled_item: Option<EquippedItem>,
}

/// Everything one attack did.
#[derive(Clone, Debug, Default)]
pub struct AttackReport {
    pub outcomes: ArrayVec<DefenderOutcome, { SimConfig::MAX_AREA_TARGETS }>,
}

impl AttackReport {
    /// Total health damage across all defenders.
    pub fn total_damage(&self) -> u32 {
        self.outcomes.iter().map(|outcome| outcome.damage).sum()
    }

    pub fn outcome_for(&self, defender: ActorId) -> Option<&DefenderOutcome> {
        self.outcomes
            .iter()
            .find(|outcome| outcome.defender == defender)
    }
}
