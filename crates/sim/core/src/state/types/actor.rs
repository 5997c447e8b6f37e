//! Combatant state.

use bitflags::bitflags;

use super::body::{BodyPartKind, BodyParts, standard_body};
use super::common::{ActionPoints, ActorId, Alliance, GridPosition, Meter, Tick};
use super::equipment::Equipment;
use crate::action::queue::ActionQueue;
use crate::facing::Direction;

bitflags! {
    /// Presentation-coupled activity state.
    ///
    /// These replace the original shared booleans other systems polled:
    /// in-flight action phases set and clear them at commit points, and
    /// waiting phases observe them through the tick loop.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct Activity: u8 {
        const MOVING = 1 << 0;
        const ATTACKING = 1 << 1;
        const ROTATING = 1 << 2;
    }
}

/// Complete state for one grid-positioned combatant.
///
/// # Invariants
///
/// - `position` always matches the cell this actor holds in the occupancy
///   grid while alive; movement updates both before releasing the turn.
/// - `ap` is never overdrawn (all spending goes through checked deduction).
/// - `facing` is one of the 8 canonical directions, updated only on
///   completed rotation.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActorState {
    pub id: ActorId,
    pub position: GridPosition,
    pub facing: Direction,
    pub alliance: Alliance,

    /// Per-turn action point budget, refilled at turn hand-off.
    pub ap: ActionPoints,

    /// Hit locations with individual health pools.
    pub body: BodyParts,

    /// Equipped weapon/shield/armor instances (durability lives here).
    pub equipment: Equipment,

    /// Pending action queue; the head is the next action taken.
    pub queue: ActionQueue,

    /// Current presentation-coupled activity flags.
    pub activity: Activity,

    pub alive: bool,

    /// Tick of the last melee hit landed on this actor, consumed by
    /// reaction systems outside the core.
    pub last_melee_hit: Option<Tick>,

    /// Fallback movement goal for NPCs whose pursuit goal is unreachable.
    pub patrol_waypoint: Option<GridPosition>,
}

impl ActorState {
    pub fn new(id: ActorId, position: GridPosition, alliance: Alliance, part_health: u32) -> Self {
        Self {
            id,
            position,
            facing: Direction::North,
            alliance,
            ap: ActionPoints::ZERO,
            body: standard_body(part_health),
            equipment: Equipment::empty(),
            queue: ActionQueue::new(),
            activity: Activity::empty(),
            alive: true,
            last_melee_hit: None,
            patrol_waypoint: None,
        }
    }

    pub fn body_part(&self, kind: BodyPartKind) -> Option<&Meter> {
        self.body
            .iter()
            .find(|part| part.kind == kind)
            .map(|part| &part.health)
    }

    /// Applies health damage to a hit location. Emptying a vital part
    /// (head or torso) kills the actor. Returns true if the actor died.
    pub fn damage_body_part(&mut self, kind: BodyPartKind, amount: u32) -> bool {
        let Some(part) = self.body.iter_mut().find(|part| part.kind == kind) else {
            return false;
        };
        part.health.damage(amount);
        if part.health.is_empty() && kind.is_vital() {
            self.alive = false;
        }
        !self.alive
    }

    /// Total remaining health across all parts, used by AI scoring.
    pub fn total_health(&self) -> u32 {
        self.body.iter().map(|part| part.health.current).sum()
    }

    pub fn max_health(&self) -> u32 {
        self.body.iter().map(|part| part.health.maximum).sum()
    }

    #[inline]
    pub fn is_idle(&self) -> bool {
        self.activity.is_empty()
    }

    #[inline]
    pub fn is_attacking(&self) -> bool {
        self.activity.contains(Activity::ATTACKING)
    }

    #[inline]
    pub fn is_moving(&self) -> bool {
        self.activity.contains(Activity::MOVING)
    }

    /// Stamps the melee-hit marker for this tick.
    pub fn mark_melee_hit(&mut self, tick: Tick) {
        self.last_melee_hit = Some(tick);
    }

    /// Returns true if a melee hit landed within `window` ticks.
    pub fn recently_melee_hit(&self, now: Tick, window: u64) -> bool {
        self.last_melee_hit
            .is_some_and(|hit| now.0.saturating_sub(hit.0) <= window)
    }
}
