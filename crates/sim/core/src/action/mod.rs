//! Action domain: queueing, per-kind execution, and turn scheduling.
//!
//! Actions are a tagged variant ([`ActionKind`]) rather than an inheritance
//! chain: the scheduler owns the common contract (cost, validity,
//! completion, interruptibility) and dispatches to per-kind planning and
//! tick logic in [`kinds`]. Multi-tick actions are explicit phase state
//! machines advanced by [`scheduler::Scheduler::tick`]; nothing in the core
//! busy-waits on a flag.
//!
//! # Module Structure
//!
//! - `queue`: per-actor bounded action queues
//! - `scheduler`: dequeue/validate/charge pipeline and turn hand-off
//! - `kinds`: movement, turning, attack, interact, inventory

pub mod kinds;
pub mod queue;
pub mod scheduler;

pub use kinds::combat::AttackProgress;
pub use kinds::movement::{MovePhase, MoveProgress};
pub use kinds::turning::TurnProgress;
pub use queue::{ActionQueue, ActionRequest, QueueEntry};
pub use scheduler::{CompletedAction, ScheduleError, Scheduler, SkipReason, TakeOutcome};

/// Every action variant the scheduler understands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ActionKind {
    Move,
    Turn,
    Interact,
    MeleeAttack,
    SwipeAttack,
    RangedAttack,
    Inventory,
}

impl ActionKind {
    /// Instant actions complete within the scheduling tick they are taken
    /// in; animated ones leave an in-flight phase machine behind.
    pub fn is_instant(self) -> bool {
        matches!(self, ActionKind::Interact | ActionKind::Inventory)
    }

    pub fn is_attack(self) -> bool {
        matches!(
            self,
            ActionKind::MeleeAttack | ActionKind::SwipeAttack | ActionKind::RangedAttack
        )
    }

    /// Snake-case name for logs and diagnostics.
    pub fn as_snake_case(self) -> &'static str {
        match self {
            ActionKind::Move => "move",
            ActionKind::Turn => "turn",
            ActionKind::Interact => "interact",
            ActionKind::MeleeAttack => "melee_attack",
            ActionKind::SwipeAttack => "swipe_attack",
            ActionKind::RangedAttack => "ranged_attack",
            ActionKind::Inventory => "inventory",
        }
    }
}

/// An action mid-animation. At most one exists per actor.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InFlightAction {
    /// The queued variant this animation belongs to, for completion
    /// reporting.
    pub action: ActionKind,
    pub kind: InFlightKind,
    /// Set once this action has released the next actor's turn. Animated
    /// actions hand off at their commit point, before the animation ends,
    /// so the flag stops `finish` from handing off a second time.
    pub turn_released: bool,
}

/// Phase state for each animated action variant.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InFlightKind {
    Move(MoveProgress),
    Turn(TurnProgress),
    Attack(AttackProgress),
}
