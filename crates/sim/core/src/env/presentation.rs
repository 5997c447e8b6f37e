//! One-way presentation notifications.
//!
//! The core never waits on presentation; it emits events at commit points
//! and the animation layer catches up through the tick-driven action
//! phases.

use crate::state::{ActorId, GridPosition, ItemHandle};
use crate::facing::Direction;

/// Events the presentation layer renders. Purely informational; dropping
/// them changes nothing in the simulation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PresentationEvent {
    MoveStarted { actor: ActorId, from: GridPosition, to: GridPosition },
    MoveStopped { actor: ActorId },
    AttackStarted { actor: ActorId, target_cell: GridPosition },
    AttackStopped { actor: ActorId },
    Dodged { actor: ActorId },
    Recoiled { actor: ActorId },
    Fumbled { actor: ActorId, item: ItemHandle },
    KnockedBack { actor: ActorId, to: GridPosition },
    RotationStarted { actor: ActorId, target: Direction },
    Died { actor: ActorId },
}

/// Sink for presentation events.
pub trait PresentationSink: Send + Sync {
    fn notify(&self, event: PresentationEvent);
}

/// Discards every event. Default for headless hosts.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl PresentationSink for NullSink {
    fn notify(&self, _event: PresentationEvent) {}
}
