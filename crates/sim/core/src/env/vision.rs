//! Line-of-sight collaborator contract.

use crate::state::{ActorId, GridPosition};

/// Visibility and obstruction queries.
///
/// Obstruction raycasts run against the host's dedicated attack-obstacle
/// mask; the core never inspects geometry itself.
pub trait VisionOracle: Send + Sync {
    /// True if an unobstructed sight line connects the two cells.
    fn in_line_of_sight(&self, from: GridPosition, to: GridPosition) -> bool;

    /// True if `observer` can currently see `target` directly.
    fn directly_visible(&self, observer: ActorId, target: ActorId) -> bool;

    /// True if the attack line between the cells hits an attack obstacle
    /// short of the target.
    fn attack_line_blocked(&self, from: GridPosition, to: GridPosition) -> bool;

    /// True if the actor is within the presented viewport. Off-screen
    /// actors rotate instantly instead of animating.
    fn on_screen(&self, actor: ActorId) -> bool;
}

/// Permissive vision: everything is visible, nothing obstructs, nobody is
/// on screen. Useful for headless hosts and tests.
#[derive(Clone, Copy, Debug, Default)]
pub struct OpenVision;

impl VisionOracle for OpenVision {
    fn in_line_of_sight(&self, _from: GridPosition, _to: GridPosition) -> bool {
        true
    }

    fn directly_visible(&self, _observer: ActorId, _target: ActorId) -> bool {
        true
    }

    fn attack_line_blocked(&self, _from: GridPosition, _to: GridPosition) -> bool {
        false
    }

    fn on_screen(&self, _actor: ActorId) -> bool {
        false
    }
}
