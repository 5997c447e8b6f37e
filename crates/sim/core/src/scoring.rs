//! Contract types for NPC action scoring.
//!
//! The core never plans. Scoring providers rate candidate (action,
//! target/cell) pairs and an external planner picks the best; the shared
//! candidate type lives here so planner and runtime agree on the sentinel.

use crate::action::ActionKind;
use crate::state::{ActorId, GridPosition};

/// Sentinel for "this candidate is not applicable".
pub const NOT_APPLICABLE: i32 = -1;

/// A scored candidate action for an NPC.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NpcAiAction {
    pub kind: ActionKind,
    pub position: Option<GridPosition>,
    pub target: Option<ActorId>,
    /// Desirability; higher wins, exactly [`NOT_APPLICABLE`] opts out.
    pub action_value: i32,
}

impl NpcAiAction {
    pub fn not_applicable(kind: ActionKind) -> Self {
        Self {
            kind,
            position: None,
            target: None,
            action_value: NOT_APPLICABLE,
        }
    }

    pub fn is_applicable(&self) -> bool {
        self.action_value != NOT_APPLICABLE
    }
}
