//! Deliberate facing changes.
//!
//! Turning toward a cell is priced per 45-degree segment and animated at
//! a fixed tick rate. Off-screen actors snap instantly so hidden enemies
//! never pay wall-clock time for presentation nobody sees. Either way the
//! new facing only commits when the rotation completes.

use crate::env::SimEnv;
use crate::facing::{Direction, RotationState, rotation_segments};
use crate::state::{ActionPoints, ActorId, SimState};

use super::super::queue::ActionRequest;
use super::super::scheduler::SkipReason;

/// In-flight state of one turn action.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TurnProgress {
    pub rotation: RotationState,
}

/// Outcome of advancing a rotation by one tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TurnTick {
    Waiting,
    /// Rotation complete; the facing has been committed.
    Finished,
}

/// Validates and prices a turn toward the requested cell. Already facing
/// the right way costs nothing and completes on the first tick.
pub fn plan_turn(
    state: &SimState,
    env: &SimEnv<'_>,
    actor: ActorId,
    request: &ActionRequest,
) -> Result<(ActionPoints, TurnProgress), SkipReason> {
    let actor_state = state
        .actor(actor)
        .filter(|a| a.alive)
        .ok_or(SkipReason::ActorUnavailable)?;

    let target_cell = request.target_cell.ok_or(SkipReason::InvalidTarget)?;
    if target_cell == actor_state.position {
        return Err(SkipReason::InvalidTarget);
    }
    let target = Direction::between(actor_state.position, target_cell);

    let params = env.balance.turning();
    let segments = rotation_segments(actor_state.facing, target);
    let cost = ActionPoints::new((segments as f32 * params.segment_cost).round() as u32);

    let instant = !env.vision.on_screen(actor);
    let rotation = RotationState::begin(actor_state.facing, target, params.ticks_per_segment, instant);
    Ok((cost, TurnProgress { rotation }))
}

/// Advances a rotation by one tick, committing the facing on completion.
pub fn tick_turn(state: &mut SimState, actor: ActorId, progress: &mut TurnProgress) -> TurnTick {
    let Some(actor_state) = state.actor_mut(actor).filter(|a| a.alive) else {
        return TurnTick::Finished;
    };
    match progress.rotation.tick() {
        Some(facing) => {
            actor_state.facing = facing;
            TurnTick::Finished
        }
        None => TurnTick::Waiting,
    }
}
