//! Object interaction.
//!
//! The core validates reach and charges AP; what the interaction *does*
//! (opening a door, looting a container) belongs to the host, which
//! observes the completed action.

use crate::env::SimEnv;
use crate::state::{ActionPoints, ActorId, SimState};

use super::super::queue::ActionRequest;
use super::super::scheduler::SkipReason;

/// Validates and prices an interaction with the requested cell.
pub fn plan_interact(
    state: &SimState,
    env: &SimEnv<'_>,
    actor: ActorId,
    request: &ActionRequest,
) -> Result<ActionPoints, SkipReason> {
    let actor_state = state
        .actor(actor)
        .filter(|a| a.alive)
        .ok_or(SkipReason::ActorUnavailable)?;

    let target_cell = request.target_cell.ok_or(SkipReason::InvalidTarget)?;
    let params = env.balance.utility();
    if actor_state.position.step_distance(target_cell) > params.interact_range {
        return Err(SkipReason::InvalidTarget);
    }
    Ok(ActionPoints::new(params.interact_cost))
}
