//! Inventory manipulation.
//!
//! Opening the pack costs AP but resolves instantly; the actual item
//! shuffling happens host-side against [`crate::state::Equipment`].

use crate::env::SimEnv;
use crate::state::{ActionPoints, ActorId, SimState};

use super::super::scheduler::SkipReason;

/// Prices an inventory action.
pub fn plan_inventory(
    state: &SimState,
    env: &SimEnv<'_>,
    actor: ActorId,
) -> Result<ActionPoints, SkipReason> {
    state
        .actor(actor)
        .filter(|a| a.alive)
        .ok_or(SkipReason::ActorUnavailable)?;
    Ok(ActionPoints::new(env.balance.utility().inventory_cost))
}
