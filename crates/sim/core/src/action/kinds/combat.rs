//! Attack actions as scheduled by the turn pipeline.
//!
//! The swing itself resolves through [`crate::combat::resolve_attack`];
//! this module handles scheduling concerns: pricing by weapon class,
//! holding fire while the target is still mid-step, and the post-resolve
//! swing animation.

use crate::combat::{AttackKind, AttackRequest, resolve_attack, validate_attack};
use crate::env::{PresentationEvent, SimEnv, WeaponClass};
use crate::state::{ActionPoints, Activity, ActorId, ActorState, SimState};

use super::super::ActionKind;
use super::super::queue::ActionRequest;
use super::super::scheduler::SkipReason;

/// In-flight state of one attack action.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AttackProgress {
    /// Still waiting to land: the target was mid-step when the action was
    /// taken, so resolution is deferred until it stands still.
    pub pending: Option<AttackRequest>,
    /// Swing animation ticks left after resolution.
    pub ticks_left: u64,
}

impl AttackProgress {
    pub fn deferred(request: AttackRequest) -> Self {
        Self {
            pending: Some(request),
            ticks_left: 0,
        }
    }

    /// Already resolved; only the swing animation remains.
    pub fn swinging(ticks_left: u64) -> Self {
        Self {
            pending: None,
            ticks_left,
        }
    }
}

/// Outcome of advancing an attack by one tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AttackTick {
    Waiting,
    /// The swing just resolved (damage landed or was defended).
    Resolved,
    Finished,
}

/// Validates and prices an attack at dequeue time. The cost scales with
/// the wielded weapon class; unknown modifiers fall back to the base cost.
pub fn plan_attack(
    state: &SimState,
    env: &SimEnv<'_>,
    actor: ActorId,
    request: &ActionRequest,
) -> Result<(ActionPoints, AttackRequest), SkipReason> {
    let actor_state = state
        .actor(actor)
        .filter(|a| a.alive)
        .ok_or(SkipReason::ActorUnavailable)?;

    let kind = attack_kind(request.kind).ok_or(SkipReason::InvalidTarget)?;
    let target_cell = match (request.target_cell, request.target_actor) {
        (Some(cell), _) => cell,
        (None, Some(target)) => {
            state
                .actor(target)
                .filter(|t| t.alive)
                .ok_or(SkipReason::InvalidTarget)?
                .position
        }
        (None, None) => return Err(SkipReason::InvalidTarget),
    };

    let mut attack = AttackRequest::new(kind, target_cell);
    if let Some(target) = request.target_actor {
        attack = attack.against(target);
    }
    validate_attack(state, env, actor, &attack)?;

    Ok((attack_cost(actor_state, env), attack))
}

/// Advances an attack by one tick: resolve once the target stands still,
/// then play out the swing.
pub fn tick_attack(
    state: &mut SimState,
    env: &SimEnv<'_>,
    actor: ActorId,
    progress: &mut AttackProgress,
) -> AttackTick {
    if !state.is_alive(actor) {
        return AttackTick::Finished;
    }

    if let Some(mut request) = progress.pending {
        if let Some(target) = request.target_actor
            && state.actor(target).is_some_and(|t| t.alive && t.is_moving())
        {
            return AttackTick::Waiting;
        }
        // Re-aim at wherever the target ended up.
        if let Some(target) = request.target_actor
            && let Some(target_state) = state.actor(target).filter(|t| t.alive)
        {
            request.target_cell = target_state.position;
        }

        progress.pending = None;
        match resolve_attack(state, env, actor, &request) {
            Ok(_) => {
                progress.ticks_left = env.balance.attack().swing_ticks;
                if let Some(actor_state) = state.actor_mut(actor) {
                    actor_state.activity |= Activity::ATTACKING;
                }
                AttackTick::Resolved
            }
            // The world shifted out from under the swing; the action
            // completes without landing.
            Err(_) => AttackTick::Finished,
        }
    } else if progress.ticks_left > 1 {
        progress.ticks_left -= 1;
        AttackTick::Waiting
    } else {
        if let Some(actor_state) = state.actor_mut(actor) {
            actor_state.activity -= Activity::ATTACKING;
        }
        env.presentation
            .notify(PresentationEvent::AttackStopped { actor });
        AttackTick::Finished
    }
}

/// Maps the queued variant to the resolver's attack shape.
pub fn attack_kind(kind: ActionKind) -> Option<AttackKind> {
    match kind {
        ActionKind::MeleeAttack => Some(AttackKind::Melee),
        ActionKind::SwipeAttack => Some(AttackKind::Swipe),
        ActionKind::RangedAttack => Some(AttackKind::Ranged),
        _ => None,
    }
}

/// AP cost of one attack: base cost scaled by the per-class modifier of
/// whatever intact weapon is in the main hand.
pub fn attack_cost(attacker: &ActorState, env: &SimEnv<'_>) -> ActionPoints {
    let params = env.balance.attack();
    let class = attacker
        .equipment
        .main_hand
        .as_ref()
        .filter(|item| item.is_intact())
        .and_then(|item| env.items.weapon(item.handle))
        .map_or(WeaponClass::Unarmed, |weapon| weapon.class);
    let modifier = env.balance.attack_cost_modifier(class).unwrap_or(1.0);
    ActionPoints::new((params.base_cost as f32 * modifier).round() as u32)
}
