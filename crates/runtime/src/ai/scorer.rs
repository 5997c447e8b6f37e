//! Additive scoring heuristics for NPC candidates.
//!
//! The scorer rates one (action, target) or (action, cell) pair at a time
//! and never decides anything itself; an external planner compares the
//! values and queues the winner. Validity checks reuse the same resolver
//! primitives the combat core runs at dequeue time, so a candidate that
//! scores above the sentinel is one the scheduler would actually accept.

use tracing::trace;

use sim_core::{
    ActionKind, ActorId, AttackKind, AttackRequest, GridPosition, NOT_APPLICABLE, NpcAiAction,
    SimEnv, SimState, combat::swipe_cells, validate_attack,
};

/// Weight table for the additive heuristics.
#[derive(Clone, Copy, Debug)]
pub struct ScoreWeights {
    /// Per missing health point on the candidate target.
    pub wounded_target: i32,
    /// Per cell of distance, subtracted.
    pub distance: i32,
    /// Per ally or neutral caught in a multi-target area.
    pub friendly_in_area: i32,
    /// Additional penalty when that bystander is the player.
    pub player_in_area: i32,
    /// Flat base so a plain valid candidate scores above the sentinel.
    pub base: i32,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            wounded_target: 2,
            distance: 3,
            friendly_in_area: 20,
            player_in_area: 40,
            base: 50,
        }
    }
}

/// Stateless scoring provider.
#[derive(Clone, Copy, Debug, Default)]
pub struct AiScorer {
    pub weights: ScoreWeights,
}

impl AiScorer {
    pub fn new(weights: ScoreWeights) -> Self {
        Self { weights }
    }

    /// Rates attacking `target` with `kind`. Returns the sentinel when the
    /// resolver would reject the attack outright.
    pub fn score_target(
        &self,
        state: &SimState,
        env: &SimEnv<'_>,
        actor: ActorId,
        kind: ActionKind,
        target: ActorId,
    ) -> NpcAiAction {
        let Some(attack_kind) = attack_kind(kind) else {
            return NpcAiAction::not_applicable(kind);
        };
        let (Some(actor_state), Some(target_state)) = (state.actor(actor), state.actor(target))
        else {
            return NpcAiAction::not_applicable(kind);
        };
        if !target_state.alive || !actor_state.alliance.hostile_to(target_state.alliance) {
            return NpcAiAction::not_applicable(kind);
        }

        let request = AttackRequest::new(attack_kind, target_state.position).against(target);
        if validate_attack(state, env, actor, &request).is_err() {
            return NpcAiAction::not_applicable(kind);
        }

        let weights = self.weights;
        let mut value = weights.base;
        let missing = target_state.max_health().saturating_sub(target_state.total_health());
        value += missing as i32 * weights.wounded_target;
        value -=
            actor_state.position.step_distance(target_state.position) as i32 * weights.distance;

        if attack_kind == AttackKind::Swipe {
            value -= self.bystander_penalty(state, actor, actor_state.position, target_state.position);
        }

        trace!(target: "runtime::ai", %actor, candidate = %target, value, "scored target");
        NpcAiAction {
            kind,
            position: Some(target_state.position),
            target: Some(target),
            action_value: value.max(0),
        }
    }

    /// Rates moving to `cell`. Closer to the nearest living enemy is
    /// better; unwalkable or occupied cells are not applicable.
    pub fn score_grid_position(
        &self,
        state: &SimState,
        env: &SimEnv<'_>,
        actor: ActorId,
        kind: ActionKind,
        cell: GridPosition,
    ) -> NpcAiAction {
        if kind != ActionKind::Move {
            return NpcAiAction::not_applicable(kind);
        }
        let Some(actor_state) = state.actor(actor).filter(|a| a.alive) else {
            return NpcAiAction::not_applicable(kind);
        };
        if !env.path.is_walkable(cell) || state.living_occupant(cell).is_some() {
            return NpcAiAction::not_applicable(kind);
        }

        let nearest_enemy = state
            .living()
            .filter(|other| other.alliance.hostile_to(actor_state.alliance))
            .map(|other| other.position.step_distance(cell))
            .min();
        let Some(enemy_distance) = nearest_enemy else {
            return NpcAiAction::not_applicable(kind);
        };

        let weights = self.weights;
        let mut value = weights.base;
        value -= enemy_distance as i32 * weights.distance;
        value -= actor_state.position.step_distance(cell) as i32;

        trace!(target: "runtime::ai", %actor, %cell, value, "scored position");
        NpcAiAction {
            kind,
            position: Some(cell),
            target: None,
            action_value: value.max(0),
        }
    }

    fn bystander_penalty(
        &self,
        state: &SimState,
        actor: ActorId,
        origin: GridPosition,
        target_cell: GridPosition,
    ) -> i32 {
        let Some(actor_state) = state.actor(actor) else {
            return 0;
        };
        let mut penalty = 0;
        for cell in swipe_cells(origin, target_cell) {
            let Some(bystander) = state.living_occupant(cell) else {
                continue;
            };
            if bystander.id == actor || actor_state.alliance.hostile_to(bystander.alliance) {
                continue;
            }
            penalty += self.weights.friendly_in_area;
            if bystander.id.is_player() {
                penalty += self.weights.player_in_area;
            }
        }
        penalty
    }
}

/// Picks the highest-valued applicable candidate; ties keep list order.
pub fn best_candidate(candidates: &[NpcAiAction]) -> Option<NpcAiAction> {
    candidates
        .iter()
        .filter(|candidate| candidate.is_applicable())
        .copied()
        .fold(None, |best: Option<NpcAiAction>, candidate| match best {
            Some(current) if current.action_value >= candidate.action_value => Some(current),
            _ => Some(candidate),
        })
}

fn attack_kind(kind: ActionKind) -> Option<AttackKind> {
    match kind {
        ActionKind::MeleeAttack => Some(AttackKind::Melee),
        ActionKind::SwipeAttack => Some(AttackKind::Swipe),
        ActionKind::RangedAttack => Some(AttackKind::Ranged),
        _ => None,
    }
}
