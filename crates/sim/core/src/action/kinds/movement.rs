//! Discrete path-following movement.
//!
//! A move action walks an acquired path one cell at a time. Before every
//! step it re-checks obstruction and scans for opportunity interrupts;
//! on commit it releases the origin cell, reserves the destination, and
//! updates the logical position *before* the visual transit begins, so
//! concurrent range queries by other actors always see the new cell.

use crate::combat::{AttackKind, AttackRequest, resolve_attack};
use crate::config::SimConfig;
use crate::env::{PresentationEvent, SimEnv};
use crate::facing::{Direction, rotation_segments};
use crate::state::{ActionPoints, ActorId, ActorState, GridPosition, SimState};

use super::super::queue::ActionRequest;
use super::super::scheduler::SkipReason;
use super::combat::AttackProgress;
use crate::action::{InFlightAction, InFlightKind};

/// Phase machine for one movement leg.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MovePhase {
    /// About to take the next step: obstruction re-check, AP check,
    /// opportunity scan, then commit.
    PreStep,
    /// Opportunity attacks are in flight against the mover; the step
    /// commits once every interrupter's swing resolves.
    AwaitOpportunity { attackers: Vec<ActorId> },
    /// Visual transition into `to`; the logical position already moved.
    Transit { to: GridPosition, ticks_left: u64 },
}

/// In-flight state of one movement action.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MoveProgress {
    pub goal: GridPosition,
    /// Actor being pursued, for the post-arrival chaining decision.
    pub pursuit: Option<ActorId>,
    /// Remaining cells, front first.
    pub path: Vec<GridPosition>,
    pub phase: MovePhase,
    /// Actors whose opportunity attack already triggered during this leg.
    /// Each eligible enemy interrupts at most once per movement.
    pub interrupted_by: Vec<ActorId>,
}

/// How a movement leg ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveEnd {
    /// Reached the final path cell.
    Arrived,
    /// Path exhausted or permanently obstructed; completed as a no-op.
    Blocked,
    /// AP budget cannot afford the next step.
    OutOfAp,
    /// Mover died mid-leg.
    Aborted,
}

/// Outcome of advancing a movement by one tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveTick {
    /// No observable state change this tick.
    Waiting,
    /// A step just committed (occupancy and logical position updated).
    Committed,
    Finished(MoveEnd),
}

/// Plans a movement leg: resolves the goal (falling back to the nearest
/// open cell adjacent to an occupied destination), acquires a path, and
/// prices the first step.
///
/// NPCs with an unreachable goal retry toward their patrol waypoint before
/// giving up.
pub fn plan_move(
    state: &SimState,
    env: &SimEnv<'_>,
    actor: ActorId,
    request: &ActionRequest,
) -> Result<(ActionPoints, MoveProgress), SkipReason> {
    let actor_state = state
        .actor(actor)
        .filter(|a| a.alive)
        .ok_or(SkipReason::ActorUnavailable)?;

    let requested_goal = match (request.target_cell, request.target_actor) {
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

    let goal = resolve_goal(state, env, actor_state.position, requested_goal);
    let mut path = env.path.find_path(actor_state.position, goal);

    if path.is_empty()
        && !actor.is_player()
        && let Some(waypoint) = actor_state.patrol_waypoint
    {
        path = env.path.find_path(actor_state.position, waypoint);
    }
    if path.is_empty() {
        return Err(SkipReason::Unreachable);
    }

    let first_cost = step_cost(env, actor_state, actor_state.position, path[0]);
    let progress = MoveProgress {
        goal,
        pursuit: request.target_actor,
        path,
        phase: MovePhase::PreStep,
        interrupted_by: Vec::new(),
    };
    Ok((first_cost, progress))
}

/// Advances a movement leg by one tick.
pub fn tick_move(
    state: &mut SimState,
    env: &SimEnv<'_>,
    actor: ActorId,
    progress: &mut MoveProgress,
) -> MoveTick {
    if !state.is_alive(actor) {
        return MoveTick::Finished(MoveEnd::Aborted);
    }

    match progress.phase.clone() {
        MovePhase::PreStep => pre_step(state, env, actor, progress),
        MovePhase::AwaitOpportunity { attackers } => {
            if !state.is_alive(actor) {
                return MoveTick::Finished(MoveEnd::Aborted);
            }
            let all_resolved = attackers
                .iter()
                .all(|&id| !state.actor(id).is_some_and(|a| a.is_attacking()));
            if all_resolved {
                progress.phase = MovePhase::PreStep;
            }
            MoveTick::Waiting
        }
        MovePhase::Transit { to, ticks_left } => {
            if ticks_left > 1 {
                progress.phase = MovePhase::Transit {
                    to,
                    ticks_left: ticks_left - 1,
                };
                MoveTick::Waiting
            } else if progress.path.is_empty() {
                MoveTick::Finished(MoveEnd::Arrived)
            } else {
                progress.phase = MovePhase::PreStep;
                MoveTick::Waiting
            }
        }
    }
}

fn pre_step(
    state: &mut SimState,
    env: &SimEnv<'_>,
    actor: ActorId,
    progress: &mut MoveProgress,
) -> MoveTick {
    let Some(actor_state) = state.actor(actor) else {
        return MoveTick::Finished(MoveEnd::Aborted);
    };
    let origin = actor_state.position;

    let Some(&next) = progress.path.first() else {
        return MoveTick::Finished(MoveEnd::Arrived);
    };

    // Mid-leg obstruction: re-route around whoever now holds the cell.
    if !state.occupancy.is_free(next) {
        progress.path = env.path.find_path(origin, progress.goal);
        match progress.path.first() {
            Some(&cell) if state.occupancy.is_free(cell) => {}
            _ => return MoveTick::Finished(MoveEnd::Blocked),
        }
    }
    let next = progress.path[0];

    let Some(actor_state) = state.actor(actor) else {
        return MoveTick::Finished(MoveEnd::Aborted);
    };
    let cost = step_cost(env, actor_state, origin, next);
    if !actor_state.ap.can_afford(cost) {
        return MoveTick::Finished(MoveEnd::OutOfAp);
    }

    // Opportunity interrupts fire before the step commits; the mover
    // waits for every triggered swing before moving on, and may die in
    // the window.
    let attackers = opportunity_attackers(state, env, actor, origin, next, &progress.interrupted_by);
    if !attackers.is_empty() {
        for &interrupter in &attackers {
            progress.interrupted_by.push(interrupter);
            let request = AttackRequest::new(AttackKind::Melee, origin).against(actor);
            if resolve_attack(state, env, interrupter, &request).is_ok() {
                start_opportunity_swing(state, env, interrupter);
            }
        }
        if !state.is_alive(actor) {
            return MoveTick::Finished(MoveEnd::Aborted);
        }
        progress.phase = MovePhase::AwaitOpportunity { attackers };
        return MoveTick::Waiting;
    }

    commit_step(state, env, actor, progress, origin, next, cost)
}

fn commit_step(
    state: &mut SimState,
    env: &SimEnv<'_>,
    actor: ActorId,
    progress: &mut MoveProgress,
    origin: GridPosition,
    next: GridPosition,
    cost: ActionPoints,
) -> MoveTick {
    // Ordering matters: occupancy and the logical position update before
    // anyone else's turn can be released, so no two actors ever observe
    // the same cell as free.
    if !state.occupancy.release(origin, actor) {
        return MoveTick::Finished(MoveEnd::Blocked);
    }
    if !state.occupancy.reserve(next, actor) {
        let _ = state.occupancy.reserve(origin, actor);
        return MoveTick::Finished(MoveEnd::Blocked);
    }

    let transit_ticks = env.balance.movement().transit_ticks;
    let Some(actor_state) = state.actor_mut(actor) else {
        return MoveTick::Finished(MoveEnd::Aborted);
    };
    if !actor_state.ap.spend(cost) {
        // Affordability was checked above; a failure here means the budget
        // changed under us, so stand fast on the origin cell.
        let _ = state.occupancy.release(next, actor);
        let _ = state.occupancy.reserve(origin, actor);
        return MoveTick::Finished(MoveEnd::OutOfAp);
    }
    actor_state.position = next;
    actor_state.facing = Direction::between(origin, next);

    progress.path.remove(0);
    progress.phase = MovePhase::Transit {
        to: next,
        ticks_left: transit_ticks.max(1),
    };

    env.presentation.notify(PresentationEvent::MoveStarted {
        actor,
        from: origin,
        to: next,
    });
    MoveTick::Committed
}

fn start_opportunity_swing(state: &mut SimState, env: &SimEnv<'_>, interrupter: ActorId) {
    let swing_ticks = env.balance.attack().swing_ticks;
    if let Some(actor) = state.actor_mut(interrupter) {
        actor.activity |= crate::state::Activity::ATTACKING;
    }
    state.in_flight.insert(
        interrupter,
        InFlightAction {
            action: crate::action::ActionKind::MeleeAttack,
            kind: InFlightKind::Attack(AttackProgress::swinging(swing_ticks)),
            // Out-of-turn swings never touch the hand-off protocol.
            turn_released: true,
        },
    );
}

/// All actors eligible to interrupt this step with an opportunity attack.
///
/// Eligibility: alive, hostile to the mover, currently idle, melee-capable,
/// sees the mover inside its forward view arc, and the step takes the mover
/// from melee range to out of range.
fn opportunity_attackers(
    state: &SimState,
    env: &SimEnv<'_>,
    mover: ActorId,
    from: GridPosition,
    to: GridPosition,
    already: &[ActorId],
) -> Vec<ActorId> {
    let Some(mover_state) = state.actor(mover) else {
        return Vec::new();
    };
    let mover_alliance = mover_state.alliance;

    state
        .living()
        .filter(|other| other.id != mover && !already.contains(&other.id))
        .filter(|other| other.alliance.hostile_to(mover_alliance))
        .filter(|other| other.is_idle())
        .filter(|other| melee_capable(other, env))
        .filter(|other| env.vision.directly_visible(other.id, mover))
        .filter(|other| {
            let toward_mover = Direction::between(other.position, from);
            rotation_segments(other.facing, toward_mover) <= 1
        })
        .filter(|other| {
            other.position.step_distance(from) == 1 && other.position.step_distance(to) > 1
        })
        .map(|other| other.id)
        .take(SimConfig::MAX_INTERRUPTERS)
        .collect()
}

fn melee_capable(actor: &ActorState, env: &SimEnv<'_>) -> bool {
    match actor.equipment.main_hand.as_ref().filter(|i| i.is_intact()) {
        Some(item) => env
            .items
            .weapon(item.handle)
            .is_none_or(|weapon| weapon.is_melee()),
        // Bare hands always qualify.
        None => true,
    }
}

/// AP cost of entering `to` from `from`:
/// `base x (1 + terrain) x 1.4-if-diagonal x encumbrance`, rounded.
pub fn step_cost(
    env: &SimEnv<'_>,
    actor: &ActorState,
    from: GridPosition,
    to: GridPosition,
) -> ActionPoints {
    let movement = env.balance.movement();
    let mut cost = movement.base_tile_cost * (1.0 + env.path.terrain_penalty(to));
    if from.is_diagonal_step(to) {
        cost *= movement.diagonal_factor;
    }
    cost *= encumbrance_modifier(actor, env);
    ActionPoints::new(cost.round() as u32)
}

/// Total encumbrance across everything equipped, as a cost multiplier.
pub fn encumbrance_modifier(actor: &ActorState, env: &SimEnv<'_>) -> f32 {
    let equipment = &actor.equipment;
    let mut total = 0.0;

    for item in [equipment.main_hand.as_ref(), equipment.off_hand.as_ref()]
        .into_iter()
        .flatten()
    {
        if let Some(weapon) = env.items.weapon(item.handle) {
            total += weapon.encumbrance;
        } else if let Some(shield) = env.items.shield(item.handle) {
            total += shield.encumbrance;
        }
    }
    for item in [
        equipment.helmet.as_ref(),
        equipment.body_armor.as_ref(),
        equipment.shirt.as_ref(),
        equipment.gloves.as_ref(),
        equipment.leg_armor.as_ref(),
        equipment.boots.as_ref(),
    ]
    .into_iter()
    .flatten()
    {
        if let Some(armor) = env.items.armor(item.handle) {
            total += armor.encumbrance;
        }
    }

    1.0 + total
}

/// Picks the open walkable cell adjacent to an occupied destination that
/// is closest to the mover, or the destination itself when it is free of
/// living actors.
fn resolve_goal(
    state: &SimState,
    env: &SimEnv<'_>,
    mover: GridPosition,
    requested: GridPosition,
) -> GridPosition {
    if state.living_occupant(requested).is_none() {
        return requested;
    }

    Direction::ALL
        .iter()
        .map(|dir| {
            let (dx, dy) = dir.delta();
            requested.offset(dx, dy)
        })
        .filter(|&cell| env.path.is_walkable(cell) && state.occupancy.is_free(cell))
        .min_by_key(|&cell| (mover.step_distance(cell), cell))
        .unwrap_or(requested)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::{
        AmmoStats, ArmorStats, DefaultBalance, ItemOracle, NullSink, OpenVision, PathOracle,
        PcgRng, ShieldStats, WeaponStats,
    };
    use crate::state::{Alliance, ItemHandle};

    struct NoItems;

    impl ItemOracle for NoItems {
        fn weapon(&self, _handle: ItemHandle) -> Option<WeaponStats> {
            None
        }
        fn armor(&self, _handle: ItemHandle) -> Option<ArmorStats> {
            Some(ArmorStats {
                defense: 2.0,
                encumbrance: 0.5,
            })
        }
        fn shield(&self, _handle: ItemHandle) -> Option<ShieldStats> {
            None
        }
        fn ammo(&self, _handle: ItemHandle) -> Option<AmmoStats> {
            None
        }
    }

    struct StraightLine;

    impl PathOracle for StraightLine {
        fn find_path(&self, start: GridPosition, goal: GridPosition) -> Vec<GridPosition> {
            // Axis-aligned walk, good enough for unit tests.
            let mut path = Vec::new();
            let mut cursor = start;
            while cursor != goal {
                let dx = (goal.x - cursor.x).signum();
                let dy = (goal.y - cursor.y).signum();
                cursor = cursor.offset(dx, dy);
                path.push(cursor);
            }
            path
        }
        fn nodes_in_region(&self, _min: GridPosition, _max: GridPosition) -> Vec<GridPosition> {
            Vec::new()
        }
        fn is_walkable(&self, _position: GridPosition) -> bool {
            true
        }
    }

    fn with_env<R>(run: impl FnOnce(&SimEnv<'_>) -> R) -> R {
        let path = StraightLine;
        let vision = OpenVision;
        let items = NoItems;
        let balance = DefaultBalance;
        let rng = PcgRng::new(0);
        let sink = NullSink;
        let env = SimEnv::new(&path, &vision, &items, &balance, &rng, &sink);
        run(&env)
    }

    #[test]
    fn diagonal_steps_cost_more() {
        let actor = ActorState::new(ActorId(1), GridPosition::ORIGIN, Alliance::Enemy, 20);
        with_env(|env| {
            let straight = step_cost(env, &actor, GridPosition::ORIGIN, GridPosition::new(1, 0));
            let diagonal = step_cost(env, &actor, GridPosition::ORIGIN, GridPosition::new(1, 1));
            assert!(diagonal > straight);
        });
    }

    #[test]
    fn encumbrance_raises_step_cost() {
        let light = ActorState::new(ActorId(1), GridPosition::ORIGIN, Alliance::Enemy, 20);
        let mut heavy = light.clone();
        heavy.equipment.body_armor = Some(crate::state::EquippedItem::new(ItemHandle(1), 50));

        with_env(|env| {
            let light_cost = step_cost(env, &light, GridPosition::ORIGIN, GridPosition::new(1, 0));
            let heavy_cost = step_cost(env, &heavy, GridPosition::ORIGIN, GridPosition::new(1, 0));
            assert!(heavy_cost > light_cost);
        });
    }

    #[test]
    fn occupied_goal_falls_back_to_adjacent_cell() {
        let mut state = SimState::new();
        state
            .spawn(ActorState::new(
                ActorId(1),
                GridPosition::new(0, 0),
                Alliance::Player,
                20,
            ))
            .unwrap();
        state
            .spawn(ActorState::new(
                ActorId(2),
                GridPosition::new(5, 0),
                Alliance::Enemy,
                20,
            ))
            .unwrap();

        with_env(|env| {
            let goal = resolve_goal(&state, env, GridPosition::new(0, 0), GridPosition::new(5, 0));
            assert_ne!(goal, GridPosition::new(5, 0));
            assert!(goal.is_adjacent(GridPosition::new(5, 0)));
            // No adjacent open cell is closer to the mover than this one.
            assert_eq!(GridPosition::new(0, 0).step_distance(goal), 4);
        });
    }

    #[test]
    fn plan_requires_some_target() {
        let mut state = SimState::new();
        state
            .spawn(ActorState::new(
                ActorId(1),
                GridPosition::ORIGIN,
                Alliance::Player,
                20,
            ))
            .unwrap();

        with_env(|env| {
            let request = ActionRequest::new(crate::action::ActionKind::Move);
            let result = plan_move(&state, env, ActorId(1), &request);
            assert!(matches!(result, Err(SkipReason::InvalidTarget)));
        });
    }
}
