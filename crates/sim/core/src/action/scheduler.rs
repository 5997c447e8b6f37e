//! Dequeue, validate, charge, and turn hand-off.
//!
//! The scheduler owns the per-kind contract: every action passes the same
//! pipeline (pop, re-validate, re-price, charge AP, start or complete) and
//! every animated action hands the turn to the next actor at its commit
//! point, not when its animation ends. Attacks and turns commit when
//! taken; movement commits at its first step, after occupancy updates, so
//! the next actor can never observe a stale grid.
//!
//! Invalid or unaffordable entries are skipped with zero AP charge and the
//! next entry is considered on the following call.

use thiserror::Error;

use crate::combat::AttackError;
use crate::env::{PresentationEvent, SimEnv};
use crate::state::{ActionPoints, Activity, ActorId, SimState};

use super::kinds::{combat, interact, inventory, movement, turning};
use super::queue::{ActionRequest, QueueEntry};
use super::{ActionKind, InFlightAction, InFlightKind};

/// Queueing failed outright; nothing was recorded.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum ScheduleError {
    #[error("actor {0} not found or dead")]
    ActorUnavailable(ActorId),

    #[error("action queue for {0} is full")]
    QueueFull(ActorId),
}

/// Why a dequeued entry was dropped without charge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum SkipReason {
    #[error("actor not found or dead")]
    ActorUnavailable,

    #[error("action has no valid target")]
    InvalidTarget,

    #[error("no path to the destination")]
    Unreachable,

    #[error("cost {cost} exceeds remaining budget {available}")]
    Unaffordable {
        cost: ActionPoints,
        available: ActionPoints,
    },

    #[error("attack rejected: {0}")]
    Attack(#[from] AttackError),
}

/// Result of one [`Scheduler::take_action`] call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TakeOutcome {
    /// An animated action started; its phase machine is now in flight.
    Started { kind: ActionKind },
    /// An instant action completed within this call.
    Finished { kind: ActionKind },
    /// The head entry was invalid or unaffordable and was dropped.
    Skipped { kind: ActionKind, reason: SkipReason },
    /// An action is already in flight for this actor.
    Busy,
    /// Nothing queued.
    Idle,
}

/// An action whose animation completed during [`Scheduler::tick`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CompletedAction {
    pub actor: ActorId,
    pub kind: ActionKind,
}

/// Borrowed view over the world that drives the action pipeline.
pub struct Scheduler<'a> {
    pub state: &'a mut SimState,
}

impl<'a> Scheduler<'a> {
    pub fn new(state: &'a mut SimState) -> Self {
        Self { state }
    }

    /// Appends a request to an actor's queue. `immediate` entries jump to
    /// the head. The stored cost is an estimate; the real price is
    /// recomputed when the entry is taken.
    pub fn queue_action(
        &mut self,
        env: &SimEnv<'_>,
        actor: ActorId,
        request: ActionRequest,
        immediate: bool,
    ) -> Result<(), ScheduleError> {
        let cost = self.estimate_cost(env, actor, &request);
        let actor_state = self
            .state
            .actor_mut(actor)
            .filter(|a| a.alive)
            .ok_or(ScheduleError::ActorUnavailable(actor))?;

        let entry = QueueEntry {
            request,
            immediate,
            cost,
        };
        if !actor_state.queue.push(entry) {
            return Err(ScheduleError::QueueFull(actor));
        }
        Ok(())
    }

    /// Pops and executes the actor's head queue entry.
    ///
    /// One entry per call: a skip leaves the rest of the queue intact so
    /// the caller can observe (and log) each drop individually.
    ///
    /// Turn order is not enforced here. Hand-off happens at an action's
    /// commit point, before its animation ends, so chained pursuit swings
    /// and opportunity attacks must execute while another actor is
    /// current; hosts gate player input on
    /// [`crate::state::TurnState::current_actor`] instead.
    pub fn take_action(&mut self, env: &SimEnv<'_>, actor: ActorId) -> TakeOutcome {
        if self.state.in_flight.contains_key(&actor) {
            return TakeOutcome::Busy;
        }
        let Some(actor_state) = self.state.actor_mut(actor).filter(|a| a.alive) else {
            return TakeOutcome::Idle;
        };
        let Some(entry) = actor_state.queue.pop() else {
            return TakeOutcome::Idle;
        };

        let kind = entry.request.kind;
        match self.start_entry(env, actor, &entry.request) {
            Ok(outcome) => outcome,
            Err(reason) => TakeOutcome::Skipped { kind, reason },
        }
    }

    /// Advances the simulation clock and every in-flight action by one
    /// tick. Returns the actions whose animations completed.
    pub fn tick(&mut self, env: &SimEnv<'_>) -> Vec<CompletedAction> {
        self.state.turn.clock = self.state.turn.clock + 1;

        let mut completed = Vec::new();
        let active: Vec<ActorId> = self.state.in_flight.keys().copied().collect();
        for actor in active {
            let Some(mut in_flight) = self.state.in_flight.remove(&actor) else {
                continue;
            };
            let done = match &mut in_flight.kind {
                InFlightKind::Move(progress) => {
                    self.tick_move_in_flight(env, actor, progress, &mut in_flight.turn_released)
                }
                InFlightKind::Turn(progress) => {
                    turning::tick_turn(self.state, actor, progress) == turning::TurnTick::Finished
                }
                InFlightKind::Attack(progress) => {
                    combat::tick_attack(self.state, env, actor, progress)
                        == combat::AttackTick::Finished
                }
            };

            if done {
                let kind = in_flight.action;
                self.finish_action(env, actor, in_flight);
                completed.push(CompletedAction { actor, kind });
            } else if self.state.is_alive(actor) {
                self.state.in_flight.insert(actor, in_flight);
            }
        }
        completed
    }

    /// Ends the actor's turn voluntarily, flushing its queue. Hands off
    /// immediately when the actor is current with nothing in flight.
    pub fn end_turn(&mut self, env: &SimEnv<'_>, actor: ActorId) {
        if let Some(actor_state) = self.state.actor_mut(actor) {
            actor_state.queue.clear();
        }
        if self.state.turn.current_actor() == Some(actor)
            && !self.state.in_flight.contains_key(&actor)
        {
            self.hand_off(env);
        }
    }

    /// Cancels everything the actor has pending and in flight. Hands off
    /// if the cancelled action still held the turn.
    pub fn cancel_actions(&mut self, env: &SimEnv<'_>, actor: ActorId) {
        let held_turn = self
            .state
            .in_flight
            .remove(&actor)
            .is_some_and(|in_flight| !in_flight.turn_released);
        if let Some(actor_state) = self.state.actor_mut(actor) {
            actor_state.queue.clear();
            actor_state.activity = Activity::empty();
        }
        if held_turn {
            self.hand_off(env);
        }
    }

    /// Advances the turn order to the next living actor and refills its
    /// AP budget.
    pub fn hand_off(&mut self, env: &SimEnv<'_>) {
        self.state.turn.advance();
        let budget = ActionPoints::new(env.balance.turning().ap_per_turn);
        if let Some(next) = self.state.turn.current_actor()
            && let Some(actor_state) = self.state.actor_mut(next)
        {
            actor_state.ap = budget;
        }
    }

    fn start_entry(
        &mut self,
        env: &SimEnv<'_>,
        actor: ActorId,
        request: &ActionRequest,
    ) -> Result<TakeOutcome, SkipReason> {
        let kind = request.kind;
        match kind {
            ActionKind::Move => {
                let (first_cost, progress) = movement::plan_move(self.state, env, actor, request)?;
                // Steps are charged as they commit; affordability of the
                // first step gates starting at all.
                self.require_affordable(actor, first_cost)?;
                self.install(
                    actor,
                    InFlightAction {
                        action: kind,
                        kind: InFlightKind::Move(progress),
                        turn_released: false,
                    },
                    Activity::MOVING,
                );
                Ok(TakeOutcome::Started { kind })
            }
            ActionKind::Turn => {
                let (cost, progress) = turning::plan_turn(self.state, env, actor, request)?;
                self.charge(actor, cost)?;
                env.presentation.notify(PresentationEvent::RotationStarted {
                    actor,
                    target: progress.rotation.target,
                });
                self.install(
                    actor,
                    InFlightAction {
                        action: kind,
                        kind: InFlightKind::Turn(progress),
                        turn_released: true,
                    },
                    Activity::ROTATING,
                );
                self.hand_off(env);
                Ok(TakeOutcome::Started { kind })
            }
            ActionKind::MeleeAttack | ActionKind::SwipeAttack | ActionKind::RangedAttack => {
                let (cost, attack) = combat::plan_attack(self.state, env, actor, request)?;
                self.charge(actor, cost)?;
                self.install(
                    actor,
                    InFlightAction {
                        action: kind,
                        kind: InFlightKind::Attack(combat::AttackProgress::deferred(attack)),
                        turn_released: true,
                    },
                    Activity::ATTACKING,
                );
                self.hand_off(env);
                Ok(TakeOutcome::Started { kind })
            }
            ActionKind::Interact => {
                let cost = interact::plan_interact(self.state, env, actor, request)?;
                self.charge(actor, cost)?;
                Ok(TakeOutcome::Finished { kind })
            }
            ActionKind::Inventory => {
                let cost = inventory::plan_inventory(self.state, env, actor)?;
                self.charge(actor, cost)?;
                Ok(TakeOutcome::Finished { kind })
            }
        }
    }

    fn tick_move_in_flight(
        &mut self,
        env: &SimEnv<'_>,
        actor: ActorId,
        progress: &mut movement::MoveProgress,
        turn_released: &mut bool,
    ) -> bool {
        match movement::tick_move(self.state, env, actor, progress) {
            movement::MoveTick::Committed => {
                if !*turn_released {
                    *turn_released = true;
                    self.hand_off(env);
                }
                false
            }
            movement::MoveTick::Waiting => false,
            movement::MoveTick::Finished(end) => {
                self.chain_after_move(env, actor, progress, end);
                true
            }
        }
    }

    /// Pursuit chaining on arrival: strike a target standing in melee
    /// reach, or chase one that moved away while we walked.
    fn chain_after_move(
        &mut self,
        env: &SimEnv<'_>,
        actor: ActorId,
        progress: &movement::MoveProgress,
        end: movement::MoveEnd,
    ) {
        if end != movement::MoveEnd::Arrived {
            return;
        }
        let Some(target) = progress.pursuit else {
            return;
        };
        let Some(target_state) = self.state.actor(target).filter(|t| t.alive) else {
            return;
        };
        let Some(actor_state) = self.state.actor(actor).filter(|a| a.alive) else {
            return;
        };

        let request = if actor_state.position.is_adjacent(target_state.position) {
            ActionRequest::new(ActionKind::MeleeAttack).against(target)
        } else if target_state.position.step_distance(progress.goal) > 1 {
            ActionRequest::new(ActionKind::Move).against(target)
        } else {
            return;
        };
        // Queue-full here just drops the follow-up.
        let _ = self.queue_action(env, actor, request, true);
    }

    fn finish_action(&mut self, env: &SimEnv<'_>, actor: ActorId, in_flight: InFlightAction) {
        if let Some(actor_state) = self.state.actor_mut(actor) {
            match in_flight.kind {
                InFlightKind::Move(_) => actor_state.activity -= Activity::MOVING,
                InFlightKind::Turn(_) => actor_state.activity -= Activity::ROTATING,
                InFlightKind::Attack(_) => actor_state.activity -= Activity::ATTACKING,
            }
        }
        if matches!(in_flight.kind, InFlightKind::Move(_)) {
            env.presentation
                .notify(PresentationEvent::MoveStopped { actor });
        }
        // A move that never committed a step still holds the turn.
        if !in_flight.turn_released && self.state.turn.current_actor() == Some(actor) {
            self.hand_off(env);
        }
    }

    fn install(&mut self, actor: ActorId, in_flight: InFlightAction, activity: Activity) {
        if let Some(actor_state) = self.state.actor_mut(actor) {
            actor_state.activity |= activity;
        }
        self.state.in_flight.insert(actor, in_flight);
    }

    /// Charges AP or skips. Checked and spent in one step.
    fn charge(&mut self, actor: ActorId, cost: ActionPoints) -> Result<(), SkipReason> {
        let actor_state = self
            .state
            .actor_mut(actor)
            .ok_or(SkipReason::ActorUnavailable)?;
        let available = actor_state.ap;
        if !actor_state.ap.spend(cost) {
            return Err(SkipReason::Unaffordable { cost, available });
        }
        Ok(())
    }

    fn require_affordable(&self, actor: ActorId, cost: ActionPoints) -> Result<(), SkipReason> {
        let actor_state = self.state.actor(actor).ok_or(SkipReason::ActorUnavailable)?;
        if !actor_state.ap.can_afford(cost) {
            return Err(SkipReason::Unaffordable {
                cost,
                available: actor_state.ap,
            });
        }
        Ok(())
    }

    fn estimate_cost(&self, env: &SimEnv<'_>, actor: ActorId, request: &ActionRequest) -> ActionPoints {
        match request.kind {
            ActionKind::Move => movement::plan_move(self.state, env, actor, request)
                .map(|(cost, _)| cost)
                .unwrap_or_default(),
            ActionKind::Turn => turning::plan_turn(self.state, env, actor, request)
                .map(|(cost, _)| cost)
                .unwrap_or_default(),
            ActionKind::MeleeAttack | ActionKind::SwipeAttack | ActionKind::RangedAttack => self
                .state
                .actor(actor)
                .map(|a| combat::attack_cost(a, env))
                .unwrap_or_default(),
            ActionKind::Interact => ActionPoints::new(env.balance.utility().interact_cost),
            ActionKind::Inventory => ActionPoints::new(env.balance.utility().inventory_cost),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::{
        AmmoStats, ArmorStats, DefaultBalance, ItemOracle, NullSink, OpenVision, PathOracle,
        PcgRng, ShieldStats, WeaponStats,
    };
    use crate::state::{ActorState, Alliance, GridPosition, ItemHandle};

    struct NoItems;

    impl ItemOracle for NoItems {
        fn weapon(&self, _handle: ItemHandle) -> Option<WeaponStats> {
            None
        }
        fn armor(&self, _handle: ItemHandle) -> Option<ArmorStats> {
            None
        }
        fn shield(&self, _handle: ItemHandle) -> Option<ShieldStats> {
            None
        }
        fn ammo(&self, _handle: ItemHandle) -> Option<AmmoStats> {
            None
        }
    }

    struct Lattice;

    impl PathOracle for Lattice {
        fn find_path(&self, start: GridPosition, goal: GridPosition) -> Vec<GridPosition> {
            let mut path = Vec::new();
            let mut cursor = start;
            while cursor != goal {
                cursor = cursor.offset((goal.x - cursor.x).signum(), (goal.y - cursor.y).signum());
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

    fn two_actor_state() -> SimState {
        let mut state = SimState::new();
        state
            .spawn(ActorState::new(
                ActorId(0),
                GridPosition::ORIGIN,
                Alliance::Player,
                20,
            ))
            .unwrap();
        state
            .spawn(ActorState::new(
                ActorId(1),
                GridPosition::new(6, 0),
                Alliance::Enemy,
                20,
            ))
            .unwrap();
        for id in [ActorId(0), ActorId(1)] {
            state.actor_mut(id).unwrap().ap = ActionPoints::new(20);
        }
        state
    }

    fn with_env<R>(run: impl FnOnce(&SimEnv<'_>) -> R) -> R {
        let path = Lattice;
        let vision = OpenVision;
        let items = NoItems;
        let balance = DefaultBalance;
        let rng = PcgRng::new(7);
        let sink = NullSink;
        let env = SimEnv::new(&path, &vision, &items, &balance, &rng, &sink);
        run(&env)
    }

    #[test]
    fn skipped_entries_charge_nothing() {
        let mut state = two_actor_state();
        with_env(|env| {
            let mut scheduler = Scheduler::new(&mut state);
            // A turn toward the actor's own cell has no direction.
            let request = ActionRequest::new(ActionKind::Turn).at(GridPosition::ORIGIN);
            scheduler
                .queue_action(env, ActorId(0), request, false)
                .unwrap();

            let before = scheduler.state.actor(ActorId(0)).unwrap().ap;
            let outcome = scheduler.take_action(env, ActorId(0));
            assert!(matches!(
                outcome,
                TakeOutcome::Skipped {
                    kind: ActionKind::Turn,
                    ..
                }
            ));
            assert_eq!(scheduler.state.actor(ActorId(0)).unwrap().ap, before);
            // The skip consumed the entry.
            assert_eq!(scheduler.take_action(env, ActorId(0)), TakeOutcome::Idle);
        });
    }

    #[test]
    fn instant_actions_complete_in_place() {
        let mut state = two_actor_state();
        with_env(|env| {
            let mut scheduler = Scheduler::new(&mut state);
            let request = ActionRequest::new(ActionKind::Inventory);
            scheduler
                .queue_action(env, ActorId(0), request, false)
                .unwrap();

            let before = scheduler.state.actor(ActorId(0)).unwrap().ap;
            let outcome = scheduler.take_action(env, ActorId(0));
            assert_eq!(
                outcome,
                TakeOutcome::Finished {
                    kind: ActionKind::Inventory
                }
            );
            let after = scheduler.state.actor(ActorId(0)).unwrap().ap;
            assert!(after < before);
            assert!(scheduler.state.in_flight.is_empty());
            // Instant actions never hand off the turn.
            assert_eq!(scheduler.state.turn.current_actor(), Some(ActorId(0)));
        });
    }

    #[test]
    fn movement_hands_off_at_first_step_commit() {
        let mut state = two_actor_state();
        with_env(|env| {
            let mut scheduler = Scheduler::new(&mut state);
            let request = ActionRequest::new(ActionKind::Move).at(GridPosition::new(3, 0));
            scheduler
                .queue_action(env, ActorId(0), request, false)
                .unwrap();

            assert_eq!(
                scheduler.take_action(env, ActorId(0)),
                TakeOutcome::Started {
                    kind: ActionKind::Move
                }
            );
            // Still this actor's turn until the first step commits.
            assert_eq!(scheduler.state.turn.current_actor(), Some(ActorId(0)));

            scheduler.tick(env);
            assert_eq!(scheduler.state.turn.current_actor(), Some(ActorId(1)));
            // Occupancy moved before the hand-off.
            assert!(scheduler.state.occupancy.is_free(GridPosition::ORIGIN));
            assert_eq!(
                scheduler.state.actor(ActorId(0)).unwrap().position,
                GridPosition::new(1, 0)
            );
        });
    }

    #[test]
    fn attack_hands_off_when_taken() {
        let mut state = two_actor_state();
        // Stand adjacent for a melee swing.
        {
            let actor = state.actor_mut(ActorId(1)).unwrap();
            let old = actor.position;
            actor.position = GridPosition::new(1, 0);
            let moved = actor.position;
            assert!(state.occupancy.release(old, ActorId(1)));
            assert!(state.occupancy.reserve(moved, ActorId(1)));
        }

        with_env(|env| {
            let mut scheduler = Scheduler::new(&mut state);
            let request = ActionRequest::new(ActionKind::MeleeAttack).against(ActorId(1));
            scheduler
                .queue_action(env, ActorId(0), request, false)
                .unwrap();

            assert_eq!(
                scheduler.take_action(env, ActorId(0)),
                TakeOutcome::Started {
                    kind: ActionKind::MeleeAttack
                }
            );
            assert_eq!(scheduler.state.turn.current_actor(), Some(ActorId(1)));
        });
    }

    #[test]
    fn hand_off_refills_the_next_budget() {
        let mut state = two_actor_state();
        state.actor_mut(ActorId(1)).unwrap().ap = ActionPoints::new(0);

        with_env(|env| {
            let mut scheduler = Scheduler::new(&mut state);
            scheduler.hand_off(env);
            let refilled = scheduler.state.actor(ActorId(1)).unwrap().ap;
            assert_eq!(
                refilled,
                ActionPoints::new(env.balance.turning().ap_per_turn)
            );
        });
    }

    #[test]
    fn actions_execute_without_turn_gating() {
        let mut state = two_actor_state();
        with_env(|env| {
            let mut scheduler = Scheduler::new(&mut state);
            assert_eq!(scheduler.state.turn.current_actor(), Some(ActorId(0)));

            // Chained follow-ups run after hand-off, so an actor who is
            // not current must still be able to take its queue.
            let request = ActionRequest::new(ActionKind::Inventory);
            scheduler
                .queue_action(env, ActorId(1), request, false)
                .unwrap();
            assert_eq!(
                scheduler.take_action(env, ActorId(1)),
                TakeOutcome::Finished {
                    kind: ActionKind::Inventory
                }
            );
            assert_eq!(scheduler.state.turn.current_actor(), Some(ActorId(0)));
        });
    }

    #[test]
    fn end_turn_flushes_the_queue_and_hands_off() {
        let mut state = two_actor_state();
        with_env(|env| {
            let mut scheduler = Scheduler::new(&mut state);
            let request = ActionRequest::new(ActionKind::Inventory);
            scheduler
                .queue_action(env, ActorId(0), request, false)
                .unwrap();

            scheduler.end_turn(env, ActorId(0));
            assert_eq!(scheduler.state.turn.current_actor(), Some(ActorId(1)));
            assert_eq!(scheduler.take_action(env, ActorId(0)), TakeOutcome::Idle);
        });
    }
}
