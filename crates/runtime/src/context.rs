//! The owning simulation host.
//!
//! [`SimulationContext`] is the single mutable root of a running session:
//! it owns the world state, the oracle bundle, and the master tick. Every
//! component receives the context's view explicitly; there are no global
//! registries to reach into.

use tracing::{debug, info, trace, warn};

use sim_core::{
    ActionRequest, ActorId, ActorState, BalanceOracle, CompletedAction, EmptyCatalog, ItemOracle,
    NullSink, OpenVision, PathOracle, PcgRng, PresentationSink, Scheduler, SimEnv, SimState,
    TakeOutcome, Tick, VisionOracle,
};

use crate::error::Result;

/// Owns one simulation session end to end.
pub struct SimulationContext {
    state: SimState,
    path: Box<dyn PathOracle>,
    vision: Box<dyn VisionOracle>,
    items: Box<dyn ItemOracle>,
    balance: Box<dyn BalanceOracle>,
    rng: PcgRng,
    presentation: Box<dyn PresentationSink>,
}

impl SimulationContext {
    /// Starts building a context. Pathfinding is the one collaborator
    /// without a sensible default.
    pub fn builder(path: Box<dyn PathOracle>) -> SimulationContextBuilder {
        SimulationContextBuilder {
            path,
            vision: None,
            items: None,
            balance: None,
            presentation: None,
            seed: None,
        }
    }

    pub fn state(&self) -> &SimState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut SimState {
        &mut self.state
    }

    pub fn clock(&self) -> Tick {
        self.state.turn.clock
    }

    pub fn current_actor(&self) -> Option<ActorId> {
        self.state.turn.current_actor()
    }

    /// Adds a combatant to the session.
    pub fn spawn(&mut self, actor: ActorState) -> Result<()> {
        debug!(target: "runtime::context", actor = %actor.id, position = %actor.position, "spawn");
        self.state.spawn(actor)?;
        Ok(())
    }

    /// Queues an action for an actor.
    pub fn queue_action(
        &mut self,
        actor: ActorId,
        request: ActionRequest,
        immediate: bool,
    ) -> Result<()> {
        let (env, state) = self.split();
        let mut scheduler = Scheduler::new(state);
        scheduler.queue_action(&env, actor, request, immediate)?;
        debug!(
            target: "runtime::context",
            %actor,
            kind = request.kind.as_snake_case(),
            immediate,
            "queued"
        );
        Ok(())
    }

    /// Pops and executes the actor's next queued action, logging skips.
    pub fn take_action(&mut self, actor: ActorId) -> TakeOutcome {
        let (env, state) = self.split();
        let mut scheduler = Scheduler::new(state);
        let outcome = scheduler.take_action(&env, actor);
        match outcome {
            TakeOutcome::Skipped { kind, reason } => {
                warn!(
                    target: "runtime::context",
                    %actor,
                    kind = kind.as_snake_case(),
                    %reason,
                    "action skipped without charge"
                );
            }
            TakeOutcome::Started { kind } | TakeOutcome::Finished { kind } => {
                debug!(target: "runtime::context", %actor, kind = kind.as_snake_case(), ?outcome, "taken");
            }
            TakeOutcome::Busy | TakeOutcome::Idle => {}
        }
        outcome
    }

    /// Advances the master clock and every in-flight action by one tick.
    pub fn tick(&mut self) -> Vec<CompletedAction> {
        let (env, state) = self.split();
        let mut scheduler = Scheduler::new(state);
        let completed = scheduler.tick(&env);
        for done in &completed {
            trace!(
                target: "runtime::context",
                actor = %done.actor,
                kind = done.kind.as_snake_case(),
                "completed"
            );
        }
        completed
    }

    /// Ticks until no action is in flight, up to `max_ticks`. Returns the
    /// completions in order.
    pub fn settle(&mut self, max_ticks: u64) -> Vec<CompletedAction> {
        let mut completed = Vec::new();
        for _ in 0..max_ticks {
            completed.extend(self.tick());
            if self.state.in_flight.is_empty() {
                break;
            }
        }
        completed
    }

    pub fn end_turn(&mut self, actor: ActorId) {
        let (env, state) = self.split();
        Scheduler::new(state).end_turn(&env, actor);
    }

    pub fn cancel_actions(&mut self, actor: ActorId) {
        let (env, state) = self.split();
        Scheduler::new(state).cancel_actions(&env, actor);
    }

    /// Borrowed oracle bundle, for scoring and other read paths.
    pub fn env(&self) -> SimEnv<'_> {
        SimEnv::new(
            self.path.as_ref(),
            self.vision.as_ref(),
            self.items.as_ref(),
            self.balance.as_ref(),
            &self.rng,
            self.presentation.as_ref(),
        )
    }

    fn split(&mut self) -> (SimEnv<'_>, &mut SimState) {
        let env = SimEnv::new(
            self.path.as_ref(),
            self.vision.as_ref(),
            self.items.as_ref(),
            self.balance.as_ref(),
            &self.rng,
            self.presentation.as_ref(),
        );
        (env, &mut self.state)
    }
}

/// Builder for [`SimulationContext`]. Unset collaborators fall back to
/// permissive defaults; an unset seed is drawn fresh per session.
pub struct SimulationContextBuilder {
    path: Box<dyn PathOracle>,
    vision: Option<Box<dyn VisionOracle>>,
    items: Option<Box<dyn ItemOracle>>,
    balance: Option<Box<dyn BalanceOracle>>,
    presentation: Option<Box<dyn PresentationSink>>,
    seed: Option<u64>,
}

impl SimulationContextBuilder {
    pub fn vision(mut self, vision: Box<dyn VisionOracle>) -> Self {
        self.vision = Some(vision);
        self
    }

    pub fn items(mut self, items: Box<dyn ItemOracle>) -> Self {
        self.items = Some(items);
        self
    }

    pub fn balance(mut self, balance: Box<dyn BalanceOracle>) -> Self {
        self.balance = Some(balance);
        self
    }

    pub fn presentation(mut self, presentation: Box<dyn PresentationSink>) -> Self {
        self.presentation = Some(presentation);
        self
    }

    /// Fixed session seed; the same seed replays identically.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn build(self) -> SimulationContext {
        let seed = self.seed.unwrap_or_else(rand::random);
        info!(target: "runtime::context", seed, "session created");
        SimulationContext {
            state: SimState::new(),
            path: self.path,
            vision: self.vision.unwrap_or_else(|| Box::new(OpenVision)),
            items: self.items.unwrap_or_else(|| Box::new(EmptyCatalog)),
            balance: self
                .balance
                .unwrap_or_else(|| Box::new(crate::balance::BalanceConfig::default())),
            rng: PcgRng::new(seed),
            presentation: self.presentation.unwrap_or_else(|| Box::new(NullSink)),
        }
    }
}
