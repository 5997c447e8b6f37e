//! Simulation state: combatants, occupancy, turn order, in-flight actions.

pub mod types;

pub use types::{
    ActionPoints, Activity, ActorId, ActorState, Alliance, ArmorSlot, BodyPart, BodyPartKind,
    BodyParts, EquippedItem, Equipment, GridPosition, ItemHandle, Meter, OccupancyGrid, Tick,
    TurnState, standard_body,
};

use std::collections::BTreeMap;

use crate::action::InFlightAction;

/// Errors raised while mutating top-level state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum StateError {
    #[error("actor {0} not found")]
    ActorNotFound(ActorId),

    #[error("cell {0} is already occupied")]
    CellOccupied(GridPosition),
}

/// The complete mutable state of one running simulation session.
///
/// All state is in-memory and scoped to the session; there is no
/// persistence surface. Mutation flows through the scheduler and the
/// attack/movement pipelines, single-threaded by construction.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimState {
    pub actors: BTreeMap<ActorId, ActorState>,
    pub occupancy: OccupancyGrid,
    pub turn: TurnState,

    /// At most one in-flight (mid-animation) action per actor.
    pub in_flight: BTreeMap<ActorId, InFlightAction>,
}

impl SimState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an actor, reserving its cell and appending it to the turn
    /// rotation.
    pub fn spawn(&mut self, actor: ActorState) -> Result<(), StateError> {
        if !self.occupancy.reserve(actor.position, actor.id) {
            return Err(StateError::CellOccupied(actor.position));
        }
        self.turn.order.push(actor.id);
        self.actors.insert(actor.id, actor);
        Ok(())
    }

    pub fn actor(&self, id: ActorId) -> Option<&ActorState> {
        self.actors.get(&id)
    }

    pub fn actor_mut(&mut self, id: ActorId) -> Option<&mut ActorState> {
        self.actors.get_mut(&id)
    }

    /// Returns true if the actor exists and is alive.
    pub fn is_alive(&self, id: ActorId) -> bool {
        self.actor(id).is_some_and(|actor| actor.alive)
    }

    /// Living actors in deterministic id order.
    pub fn living(&self) -> impl Iterator<Item = &ActorState> {
        self.actors.values().filter(|actor| actor.alive)
    }

    /// The living actor holding `cell`, if any.
    pub fn living_occupant(&self, cell: GridPosition) -> Option<&ActorState> {
        let id = self.occupancy.occupant(cell)?;
        self.actor(id).filter(|actor| actor.alive)
    }

    /// Post-death cleanup: vacate the grid, drop from the rotation, flush
    /// the queue, and discard any in-flight action. The corpse's state is
    /// retained for inspection.
    pub fn bury(&mut self, id: ActorId) {
        self.occupancy.evict(id);
        self.turn.remove(id);
        self.in_flight.remove(&id);
        if let Some(actor) = self.actors.get_mut(&id) {
            actor.alive = false;
            actor.queue.clear();
            actor.activity = Activity::empty();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spawn_reserves_cell_and_turn_slot() {
        let mut state = SimState::new();
        let actor = ActorState::new(ActorId(1), GridPosition::new(2, 2), Alliance::Enemy, 20);
        state.spawn(actor).unwrap();
        assert_eq!(state.occupancy.occupant(GridPosition::new(2, 2)), Some(ActorId(1)));
        assert_eq!(state.turn.order, vec![ActorId(1)]);
    }

    #[test]
    fn spawn_rejects_occupied_cell() {
        let mut state = SimState::new();
        let cell = GridPosition::new(1, 1);
        state
            .spawn(ActorState::new(ActorId(1), cell, Alliance::Enemy, 20))
            .unwrap();
        let result = state.spawn(ActorState::new(ActorId(2), cell, Alliance::Ally, 20));
        assert_eq!(result, Err(StateError::CellOccupied(cell)));
    }

    #[test]
    fn bury_clears_all_participation() {
        let mut state = SimState::new();
        let cell = GridPosition::new(3, 3);
        state
            .spawn(ActorState::new(ActorId(7), cell, Alliance::Enemy, 20))
            .unwrap();
        state.bury(ActorId(7));
        assert!(state.occupancy.is_free(cell));
        assert!(state.turn.order.is_empty());
        assert!(!state.is_alive(ActorId(7)));
    }
}
