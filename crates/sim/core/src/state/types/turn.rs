//! Turn order bookkeeping.

use super::common::{ActorId, Tick};

/// Round-robin turn order plus the simulation clock.
///
/// The scheduler owns the hand-off protocol; this type only tracks whose
/// turn it is. Dead actors are dropped from the rotation by the scheduler,
/// never by presentation code.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TurnState {
    /// Actors in fixed rotation order.
    pub order: Vec<ActorId>,
    /// Index into `order` of the actor whose turn it is.
    pub current: usize,
    /// Simulation clock, advanced once per scheduler tick.
    pub clock: Tick,
    /// Count of completed hand-offs, for diagnostics and seeding.
    pub handoffs: u64,
}

impl TurnState {
    pub fn new(order: Vec<ActorId>) -> Self {
        Self {
            order,
            current: 0,
            clock: Tick::ZERO,
            handoffs: 0,
        }
    }

    /// The actor whose turn it currently is, if any actor remains.
    pub fn current_actor(&self) -> Option<ActorId> {
        self.order.get(self.current).copied()
    }

    /// Rotates to the next actor in order. Returns the new current actor.
    pub fn advance(&mut self) -> Option<ActorId> {
        if self.order.is_empty() {
            return None;
        }
        self.current = (self.current + 1) % self.order.len();
        self.handoffs += 1;
        self.current_actor()
    }

    /// Removes a dead actor from the rotation, keeping the current index
    /// pointing at the same live actor where possible.
    pub fn remove(&mut self, actor: ActorId) {
        if let Some(index) = self.order.iter().position(|&id| id == actor) {
            self.order.remove(index);
            if self.order.is_empty() {
                self.current = 0;
            } else {
                if index < self.current {
                    self.current -= 1;
                }
                self.current %= self.order.len();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_wraps_around() {
        let mut turn = TurnState::new(vec![ActorId(0), ActorId(1), ActorId(2)]);
        assert_eq!(turn.current_actor(), Some(ActorId(0)));
        assert_eq!(turn.advance(), Some(ActorId(1)));
        assert_eq!(turn.advance(), Some(ActorId(2)));
        assert_eq!(turn.advance(), Some(ActorId(0)));
        assert_eq!(turn.handoffs, 3);
    }

    #[test]
    fn remove_preserves_current_actor() {
        let mut turn = TurnState::new(vec![ActorId(0), ActorId(1), ActorId(2)]);
        turn.advance();
        turn.advance();
        assert_eq!(turn.current_actor(), Some(ActorId(2)));
        turn.remove(ActorId(0));
        assert_eq!(turn.current_actor(), Some(ActorId(2)));
    }

    #[test]
    fn remove_last_actor_empties_rotation() {
        let mut turn = TurnState::new(vec![ActorId(5)]);
        turn.remove(ActorId(5));
        assert_eq!(turn.current_actor(), None);
        assert_eq!(turn.advance(), None);
    }
}
