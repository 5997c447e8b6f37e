//! Exclusive grid occupancy.

use std::collections::BTreeMap;

use super::common::{ActorId, GridPosition};

/// Cell-to-actor occupancy map with an exclusive-reservation protocol.
///
/// Invariant: at most one actor occupies a cell at any observable instant.
/// A movement step commits by releasing its origin and then reserving its
/// destination before the next actor's turn is released, so no two actors
/// can ever see the same cell as simultaneously free.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OccupancyGrid {
    cells: BTreeMap<GridPosition, ActorId>,
}

impl OccupancyGrid {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn occupant(&self, position: GridPosition) -> Option<ActorId> {
        self.cells.get(&position).copied()
    }

    pub fn is_free(&self, position: GridPosition) -> bool {
        !self.cells.contains_key(&position)
    }

    /// Reserves `position` for `actor`. Fails if another actor holds it;
    /// re-reserving one's own cell is a no-op success.
    #[must_use]
    pub fn reserve(&mut self, position: GridPosition, actor: ActorId) -> bool {
        match self.cells.get(&position) {
            Some(&occupant) => occupant == actor,
            None => {
                self.cells.insert(position, actor);
                true
            }
        }
    }

    /// Releases `position` if `actor` holds it. Returns false on a mismatch,
    /// which indicates an occupancy desync upstream.
    #[must_use]
    pub fn release(&mut self, position: GridPosition, actor: ActorId) -> bool {
        match self.cells.get(&position) {
            Some(&occupant) if occupant == actor => {
                self.cells.remove(&position);
                true
            }
            _ => false,
        }
    }

    /// Removes the actor from whatever cell it holds (death cleanup).
    pub fn evict(&mut self, actor: ActorId) {
        self.cells.retain(|_, occupant| *occupant != actor);
    }

    /// Cells currently held, in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = (GridPosition, ActorId)> + '_ {
        self.cells.iter().map(|(pos, actor)| (*pos, *actor))
    }
}
