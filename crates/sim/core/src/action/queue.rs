//! Per-actor action queues.

use arrayvec::ArrayVec;

use crate::config::SimConfig;
use crate::state::{ActionPoints, ActorId, GridPosition};

use super::ActionKind;

/// One configured action awaiting execution.
///
/// The `cost` here is the estimate computed at queue time; the scheduler
/// recomputes it at dequeue because world state may have shifted (a moving
/// target, a newly obstructed path) between queueing and taking.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct QueueEntry {
    pub request: ActionRequest,
    /// Immediate entries bypass queue ordering and run next.
    pub immediate: bool,
    pub cost: ActionPoints,
}

/// The configuration an action variant needs to execute: what to do, where,
/// and optionally against whom.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActionRequest {
    pub kind: ActionKind,
    pub target_cell: Option<GridPosition>,
    pub target_actor: Option<ActorId>,
}

impl ActionRequest {
    pub fn new(kind: ActionKind) -> Self {
        Self {
            kind,
            target_cell: None,
            target_actor: None,
        }
    }

    pub fn at(mut self, cell: GridPosition) -> Self {
        self.target_cell = Some(cell);
        self
    }

    pub fn against(mut self, actor: ActorId) -> Self {
        self.target_actor = Some(actor);
        self
    }
}

/// Bounded FIFO of pending actions with immediate-entry promotion.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActionQueue {
    entries: ArrayVec<QueueEntry, { SimConfig::MAX_QUEUED_ACTIONS }>,
}

impl ActionQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Appends an entry, or jumps it to the head when `immediate`.
    /// Returns false if the queue is full.
    #[must_use]
    pub fn push(&mut self, entry: QueueEntry) -> bool {
        if self.entries.is_full() {
            return false;
        }
        if entry.immediate {
            self.entries.insert(0, entry);
        } else {
            self.entries.push(entry);
        }
        true
    }

    /// Removes and returns the head entry.
    pub fn pop(&mut self) -> Option<QueueEntry> {
        if self.entries.is_empty() {
            None
        } else {
            Some(self.entries.remove(0))
        }
    }

    pub fn peek(&self) -> Option<&QueueEntry> {
        self.entries.first()
    }

    /// Flushes every pending entry (target died, actor cancelled).
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
