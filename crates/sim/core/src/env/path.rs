//! Pathfinding collaborator contract.

use crate::state::GridPosition;

/// Path and reachability queries consumed by the movement controller.
///
/// The simulation assumes path computation completes synchronously within
/// the call (the original engine blocked until the graph finished), so
/// implementations must not defer work.
pub trait PathOracle: Send + Sync {
    /// Ordered cells from `start` (exclusive) to `goal` (inclusive).
    /// Empty means unreachable. Dynamic occupancy is *not* the oracle's
    /// concern; the movement controller re-checks each step against the
    /// occupancy grid at commit time.
    fn find_path(&self, start: GridPosition, goal: GridPosition) -> Vec<GridPosition>;

    /// Walkable cells within the inclusive rectangle `min..=max`.
    fn nodes_in_region(&self, min: GridPosition, max: GridPosition) -> Vec<GridPosition>;

    /// Whether the static graph admits standing on `position`.
    fn is_walkable(&self, position: GridPosition) -> bool;

    /// Additional AP-cost fraction for entering `position` (swamp, rubble).
    fn terrain_penalty(&self, _position: GridPosition) -> f32 {
        0.0
    }

    /// Height of the cell, used for height-adjusted range checks.
    fn elevation(&self, _position: GridPosition) -> i32 {
        0
    }
}
