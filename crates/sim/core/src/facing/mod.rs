//! Discrete 8-direction orientation and rotation state machine.
//!
//! Facing is only ever one of the 8 canonical directions and is committed
//! exclusively on completed rotation. Rotation cost is a fixed lookup of
//! 45-degree segments between two directions, never angle arithmetic, so
//! turn costs are deterministic and symmetric.

use crate::state::GridPosition;

/// The 8 canonical facings, clockwise from north.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::EnumIter, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Direction {
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
}

impl Direction {
    /// All directions in clockwise order, indexable by [`Direction::index`].
    pub const ALL: [Direction; 8] = [
        Direction::North,
        Direction::NorthEast,
        Direction::East,
        Direction::SouthEast,
        Direction::South,
        Direction::SouthWest,
        Direction::West,
        Direction::NorthWest,
    ];

    /// Clockwise index, north = 0.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Grid delta of one step in this direction.
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Direction::North => (0, 1),
            Direction::NorthEast => (1, 1),
            Direction::East => (1, 0),
            Direction::SouthEast => (1, -1),
            Direction::South => (0, -1),
            Direction::SouthWest => (-1, -1),
            Direction::West => (-1, 0),
            Direction::NorthWest => (-1, 1),
        }
    }

    /// Pure facing from the sign of the grid offset `from -> to`.
    ///
    /// Same-cell input keeps no meaningful direction; callers pass distinct
    /// cells. Falls back to `North` for a zero offset.
    pub fn between(from: GridPosition, to: GridPosition) -> Direction {
        let dx = (to.x - from.x).signum();
        let dy = (to.y - from.y).signum();
        match (dx, dy) {
            (0, 1) => Direction::North,
            (1, 1) => Direction::NorthEast,
            (1, 0) => Direction::East,
            (1, -1) => Direction::SouthEast,
            (0, -1) => Direction::South,
            (-1, -1) => Direction::SouthWest,
            (-1, 0) => Direction::West,
            (-1, 1) => Direction::NorthWest,
            _ => Direction::North,
        }
    }

    /// Direction rotated by `steps` 45-degree segments clockwise (negative =
    /// counter-clockwise). Used for swipe arcs.
    pub fn rotated(self, steps: i32) -> Direction {
        let index = (self.index() as i32 + steps).rem_euclid(8) as usize;
        Direction::ALL[index]
    }
}

/// Number of 45-degree segments between two facings (0-4).
///
/// Fixed table rather than computed angles: `SEGMENTS[a][b]` is symmetric
/// and the AP-cost multiplier for a turn action.
pub fn rotation_segments(from: Direction, to: Direction) -> u32 {
    const SEGMENTS: [[u32; 8]; 8] = [
        [0, 1, 2, 3, 4, 3, 2, 1],
        [1, 0, 1, 2, 3, 4, 3, 2],
        [2, 1, 0, 1, 2, 3, 4, 3],
        [3, 2, 1, 0, 1, 2, 3, 4],
        [4, 3, 2, 1, 0, 1, 2, 3],
        [3, 4, 3, 2, 1, 0, 1, 2],
        [2, 3, 4, 3, 2, 1, 0, 1],
        [1, 2, 3, 4, 3, 2, 1, 0],
    ];

    SEGMENTS[from.index()][to.index()]
}

/// Tick-driven rotation toward a target facing.
///
/// Rotation is interruptible: dropping the state mid-turn leaves the actor
/// at its previous committed facing. Off-screen actors rotate instantly
/// (zero remaining ticks) since nobody observes the interpolation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RotationState {
    pub target: Direction,
    pub ticks_remaining: u64,
}

impl RotationState {
    /// Starts a rotation from `current` to `target`.
    ///
    /// `instant` skips the time-based interpolation (used when the actor is
    /// not on-screen); the facing still only commits via [`Self::tick`].
    pub fn begin(
        current: Direction,
        target: Direction,
        ticks_per_segment: u64,
        instant: bool,
    ) -> Self {
        let segments = rotation_segments(current, target) as u64;
        let ticks_remaining = if instant { 0 } else { segments * ticks_per_segment };
        Self {
            target,
            ticks_remaining,
        }
    }

    /// Advances one tick. Returns the completed facing once the rotation
    /// finishes, `None` while still turning.
    pub fn tick(&mut self) -> Option<Direction> {
        if self.ticks_remaining == 0 {
            return Some(self.target);
        }
        self.ticks_remaining -= 1;
        if self.ticks_remaining == 0 {
            Some(self.target)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn between_uses_offset_signs() {
        let origin = GridPosition::ORIGIN;
        assert_eq!(
            Direction::between(origin, GridPosition::new(5, 2)),
            Direction::NorthEast
        );
        assert_eq!(
            Direction::between(origin, GridPosition::new(0, -3)),
            Direction::South
        );
        assert_eq!(
            Direction::between(origin, GridPosition::new(-1, 0)),
            Direction::West
        );
    }

    #[test]
    fn segment_table_is_symmetric() {
        for a in Direction::iter() {
            for b in Direction::iter() {
                assert_eq!(rotation_segments(a, b), rotation_segments(b, a));
            }
        }
    }

    #[test]
    fn segment_table_bounds() {
        for a in Direction::iter() {
            assert_eq!(rotation_segments(a, a), 0);
            for b in Direction::iter() {
                assert!(rotation_segments(a, b) <= 4);
            }
        }
    }

    #[test]
    fn opposite_directions_are_four_segments() {
        assert_eq!(rotation_segments(Direction::North, Direction::South), 4);
        assert_eq!(rotation_segments(Direction::East, Direction::West), 4);
    }

    #[test]
    fn rotation_commits_only_on_completion() {
        let mut rotation =
            RotationState::begin(Direction::North, Direction::East, 2, false);
        assert_eq!(rotation.tick(), None);
        assert_eq!(rotation.tick(), None);
        assert_eq!(rotation.tick(), None);
        assert_eq!(rotation.tick(), Some(Direction::East));
    }

    #[test]
    fn instant_rotation_completes_on_first_tick() {
        let mut rotation =
            RotationState::begin(Direction::North, Direction::SouthWest, 5, true);
        assert_eq!(rotation.tick(), Some(Direction::SouthWest));
    }

    #[test]
    fn rotated_wraps_around() {
        assert_eq!(Direction::NorthWest.rotated(1), Direction::North);
        assert_eq!(Direction::North.rotated(-1), Direction::NorthWest);
        assert_eq!(Direction::East.rotated(4), Direction::West);
    }
}
