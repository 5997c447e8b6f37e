use std::fmt;

/// Unique identifier for any combatant tracked in the state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActorId(pub u32);

impl ActorId {
    /// Reserved identifier for the player-controlled combatant.
    pub const PLAYER: Self = Self(0);

    /// Returns true if this identifier represents the player.
    #[inline]
    pub const fn is_player(self) -> bool {
        self.0 == Self::PLAYER.0
    }
}

impl Default for ActorId {
    fn default() -> Self {
        Self::PLAYER
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Discrete grid position expressed in cell coordinates.
///
/// The continuous "world" position is derived, never stored: presentation
/// layers multiply by their cell size. All range and adjacency queries in
/// the core operate on cell coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridPosition {
    pub x: i32,
    pub y: i32,
}

impl GridPosition {
    pub const ORIGIN: Self = Self { x: 0, y: 0 };

    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Derived continuous position for a given cell size.
    pub fn world(&self, cell_size: f32) -> (f32, f32) {
        (self.x as f32 * cell_size, self.y as f32 * cell_size)
    }

    /// Number of king-move steps between two cells (Chebyshev distance).
    ///
    /// This is the distance metric for melee range and movement legs on an
    /// 8-connected grid.
    pub fn step_distance(&self, other: GridPosition) -> u32 {
        let dx = (self.x - other.x).unsigned_abs();
        let dy = (self.y - other.y).unsigned_abs();
        dx.max(dy)
    }

    /// Returns true if `other` is one king-move away (not the same cell).
    pub fn is_adjacent(&self, other: GridPosition) -> bool {
        self.step_distance(other) == 1
    }

    /// Returns true if a single step from `self` to `other` crosses a
    /// diagonal. Only meaningful for adjacent cells.
    pub fn is_diagonal_step(&self, other: GridPosition) -> bool {
        self.x != other.x && self.y != other.y
    }

    pub fn offset(&self, dx: i32, dy: i32) -> GridPosition {
        GridPosition::new(self.x + dx, self.y + dy)
    }
}

impl Default for GridPosition {
    fn default() -> Self {
        Self::ORIGIN
    }
}

impl fmt::Display for GridPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Discrete simulation time unit. Every in-flight action phase advances by
/// whole ticks; there is no sub-tick time in the core.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Self = Self(0);

    pub fn new(value: u64) -> Self {
        Self(value)
    }
}

impl std::ops::Add<u64> for Tick {
    type Output = Tick;
    fn add(self, rhs: u64) -> Tick {
        Tick(self.0 + rhs)
    }
}

impl std::ops::Sub<u64> for Tick {
    type Output = Tick;
    fn sub(self, rhs: u64) -> Tick {
        Tick(self.0 - rhs)
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Per-turn action point budget.
///
/// Invariant: never negative. All spending goes through [`ActionPoints::spend`],
/// which refuses to overdraw.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActionPoints(pub u32);

impl ActionPoints {
    pub const ZERO: Self = Self(0);

    pub fn new(value: u32) -> Self {
        Self(value)
    }

    /// Returns true if the budget covers `cost`.
    pub fn can_afford(&self, cost: ActionPoints) -> bool {
        self.0 >= cost.0
    }

    /// Deducts `cost`, or returns false leaving the balance untouched.
    #[must_use]
    pub fn spend(&mut self, cost: ActionPoints) -> bool {
        if self.0 >= cost.0 {
            self.0 -= cost.0;
            true
        } else {
            false
        }
    }
}

impl fmt::Display for ActionPoints {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} AP", self.0)
    }
}

/// Integer meter with a fixed maximum, used for body-part health and item
/// durability. Damage saturates at zero; the meter never goes negative and
/// never exceeds its maximum.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Meter {
    pub current: u32,
    pub maximum: u32,
}

impl Meter {
    pub fn new(current: u32, maximum: u32) -> Self {
        Self {
            current: current.min(maximum),
            maximum,
        }
    }

    pub fn full(maximum: u32) -> Self {
        Self {
            current: maximum,
            maximum,
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.current == 0
    }

    /// Reduces the meter by `amount`, clamped at zero. Returns the amount
    /// actually absorbed.
    pub fn damage(&mut self, amount: u32) -> u32 {
        let absorbed = amount.min(self.current);
        self.current -= absorbed;
        absorbed
    }

    /// Restores the meter by `amount`, clamped at the maximum.
    pub fn restore(&mut self, amount: u32) {
        self.current = (self.current + amount).min(self.maximum);
    }
}

/// Allegiance tag used for hostility checks and AI scoring penalties.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Alliance {
    /// The player-controlled combatant.
    Player,
    /// Fights alongside the player.
    Ally,
    /// Hostile to the player and allies.
    Enemy,
    /// Hostile to nobody; still penalized as collateral in area attacks.
    Neutral,
}

impl Alliance {
    /// Returns true if actors of these two alliances attack each other.
    pub fn hostile_to(self, other: Alliance) -> bool {
        match (self, other) {
            (Alliance::Enemy, Alliance::Player | Alliance::Ally) => true,
            (Alliance::Player | Alliance::Ally, Alliance::Enemy) => true,
            _ => false,
        }
    }

    /// Returns true if these two alliances are on the same side.
    pub fn allied_with(self, other: Alliance) -> bool {
        matches!(
            (self, other),
            (Alliance::Player | Alliance::Ally, Alliance::Player | Alliance::Ally)
                | (Alliance::Enemy, Alliance::Enemy)
        )
    }
}
