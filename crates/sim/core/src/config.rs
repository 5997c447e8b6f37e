//! Compile-time capacity bounds for in-state collections.

/// Fixed capacities used by `ArrayVec`-backed state containers.
///
/// Balance *values* (damage constants, AP budgets, chances) are runtime
/// data behind [`crate::env::BalanceOracle`]; only structural bounds that
/// size state types live here.
pub struct SimConfig;

impl SimConfig {
    /// Hit locations per actor (head, torso, arm, hand, leg, foot).
    pub const BODY_PART_COUNT: usize = 6;

    /// Maximum pending entries in one actor's action queue.
    pub const MAX_QUEUED_ACTIONS: usize = 8;

    /// Maximum simultaneous opportunity attackers interrupting one step.
    pub const MAX_INTERRUPTERS: usize = 4;

    /// Maximum defenders resolved by one area (swipe) attack.
    pub const MAX_AREA_TARGETS: usize = 3;
}
