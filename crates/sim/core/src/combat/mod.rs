//! Attack resolution.
//!
//! An attack runs as a fixed sequence per defender: dodge roll, block
//! roll, hit-location roll, then the two-layer damage pipeline in
//! [`damage`]. Blocks exchange item durability for the hit instead of
//! negating it for free; every roll draws from the deterministic seed
//! schedule in [`crate::env::RngOracle`].

mod context;
mod damage;
mod defense;
mod knockback;
mod resolver;

pub use context::{
    AttackContext, AttackFlags, AttackKind, AttackReport, DefenderOutcome, HandSlot, StrikeProfile,
};
pub use damage::{DamageOutcome, LayerOutcome, LayerState, StrikeDamage, resolve_damage, resolve_layer};
pub use defense::{DefenseRoll, roll_defense, roll_fumble};
pub use knockback::attempt_knockback;
pub use resolver::{
    AttackError, AttackRequest, effective_distance, resolve_attack, swipe_cells, validate_attack,
};
