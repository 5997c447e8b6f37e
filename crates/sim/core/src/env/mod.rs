//! External collaborator contracts.
//!
//! The simulation core treats pathfinding, vision, item stats, balance
//! tables, randomness, and presentation as injected oracles. [`SimEnv`]
//! bundles them so the action pipelines take one parameter instead of six.
//! Unlike read-optional setups, every collaborator here is mandatory: the
//! combat core cannot take a single step without all of them.

mod balance;
mod items;
mod path;
mod presentation;
mod rng;
mod vision;

pub use balance::{
    AttackParams, BalanceOracle, DefaultBalance, DefenseParams, MovementParams, TurnParams,
    UtilityParams,
};
pub use items::{
    AmmoStats, ArmorStats, EmptyCatalog, ItemOracle, ShieldStats, WeaponClass, WeaponStats,
};
pub use path::PathOracle;
pub use presentation::{NullSink, PresentationEvent, PresentationSink};
pub use rng::{PcgRng, RngOracle, RollChannel, roll_seed};
pub use vision::{OpenVision, VisionOracle};

/// Borrowed bundle of every collaborator the pipelines consume.
#[derive(Clone, Copy)]
pub struct SimEnv<'a> {
    pub path: &'a dyn PathOracle,
    pub vision: &'a dyn VisionOracle,
    pub items: &'a dyn ItemOracle,
    pub balance: &'a dyn BalanceOracle,
    pub rng: &'a dyn RngOracle,
    pub presentation: &'a dyn PresentationSink,
}

impl<'a> SimEnv<'a> {
    pub fn new(
        path: &'a dyn PathOracle,
        vision: &'a dyn VisionOracle,
        items: &'a dyn ItemOracle,
        balance: &'a dyn BalanceOracle,
        rng: &'a dyn RngOracle,
        presentation: &'a dyn PresentationSink,
    ) -> Self {
        Self {
            path,
            vision,
            items,
            balance,
            rng,
            presentation,
        }
    }
}
