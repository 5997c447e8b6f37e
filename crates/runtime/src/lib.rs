//! Simulation host.
//!
//! Wires the pure combat core to host concerns: an owning
//! [`SimulationContext`], `tracing`-backed presentation and diagnostics,
//! JSON balance tables, and the NPC scoring provider.

pub mod ai;
pub mod balance;
pub mod context;
pub mod error;
pub mod presentation;

pub use ai::{AiScorer, ScoreWeights, best_candidate};
pub use balance::BalanceConfig;
pub use context::{SimulationContext, SimulationContextBuilder};
pub use error::{Result, RuntimeError};
pub use presentation::TracingSink;
