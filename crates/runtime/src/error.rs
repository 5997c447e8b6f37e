//! Runtime error types.

use thiserror::Error;

/// Errors surfaced by the simulation host.
#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("scheduling failed: {0}")]
    Schedule(#[from] sim_core::ScheduleError),

    #[error("state mutation failed: {0}")]
    State(#[from] sim_core::StateError),

    #[error("balance table parse failed: {0}")]
    BalanceParse(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, RuntimeError>;
