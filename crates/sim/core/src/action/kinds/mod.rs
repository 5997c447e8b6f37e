//! Per-kind planning and tick logic.
//!
//! Each animated kind exposes a `plan_*` function (validate and price at
//! dequeue time) and a `tick_*` function (advance its phase machine by one
//! tick); instant kinds only plan. The scheduler is the sole caller.

pub mod combat;
pub mod interact;
pub mod inventory;
pub mod movement;
pub mod turning;
