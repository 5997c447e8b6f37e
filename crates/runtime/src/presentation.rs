//! Presentation sink backed by `tracing`.
//!
//! Headless hosts have no animation layer to notify, but the one-way
//! event stream is still the best record of what the combat core decided.
//! Each event becomes a structured trace event under the
//! `runtime::presentation` target.

use tracing::debug;

use sim_core::{PresentationEvent, PresentationSink};

/// Logs every presentation notification as a structured trace event.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink;

impl PresentationSink for TracingSink {
    fn notify(&self, event: PresentationEvent) {
        match event {
            PresentationEvent::MoveStarted { actor, from, to } => {
                debug!(target: "runtime::presentation", %actor, %from, %to, "move started");
            }
            PresentationEvent::MoveStopped { actor } => {
                debug!(target: "runtime::presentation", %actor, "move stopped");
            }
            PresentationEvent::AttackStarted { actor, target_cell } => {
                debug!(target: "runtime::presentation", %actor, %target_cell, "attack started");
            }
            PresentationEvent::AttackStopped { actor } => {
                debug!(target: "runtime::presentation", %actor, "attack stopped");
            }
            PresentationEvent::Dodged { actor } => {
                debug!(target: "runtime::presentation", %actor, "dodged");
            }
            PresentationEvent::Recoiled { actor } => {
                debug!(target: "runtime::presentation", %actor, "recoiled");
            }
            PresentationEvent::Fumbled { actor, item } => {
                debug!(target: "runtime::presentation", %actor, %item, "fumbled");
            }
            PresentationEvent::KnockedBack { actor, to } => {
                debug!(target: "runtime::presentation", %actor, %to, "knocked back");
            }
            PresentationEvent::RotationStarted { actor, target } => {
                debug!(target: "runtime::presentation", %actor, %target, "rotation started");
            }
            PresentationEvent::Died { actor } => {
                debug!(target: "runtime::presentation", %actor, "died");
            }
        }
    }
}
