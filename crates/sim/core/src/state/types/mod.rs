//! Core state types.

pub mod actor;
pub mod body;
pub mod common;
pub mod equipment;
pub mod turn;
pub mod world;

pub use actor::{Activity, ActorState};
pub use body::{BodyPart, BodyPartKind, BodyParts, standard_body};
pub use common::{ActionPoints, ActorId, Alliance, GridPosition, Meter, Tick};
pub use equipment::{ArmorSlot, EquippedItem, Equipment, ItemHandle};
pub use turn::TurnState;
pub use world::OccupancyGrid;
