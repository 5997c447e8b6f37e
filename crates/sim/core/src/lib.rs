pub mod action;
pub mod combat;
pub mod config;
pub mod env;
pub mod facing;
pub mod scoring;
pub mod state;

pub use action::{
    ActionKind, ActionQueue, ActionRequest, AttackProgress, CompletedAction, InFlightAction,
    InFlightKind, MovePhase, MoveProgress, QueueEntry, ScheduleError, Scheduler, SkipReason,
    TakeOutcome, TurnProgress,
};
pub use combat::{
    AttackError, AttackFlags, AttackKind, AttackReport, AttackRequest, DamageOutcome,
    DefenderOutcome, HandSlot, LayerState, StrikeDamage, StrikeProfile, resolve_attack,
    resolve_damage, validate_attack,
};
pub use config::SimConfig;
pub use env::{
    AmmoStats, ArmorStats, AttackParams, BalanceOracle, DefaultBalance, DefenseParams,
    EmptyCatalog, ItemOracle, MovementParams, NullSink, OpenVision, PathOracle, PcgRng,
    PresentationEvent, PresentationSink, RngOracle, ShieldStats, SimEnv, TurnParams,
    UtilityParams, VisionOracle, WeaponClass, WeaponStats,
};
pub use facing::{Direction, RotationState, rotation_segments};
pub use scoring::{NOT_APPLICABLE, NpcAiAction};
pub use state::{
    ActionPoints, Activity, ActorId, ActorState, Alliance, ArmorSlot, BodyPart, BodyPartKind,
    BodyParts, EquippedItem, Equipment, GridPosition, ItemHandle, Meter, OccupancyGrid, SimState,
    StateError, Tick, TurnState, standard_body,
};
