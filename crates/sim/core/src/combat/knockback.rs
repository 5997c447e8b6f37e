//! Knockback displacement.

use crate::env::{PresentationEvent, SimEnv};
use crate::facing::Direction;
use crate::state::{ActorId, GridPosition, SimState};

/// Attempts to push `defender` one cell away from `attacker_origin`.
///
/// Runs after any hit that dealt damage or was blocked, provided the
/// defender survived. The push only commits when the destination cell is
/// walkable and unoccupied; otherwise the defender stands fast. Occupancy
/// and logical position update together, same ordering as a movement step.
pub fn attempt_knockback(
    state: &mut SimState,
    env: &SimEnv<'_>,
    attacker_origin: GridPosition,
    defender: ActorId,
) -> Option<GridPosition> {
    let defender_state = state.actor(defender)?;
    if !defender_state.alive {
        return None;
    }
    let from = defender_state.position;

    let direction = Direction::between(attacker_origin, from);
    let (dx, dy) = direction.delta();
    let destination = from.offset(dx, dy);

    if !env.path.is_walkable(destination) || !state.occupancy.is_free(destination) {
        return None;
    }

    if !state.occupancy.release(from, defender) {
        return None;
    }
    if !state.occupancy.reserve(destination, defender) {
        // Re-hold the origin; the defender never left it logically.
        let _ = state.occupancy.reserve(from, defender);
        return None;
    }

    state.actor_mut(defender)?.position = destination;
    env.presentation.notify(PresentationEvent::KnockedBack {
        actor: defender,
        to: destination,
    });

    Some(destination)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::{
        AmmoStats, ArmorStats, DefaultBalance, ItemOracle, NullSink, OpenVision, PathOracle,
        PcgRng, ShieldStats, WeaponStats,
    };
    use crate::state::{ActorState, Alliance, ItemHandle};

    struct NoItems;

    impl ItemOracle for NoItems {
        fn weapon(&self, _handle: ItemHandle) -> Option<WeaponStats> {
            None
        }
        fn armor(&self, _handle: ItemHandle) -> Option<ArmorStats> {
            None
        }
        fn shield(&self, _handle: ItemHandle) -> Option<ShieldStats> {
            None
        }
        fn ammo(&self, _handle: ItemHandle) -> Option<AmmoStats> {
            None
        }
    }

    struct OpenFloor;

    impl PathOracle for OpenFloor {
        fn find_path(&self, _start: GridPosition, _goal: GridPosition) -> Vec<GridPosition> {
            Vec::new()
        }
        fn nodes_in_region(&self, _min: GridPosition, _max: GridPosition) -> Vec<GridPosition> {
            Vec::new()
        }
        fn is_walkable(&self, _position: GridPosition) -> bool {
            true
        }
    }

    fn with_env<R>(run: impl FnOnce(&SimEnv<'_>) -> R) -> R {
        let path = OpenFloor;
        let vision = OpenVision;
        let items = NoItems;
        let balance = DefaultBalance;
        let rng = PcgRng::new(0);
        let sink = NullSink;
        let env = SimEnv::new(&path, &vision, &items, &balance, &rng, &sink);
        run(&env)
    }

    #[test]
    fn pushes_away_from_attacker() {
        let mut state = SimState::new();
        state
            .spawn(ActorState::new(
                ActorId(1),
                GridPosition::new(5, 6),
                Alliance::Enemy,
                20,
            ))
            .unwrap();

        let pushed = with_env(|env| {
            attempt_knockback(&mut state, env, GridPosition::new(5, 5), ActorId(1))
        });
        assert_eq!(pushed, Some(GridPosition::new(5, 7)));
        assert_eq!(
            state.occupancy.occupant(GridPosition::new(5, 7)),
            Some(ActorId(1))
        );
        assert!(state.occupancy.is_free(GridPosition::new(5, 6)));
    }

    #[test]
    fn occupied_destination_cancels_push() {
        let mut state = SimState::new();
        state
            .spawn(ActorState::new(
                ActorId(1),
                GridPosition::new(5, 6),
                Alliance::Enemy,
                20,
            ))
            .unwrap();
        state
            .spawn(ActorState::new(
                ActorId(2),
                GridPosition::new(5, 7),
                Alliance::Ally,
                20,
            ))
            .unwrap();

        let pushed = with_env(|env| {
            attempt_knockback(&mut state, env, GridPosition::new(5, 5), ActorId(1))
        });
        assert_eq!(pushed, None);
        assert_eq!(
            state.actor(ActorId(1)).unwrap().position,
            GridPosition::new(5, 6)
        );
    }
}
