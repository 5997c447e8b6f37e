//! Shared fixtures for the integration tests: a rectangular BFS grid, a
//! small item catalog, and a balance table with the random rolls pinned
//! off so outcomes are exact.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use runtime::{BalanceConfig, SimulationContext};
use sim_core::{
    ActionPoints, ActorId, ActorState, Alliance, AmmoStats, ArmorStats, DefenseParams, Direction,
    EquippedItem, GridPosition, ItemHandle, ItemOracle, PathOracle, ShieldStats, WeaponClass,
    WeaponStats,
};

pub const SWORD: ItemHandle = ItemHandle(1);
pub const BODY_ARMOR: ItemHandle = ItemHandle(2);
pub const SHIELD: ItemHandle = ItemHandle(3);
pub const BOW: ItemHandle = ItemHandle(4);
pub const ARROW: ItemHandle = ItemHandle(5);
pub const KNIFE: ItemHandle = ItemHandle(6);

/// Bounded rectangular grid with 8-way BFS pathfinding.
pub struct RectGrid {
    pub width: i32,
    pub height: i32,
    pub blocked: BTreeSet<GridPosition>,
}

impl RectGrid {
    pub fn open(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            blocked: BTreeSet::new(),
        }
    }

    fn in_bounds(&self, cell: GridPosition) -> bool {
        cell.x >= 0 && cell.y >= 0 && cell.x < self.width && cell.y < self.height
    }
}

impl PathOracle for RectGrid {
    fn find_path(&self, start: GridPosition, goal: GridPosition) -> Vec<GridPosition> {
        if !self.is_walkable(goal) {
            return Vec::new();
        }
        let mut parents: BTreeMap<GridPosition, GridPosition> = BTreeMap::new();
        let mut frontier = VecDeque::from([start]);
        // Expand cardinal neighbors before diagonals so straight paths win
        // ties; a stray diagonal step costs 1.4x.
        let mut dirs = Direction::ALL;
        dirs.sort_by_key(|dir| {
            let (dx, dy) = dir.delta();
            dx.abs() + dy.abs()
        });
        while let Some(cell) = frontier.pop_front() {
            if cell == goal {
                let mut path = vec![cell];
                let mut cursor = cell;
                while let Some(&parent) = parents.get(&cursor) {
                    if parent == start {
                        break;
                    }
                    path.push(parent);
                    cursor = parent;
                }
                path.reverse();
                return path;
            }
            for dir in dirs {
                let (dx, dy) = dir.delta();
                let next = cell.offset(dx, dy);
                if self.is_walkable(next) && next != start && !parents.contains_key(&next) {
                    parents.insert(next, cell);
                    frontier.push_back(next);
                }
            }
        }
        Vec::new()
    }

    fn nodes_in_region(&self, min: GridPosition, max: GridPosition) -> Vec<GridPosition> {
        let mut nodes = Vec::new();
        for x in min.x..=max.x {
            for y in min.y..=max.y {
                let cell = GridPosition::new(x, y);
                if self.is_walkable(cell) {
                    nodes.push(cell);
                }
            }
        }
        nodes
    }

    fn is_walkable(&self, cell: GridPosition) -> bool {
        self.in_bounds(cell) && !self.blocked.contains(&cell)
    }
}

/// Small fixed catalog: sword, knife, bow with arrows, body armor, and a
/// shield that always blocks.
pub struct TestCatalog;

impl ItemOracle for TestCatalog {
    fn weapon(&self, handle: ItemHandle) -> Option<WeaponStats> {
        match handle {
            SWORD => Some(WeaponStats {
                class: WeaponClass::Sword,
                damage: 20,
                min_range: 0,
                max_range: 1,
                effectiveness: 0.6,
                armor_pierce: 0.2,
                two_handed: false,
                projectile: false,
                can_block: true,
                encumbrance: 0.0,
            }),
            KNIFE => Some(WeaponStats {
                class: WeaponClass::Knife,
                damage: 10,
                min_range: 0,
                max_range: 1,
                effectiveness: 0.5,
                armor_pierce: 0.1,
                two_handed: false,
                projectile: false,
                can_block: false,
                encumbrance: 0.0,
            }),
            BOW => Some(WeaponStats {
                class: WeaponClass::Bow,
                damage: 8,
                min_range: 2,
                max_range: 6,
                effectiveness: 0.4,
                armor_pierce: 0.2,
                two_handed: true,
                projectile: true,
                can_block: false,
                encumbrance: 0.0,
            }),
            _ => None,
        }
    }

    fn armor(&self, handle: ItemHandle) -> Option<ArmorStats> {
        (handle == BODY_ARMOR).then_some(ArmorStats {
            defense: 10.0,
            encumbrance: 0.0,
        })
    }

    fn shield(&self, handle: ItemHandle) -> Option<ShieldStats> {
        (handle == SHIELD).then_some(ShieldStats {
            defense: 8.0,
            block_chance: 100,
            encumbrance: 0.0,
        })
    }

    fn ammo(&self, handle: ItemHandle) -> Option<AmmoStats> {
        (handle == ARROW).then_some(AmmoStats {
            damage: 4,
            effectiveness: 0.8,
            armor_pierce: 0.6,
        })
    }
}

/// Balance table with every random defense outcome pinned off: no dodges,
/// no blocks, no fumbles, and every hit lands on the torso.
pub fn pinned_balance() -> BalanceConfig {
    let mut config = BalanceConfig::default();
    config.defense = Some(DefenseParams {
        dodge_chance: 0,
        weapon_block_chance: 0,
        fumble_chance: 0,
        hit_weights: [0, 100, 0, 0, 0, 0],
    });
    config
}

/// A fresh context over an open 12x12 grid with deterministic rolls.
/// Run with `RUST_LOG=runtime=debug` to watch the scheduler traffic.
pub fn battlefield() -> SimulationContext {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
    SimulationContext::builder(Box::new(RectGrid::open(12, 12)))
        .items(Box::new(TestCatalog))
        .balance(Box::new(pinned_balance()))
        .seed(0x5eed)
        .build()
}

/// Spawns a combatant with a full AP budget.
pub fn fighter(
    context: &mut SimulationContext,
    id: u32,
    position: GridPosition,
    alliance: Alliance,
    facing: Direction,
) -> ActorId {
    let id = ActorId(id);
    let mut actor = ActorState::new(id, position, alliance, 30);
    actor.facing = facing;
    actor.ap = ActionPoints::new(20);
    context.spawn(actor).unwrap();
    id
}

/// Equips an item in the main hand with the given durability.
pub fn arm(context: &mut SimulationContext, id: ActorId, handle: ItemHandle, durability: u32) {
    let actor = context.state_mut().actor_mut(id).unwrap();
    actor.equipment.main_hand = Some(EquippedItem::new(handle, durability));
}
