//! Attack orchestration.
//!
//! One attack attempt flows through: target/area selection, range and
//! obstruction validation, per-defender dodge/block arbitration, the
//! layered damage pipeline, durability accounting on both sides, and a
//! knockback attempt. Logical effects commit immediately; the swing
//! animation is the action layer's concern.

use arrayvec::ArrayVec;
use strum::IntoEnumIterator;

use crate::config::SimConfig;
use crate::env::{PresentationEvent, RollChannel, SimEnv, WeaponStats, roll_seed};
use crate::facing::Direction;
use crate::state::{
    ActorId, ActorState, BodyPartKind, EquippedItem, GridPosition, SimState, Tick,
};

use super::context::{
    AttackContext, AttackFlags, AttackKind, AttackReport, DefenderOutcome, HandSlot, StrikeProfile,
};
use super::damage::{LayerState, StrikeDamage, resolve_damage};
use super::defense::{DefenseRoll, roll_defense, roll_fumble};
use super::knockback::attempt_knockback;

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum AttackError {
    #[error("attacker {0} not found")]
    AttackerNotFound(ActorId),

    #[error("attacker {0} is dead")]
    AttackerDead(ActorId),

    #[error("no living target in the attack area")]
    NoTarget,

    #[error("distance {distance} outside weapon range {min}-{max}")]
    OutOfRange { distance: u32, min: u32, max: u32 },

    #[error("no line of sight to target cell")]
    NoLineOfSight,

    #[error("attack line is obstructed")]
    LineObstructed,
}

/// What to attack and how.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AttackRequest {
    pub kind: AttackKind,
    pub target_cell: GridPosition,
    /// Preferred defender; falls back to whoever holds the target cell.
    pub target_actor: Option<ActorId>,
}

impl AttackRequest {
    pub fn new(kind: AttackKind, target_cell: GridPosition) -> Self {
        Self {
            kind,
            target_cell,
            target_actor: None,
        }
    }

    pub fn against(mut self, actor: ActorId) -> Self {
        self.target_actor = Some(actor);
        self
    }
}

/// Validates an attack without mutating anything. The scheduler calls this
/// at queue *and* dequeue time; a failure at dequeue skips the action with
/// no AP charge.
pub fn validate_attack(
    state: &SimState,
    env: &SimEnv<'_>,
    attacker: ActorId,
    request: &AttackRequest,
) -> Result<(), AttackError> {
    let attacker_state = state
        .actor(attacker)
        .ok_or(AttackError::AttackerNotFound(attacker))?;
    if !attacker_state.alive {
        return Err(AttackError::AttackerDead(attacker));
    }

    let origin = attacker_state.position;
    let (_, min_range, max_range) = build_strike(attacker_state, request.kind, env);

    let distance = effective_distance(env, origin, request.target_cell);
    if distance < min_range || distance > max_range {
        return Err(AttackError::OutOfRange {
            distance,
            min: min_range,
            max: max_range,
        });
    }

    if !env.vision.in_line_of_sight(origin, request.target_cell) {
        return Err(AttackError::NoLineOfSight);
    }
    if env.vision.attack_line_blocked(origin, request.target_cell) {
        return Err(AttackError::LineObstructed);
    }
    if request.kind.blocked_by_intervening_actors()
        && line_has_intervening_actor(state, origin, request.target_cell)
    {
        return Err(AttackError::LineObstructed);
    }

    if resolve_defenders(state, attacker, origin, request).is_empty() {
        return Err(AttackError::NoTarget);
    }

    Ok(())
}

/// Executes one attack. Validation runs again internally; the world may
/// have shifted since the caller last checked.
pub fn resolve_attack(
    state: &mut SimState,
    env: &SimEnv<'_>,
    attacker: ActorId,
    request: &AttackRequest,
) -> Result<AttackReport, AttackError> {
    validate_attack(state, env, attacker, request)?;

    let tick = state.turn.clock;
    let Some(attacker_state) = state.actor(attacker) else {
        return Err(AttackError::AttackerNotFound(attacker));
    };
    let origin = attacker_state.position;
    let (strike, _, _) = build_strike(attacker_state, request.kind, env);
    let defenders = resolve_defenders(state, attacker, origin, request);

    let context = AttackContext {
        attacker,
        kind: request.kind,
        origin,
        target_cell: request.target_cell,
        strike,
        defenders,
    };

    // Attacks snap the attacker's facing onto the target; an out-of-turn
    // (opportunity) swing has no rotation phase to wait for.
    if let Some(actor) = state.actor_mut(attacker) {
        actor.facing = Direction::between(origin, request.target_cell);
    }

    env.presentation.notify(PresentationEvent::AttackStarted {
        actor: attacker,
        target_cell: request.target_cell,
    });

    let mut report = AttackReport::default();
    let mut attacker_wear_total: u32 = 0;

    for defender in context.defenders.iter().copied() {
        let outcome = resolve_one_defender(
            state,
            env,
            &context,
            defender,
            tick,
            &mut attacker_wear_total,
        );
        let _ = report.outcomes.try_push(outcome);
    }

    apply_attacker_wear(state, attacker, &context.strike, attacker_wear_total);

    Ok(report)
}

fn resolve_one_defender(
    state: &mut SimState,
    env: &SimEnv<'_>,
    context: &AttackContext,
    defender: ActorId,
    tick: Tick,
    attacker_wear_total: &mut u32,
) -> DefenderOutcome {
    let mut outcome = DefenderOutcome {
        defender,
        flags: AttackFlags::empty(),
        damage: 0,
        body_part: None,
        fumbled_item: None,
    };
    let params = env.balance.attack();

    let Some(defender_state) = state.actor(defender) else {
        return outcome;
    };

    match roll_defense(defender_state, context.attacker, tick, env) {
        DefenseRoll::Dodged => {
            outcome.flags |= AttackFlags::DODGED;
            env.presentation
                .notify(PresentationEvent::Dodged { actor: defender });
            return outcome;
        }
        DefenseRoll::Blocked {
            slot,
            block_defense,
        } => {
            outcome.flags |= AttackFlags::BLOCKED;

            // Held steady for durability accounting: the block absorbs the
            // strike's full durability hit instead of the body part taking
            // health damage.
            let block_wear =
                (context.strike.damage.base_damage * context.strike.damage.effectiveness).round()
                    as u32;
            *attacker_wear_total +=
                (block_defense * params.weapon_wear_factor).round() as u32 + params.weapon_wear_base;

            let fumbled = roll_fumble(defender, context.attacker, tick, env);
            let mut dropped = None;
            if let Some(defender_state) = state.actor_mut(defender) {
                match slot {
                    HandSlot::OffHand => {
                        if let Some(item) = defender_state.equipment.off_hand.as_mut() {
                            item.damage_durability(block_wear);
                        }
                        if fumbled {
                            dropped = defender_state.equipment.fumble_off_hand();
                        }
                    }
                    HandSlot::MainHand => {
                        if let Some(item) = defender_state.equipment.main_hand.as_mut() {
                            item.damage_durability(block_wear);
                        }
                        if fumbled {
                            dropped = defender_state.equipment.main_hand.take();
                        }
                    }
                }
            }

            env.presentation
                .notify(PresentationEvent::Recoiled { actor: defender });
            if fumbled {
                outcome.flags |= AttackFlags::FUMBLED;
                outcome.fumbled_item = dropped;
                if let Some(item) = dropped {
                    env.presentation.notify(PresentationEvent::Fumbled {
                        actor: defender,
                        item: item.handle,
                    });
                }
            }

            if attempt_knockback(state, env, context.origin, defender).is_some() {
                outcome.flags |= AttackFlags::KNOCKED_BACK;
            }
            return outcome;
        }
        DefenseRoll::Hit => {}
    }

    let body_part = pick_body_part(env, tick, context.attacker, defender);
    outcome.body_part = Some(body_part);

    let Some(defender_state) = state.actor(defender) else {
        return outcome;
    };
    let (layer1, layer2) = armor_layers(defender_state, env, body_part);
    let result = resolve_damage(&context.strike.damage, layer1, layer2, &params);
    *attacker_wear_total += result.attacker_wear;

    if let Some(defender_state) = state.actor_mut(defender) {
        let (primary_slot, secondary_slot) = body_part.armor_layers();
        if let (Some(outcome_1), Some(slot)) = (result.layer1, primary_slot)
            && let Some(item) = defender_state.equipment.armor_mut(slot)
        {
            item.damage_durability(outcome_1.durability_damage);
        }
        if let (Some(outcome_2), Some(slot)) = (result.layer2, secondary_slot)
            && let Some(item) = defender_state.equipment.armor_mut(slot)
        {
            item.damage_durability(outcome_2.durability_damage);
        }

        outcome.damage = result.final_damage;
        let died = defender_state.damage_body_part(body_part, result.final_damage);
        if context.kind.is_melee() {
            defender_state.mark_melee_hit(tick);
        }

        if died {
            outcome.flags |= AttackFlags::KILLED;
            state.bury(defender);
            env.presentation
                .notify(PresentationEvent::Died { actor: defender });
        } else if result.final_damage > 0
            && attempt_knockback(state, env, context.origin, defender).is_some()
        {
            outcome.flags |= AttackFlags::KNOCKED_BACK;
        }
    }

    outcome
}

/// Derives the strike profile from the attacker's equipment. Returns the
/// profile plus the effective (min, max) range of the attack.
///
/// Missing or broken weaponry degrades to the unarmed constants rather
/// than failing; gloves add their bonus to unarmed strikes while intact.
fn build_strike(
    attacker: &ActorState,
    kind: AttackKind,
    env: &SimEnv<'_>,
) -> (StrikeProfile, u32, u32) {
    let params = env.balance.attack();

    let main = intact_weapon(attacker.equipment.main_hand.as_ref(), env);
    let off = intact_weapon(attacker.equipment.off_hand.as_ref(), env);

    let Some(main) = main else {
        return (unarmed_strike(attacker, env), 0, 1);
    };

    if kind == AttackKind::Ranged && main.projectile {
        let ammo = attacker
            .equipment
            .ammo
            .as_ref()
            .filter(|item| item.is_intact())
            .and_then(|item| env.items.ammo(item.handle));

        // Projectile attacks average the launcher's and the ammunition's
        // armor interaction; damage stacks.
        let (damage, effectiveness, pierce, uses_ammo) = match ammo {
            Some(ammo) => (
                (main.damage + ammo.damage) as f32,
                (main.effectiveness + ammo.effectiveness) / 2.0,
                (main.armor_pierce + ammo.armor_pierce) / 2.0,
                true,
            ),
            None => (main.damage as f32, main.effectiveness, main.armor_pierce, false),
        };

        let profile = StrikeProfile {
            damage: StrikeDamage::new(damage, effectiveness, pierce),
            weapon_slot: Some(HandSlot::MainHand),
            uses_ammo,
        };
        return (profile, main.min_range.max(2), main.max_range);
    }

    // Dual wield averages per-hand damage at reduced hand efficiency.
    let base_damage = match off {
        Some(off_weapon) => {
            (main.damage + off_weapon.damage) as f32 / 2.0 * params.dual_wield_efficiency
        }
        None => main.damage as f32,
    };

    let profile = StrikeProfile {
        damage: StrikeDamage::new(base_damage, main.effectiveness, main.armor_pierce),
        weapon_slot: Some(HandSlot::MainHand),
        uses_ammo: false,
    };
    (profile, main.min_range.min(1), main.max_range.max(1))
}

fn unarmed_strike(attacker: &ActorState, env: &SimEnv<'_>) -> StrikeProfile {
    let params = env.balance.attack();
    let glove_bonus = attacker
        .equipment
        .gloves
        .as_ref()
        .filter(|item| item.is_intact())
        .map_or(0, |_| params.glove_damage_bonus);

    StrikeProfile {
        damage: StrikeDamage::new(
            (params.unarmed_damage + glove_bonus) as f32,
            params.unarmed_effectiveness,
            params.unarmed_pierce,
        ),
        weapon_slot: None,
        uses_ammo: false,
    }
}

fn intact_weapon(item: Option<&EquippedItem>, env: &SimEnv<'_>) -> Option<WeaponStats> {
    let item = item.filter(|item| item.is_intact())?;
    env.items.weapon(item.handle)
}

/// Armor layers covering a body part, outermost first. A slot without an
/// equipped piece (or with one the catalog knows no armor stats for)
/// yields no layer and the damage passes through.
fn armor_layers(
    defender: &ActorState,
    env: &SimEnv<'_>,
    body_part: BodyPartKind,
) -> (Option<LayerState>, Option<LayerState>) {
    let (primary, secondary) = body_part.armor_layers();
    let layer = |slot| {
        let item: &EquippedItem = defender.equipment.armor(slot?)?;
        let stats = env.items.armor(item.handle)?;
        Some(LayerState {
            defense: stats.defense,
            durability: item.durability.current,
        })
    };
    (layer(primary), layer(secondary))
}

fn apply_attacker_wear(
    state: &mut SimState,
    attacker: ActorId,
    strike: &StrikeProfile,
    wear: u32,
) {
    if wear == 0 {
        return;
    }
    let Some(actor) = state.actor_mut(attacker) else {
        return;
    };
    match strike.weapon_slot {
        Some(HandSlot::MainHand) => {
            if let Some(item) = actor.equipment.main_hand.as_mut() {
                item.damage_durability(wear);
            }
        }
        Some(HandSlot::OffHand) => {
            if let Some(item) = actor.equipment.off_hand.as_mut() {
                item.damage_durability(wear);
            }
        }
        None => {}
    }
    if strike.uses_ammo
        && let Some(item) = actor.equipment.ammo.as_mut()
    {
        item.damage_durability(wear);
    }
}

/// Weighted hit-location pick.
fn pick_body_part(
    env: &SimEnv<'_>,
    tick: Tick,
    attacker: ActorId,
    defender: ActorId,
) -> BodyPartKind {
    let weights = env.balance.defense().hit_weights;
    let total: u32 = weights.iter().sum();
    let seed = roll_seed(tick, attacker, defender, RollChannel::HitLocation);
    let mut roll = env.rng.weighted_index(seed, total);

    for (kind, weight) in BodyPartKind::iter().zip(weights) {
        if roll < weight {
            return kind;
        }
        roll -= weight;
    }
    BodyPartKind::Torso
}

/// Defenders in the resolved target area, deterministic order.
fn resolve_defenders(
    state: &SimState,
    attacker: ActorId,
    origin: GridPosition,
    request: &AttackRequest,
) -> ArrayVec<ActorId, { SimConfig::MAX_AREA_TARGETS }> {
    let mut defenders = ArrayVec::new();

    match request.kind {
        AttackKind::Melee | AttackKind::Ranged => {
            let preferred = request
                .target_actor
                .filter(|&id| id != attacker && state.is_alive(id));
            let found = preferred.or_else(|| {
                state
                    .living_occupant(request.target_cell)
                    .map(|actor| actor.id)
                    .filter(|&id| id != attacker)
            });
            if let Some(id) = found {
                defenders.push(id);
            }
        }
        AttackKind::Swipe => {
            for cell in swipe_cells(origin, request.target_cell) {
                if let Some(actor) = state.living_occupant(cell)
                    && actor.id != attacker
                {
                    let _ = defenders.try_push(actor.id);
                }
            }
        }
    }

    defenders
}

/// The three cells a swipe covers: straight ahead plus the two flanking
/// 45-degree cells around the attacker.
pub fn swipe_cells(origin: GridPosition, target: GridPosition) -> [GridPosition; 3] {
    let direction = Direction::between(origin, target);
    let cell = |dir: Direction| {
        let (dx, dy) = dir.delta();
        origin.offset(dx, dy)
    };
    [
        cell(direction),
        cell(direction.rotated(1)),
        cell(direction.rotated(-1)),
    ]
}

/// Range metric with the height adjustment: grid steps plus the elevation
/// difference between the two cells.
pub fn effective_distance(env: &SimEnv<'_>, from: GridPosition, to: GridPosition) -> u32 {
    let steps = from.step_distance(to);
    let elevation = (env.path.elevation(from) - env.path.elevation(to)).unsigned_abs();
    steps + elevation
}

/// True if any living actor other than the endpoints stands on the line
/// between the two cells.
fn line_has_intervening_actor(state: &SimState, from: GridPosition, to: GridPosition) -> bool {
    line_cells(from, to)
        .into_iter()
        .any(|cell| state.living_occupant(cell).is_some())
}

/// Cells strictly between two endpoints along a Bresenham line.
fn line_cells(from: GridPosition, to: GridPosition) -> Vec<GridPosition> {
    let mut cells = Vec::new();

    let dx = (to.x - from.x).abs();
    let dy = -(to.y - from.y).abs();
    let sx = if from.x < to.x { 1 } else { -1 };
    let sy = if from.y < to.y { 1 } else { -1 };
    let mut err = dx + dy;
    let (mut x, mut y) = (from.x, from.y);

    loop {
        if x == to.x && y == to.y {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
        if x == to.x && y == to.y {
            break;
        }
        cells.push(GridPosition::new(x, y));
    }

    cells
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::{
        AmmoStats, ArmorStats, AttackParams, BalanceOracle, DefaultBalance, DefenseParams,
        ItemOracle, MovementParams, NullSink, OpenVision, PathOracle, PcgRng, ShieldStats,
        TurnParams, UtilityParams, WeaponClass, WeaponStats,
    };
    use crate::state::{Alliance, GridPosition, ItemHandle};

    struct ShieldOnly;

    impl ItemOracle for ShieldOnly {
        fn weapon(&self, _handle: ItemHandle) -> Option<WeaponStats> {
            None
        }
        fn armor(&self, _handle: ItemHandle) -> Option<ArmorStats> {
            None
        }
        fn shield(&self, _handle: ItemHandle) -> Option<ShieldStats> {
            Some(ShieldStats {
                defense: 8.0,
                block_chance: 100,
                encumbrance: 0.0,
            })
        }
        fn ammo(&self, _handle: ItemHandle) -> Option<AmmoStats> {
            None
        }
    }

    /// Default balance with the fumble guaranteed and the dodge pinned off.
    struct AlwaysFumbles;

    impl BalanceOracle for AlwaysFumbles {
        fn movement(&self) -> MovementParams {
            DefaultBalance.movement()
        }
        fn turning(&self) -> TurnParams {
            DefaultBalance.turning()
        }
        fn attack(&self) -> AttackParams {
            DefaultBalance.attack()
        }
        fn defense(&self) -> DefenseParams {
            DefenseParams {
                dodge_chance: 0,
                weapon_block_chance: 0,
                fumble_chance: 100,
                hit_weights: [0, 100, 0, 0, 0, 0],
            }
        }
        fn utility(&self) -> UtilityParams {
            DefaultBalance.utility()
        }
        fn attack_cost_modifier(&self, class: WeaponClass) -> Option<f32> {
            DefaultBalance.attack_cost_modifier(class)
        }
    }

    struct NoPath;

    impl PathOracle for NoPath {
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

    #[test]
    fn fumbled_block_surfaces_the_dropped_item() {
        let mut state = SimState::new();
        state
            .spawn(ActorState::new(
                ActorId(1),
                GridPosition::new(0, 0),
                Alliance::Player,
                20,
            ))
            .unwrap();
        state
            .spawn(ActorState::new(
                ActorId(2),
                GridPosition::new(1, 0),
                Alliance::Enemy,
                20,
            ))
            .unwrap();
        state.actor_mut(ActorId(2)).unwrap().equipment.off_hand =
            Some(EquippedItem::new(ItemHandle(9), 30));

        let path = NoPath;
        let vision = OpenVision;
        let items = ShieldOnly;
        let balance = AlwaysFumbles;
        let rng = PcgRng::new(3);
        let sink = NullSink;
        let env = SimEnv::new(&path, &vision, &items, &balance, &rng, &sink);

        let request =
            AttackRequest::new(AttackKind::Melee, GridPosition::new(1, 0)).against(ActorId(2));
        let report = resolve_attack(&mut state, &env, ActorId(1), &request).unwrap();

        let outcome = report.outcome_for(ActorId(2)).unwrap();
        assert!(outcome.flags.contains(AttackFlags::BLOCKED));
        assert!(outcome.flags.contains(AttackFlags::FUMBLED));

        // The dropped shield travels out in the outcome, wear applied,
        // and is gone from the hand.
        let dropped = outcome.fumbled_item.expect("blocking shield was in hand");
        assert_eq!(dropped.handle, ItemHandle(9));
        assert_eq!(dropped.durability.current, 29);

        let defender = state.actor(ActorId(2)).unwrap();
        assert!(defender.equipment.off_hand.is_none());
        assert_eq!(defender.total_health(), defender.max_health());
    }

    #[test]
    fn line_cells_excludes_endpoints() {
        let cells = line_cells(GridPosition::new(0, 0), GridPosition::new(3, 0));
        assert_eq!(
            cells,
            vec![GridPosition::new(1, 0), GridPosition::new(2, 0)]
        );
    }

    #[test]
    fn adjacent_cells_have_no_line() {
        assert!(line_cells(GridPosition::new(0, 0), GridPosition::new(1, 1)).is_empty());
    }

    #[test]
    fn swipe_covers_three_cells() {
        let cells = swipe_cells(GridPosition::new(5, 5), GridPosition::new(5, 6));
        assert_eq!(cells[0], GridPosition::new(5, 6));
        assert_eq!(cells[1], GridPosition::new(6, 6));
        assert_eq!(cells[2], GridPosition::new(4, 6));
    }
}
