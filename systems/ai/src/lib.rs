#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Computer commander that plays a full turn for the active side.
//!
//! Every difficulty runs the same algorithm: draw, maybe play a card, then for
//! each unit attack if something is in range, move, and attack again. The
//! difficulty only changes the scoring weights and how often the commander
//! falls back to random play. All decisions read the world through
//! [`gettysburg_world::query`] and act through [`gettysburg_world::apply`], so
//! the commander can never break a rule a human player is held to.

use gettysburg_core::{
    CardInstanceId, CardKind, Cell, Command, Difficulty, Event, Side, Unit, UnitId, UnitKind,
};
use gettysburg_system_combat::Engagement;
use gettysburg_world::{self as world, query, World};
use rand::Rng;
use tracing::{debug, info};

/// Score added when an attack is expected to eliminate its target.
const LETHAL_BONUS: f32 = 100.0;
/// Score added to a destination from which some enemy can be attacked.
const ENGAGE_BONUS: f32 = 2.0;
/// Terrain attraction of a destination, indexed by difficulty level - 1.
const TERRAIN_ATTRACTION: [f32; 4] = [0.2, 0.6, 1.1, 1.5];
/// Chance that an Easy commander plays a unit at random.
const EASY_RANDOM_UNIT_CHANCE: f64 = 0.35;
/// Chance that an Easy commander considers its hand at all.
const EASY_CARD_CHANCE: f64 = 0.6;
/// Chance that Ammo Shortage is played when the commander is not forced to.
const AMMO_PLAY_CHANCE: f64 = 0.85;
/// Hit points the wounded-target weights measure damage against.
const FULL_STRENGTH_HP: i32 = 5;

/// Configuration parameters required to construct a commander.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    difficulty: Difficulty,
}

impl Config {
    /// Creates a configuration for the provided difficulty.
    #[must_use]
    pub const fn new(difficulty: Difficulty) -> Self {
        Self { difficulty }
    }
}

/// Computer player for whichever side is active when [`Commander::run_turn`] runs.
#[derive(Clone, Copy, Debug)]
pub struct Commander {
    difficulty: Difficulty,
}

impl Commander {
    /// Creates a commander using the supplied configuration.
    #[must_use]
    pub const fn new(config: Config) -> Self {
        Self {
            difficulty: config.difficulty,
        }
    }

    /// Difficulty the commander plays at.
    #[must_use]
    pub const fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    /// Plays the active side's whole turn and hands it over unless the battle ended.
    ///
    /// Events produced by every issued command are appended to `out_events`.
    pub fn run_turn<R: Rng + ?Sized>(
        &self,
        world: &mut World,
        rng: &mut R,
        out_events: &mut Vec<Event>,
    ) {
        if query::winner(world).is_some() {
            return;
        }
        let side = query::turn_side(world);
        info!(%side, difficulty = self.difficulty.name(), "commander acting");

        if !query::has_drawn_card(world) {
            let _ = issue(world, Command::DrawCard, rng, out_events);
        }
        let easy = self.difficulty == Difficulty::Easy;
        if self.difficulty == Difficulty::Lee {
            play_cards(world, true, rng, out_events);
        } else if !easy || rng.gen_bool(EASY_CARD_CHANCE) {
            play_cards(world, false, rng, out_events);
        }

        if query::units_of(world, side.opponent()).next().is_none() {
            return;
        }
        let focus = if self.difficulty == Difficulty::Lee {
            pick_focus_target(world, side)
        } else {
            None
        };
        if let Some(focus) = focus {
            debug!(%side, target = %focus, "focus target chosen");
        }

        let roster: Vec<UnitId> = query::units_of(world, side).map(|unit| unit.id).collect();
        for id in roster {
            if query::unit(world, id).is_none() {
                continue;
            }
            if easy && rng.gen_bool(EASY_RANDOM_UNIT_CHANCE) {
                act_randomly(world, id, rng, out_events);
            } else {
                self.act(world, id, focus, rng, out_events);
            }
            if query::winner(world).is_some() {
                return;
            }
        }

        if query::winner(world).is_none() {
            let _ = issue(world, Command::EndTurn, rng, out_events);
        }
    }

    /// Scripted attack, move, attack sequence for one unit.
    fn act<R: Rng + ?Sized>(
        &self,
        world: &mut World,
        id: UnitId,
        focus: Option<UnitId>,
        rng: &mut R,
        out_events: &mut Vec<Event>,
    ) {
        self.attack_if_able(world, id, focus, rng, out_events);
        if query::winner(world).is_some() {
            return;
        }

        let moved = query::action_state(world, id).map_or(true, |actions| actions.moved);
        if !moved {
            let destination =
                query::unit(world, id).and_then(|unit| self.pick_best_move(world, unit, focus));
            if let Some(destination) = destination {
                select(world, id, rng, out_events);
                let _ = issue(world, Command::MoveUnit { destination }, rng, out_events);
            }
        }

        self.attack_if_able(world, id, focus, rng, out_events);
    }

    fn attack_if_able<R: Rng + ?Sized>(
        &self,
        world: &mut World,
        id: UnitId,
        focus: Option<UnitId>,
        rng: &mut R,
        out_events: &mut Vec<Event>,
    ) {
        let attacked = query::action_state(world, id).map_or(true, |actions| actions.attacked);
        if attacked {
            return;
        }
        let targets = query::attack_targets(world, id);
        let target = query::unit(world, id)
            .and_then(|unit| self.pick_best_attack(world, unit, &targets, focus));
        if let Some(target) = target {
            select(world, id, rng, out_events);
            let _ = issue(world, Command::AttackUnit { target }, rng, out_events);
        }
    }

    /// Chooses the enemy cell `attacker` should strike among `targets`.
    ///
    /// Ties keep the first target encountered.
    #[must_use]
    pub fn pick_best_attack(
        &self,
        world: &World,
        attacker: &Unit,
        targets: &[Cell],
        focus: Option<UnitId>,
    ) -> Option<Cell> {
        let level = self.difficulty.level();
        let terrain = query::terrain(world);
        let modifier = query::attack_modifier(world, attacker.side());

        let mut best: Option<(Cell, f32)> = None;
        for &cell in targets {
            let Some(defender) = query::unit_at(world, cell) else {
                continue;
            };
            let expected = Engagement::between(attacker, defender, terrain, modifier)
                .expected_damage();
            let mut score = expected;
            if expected >= defender.hp as f32 {
                score += LETHAL_BONUS;
            }
            let missing_hp = (FULL_STRENGTH_HP - defender.hp) as f32;
            if level >= 2 {
                score += missing_hp * 0.15;
            }
            if level >= 3 {
                if defender.kind == UnitKind::Artillery {
                    score += 1.1;
                }
                if defender.hp <= 2 {
                    score += 0.8;
                }
            }
            if level == 4 {
                if focus == Some(defender.id) {
                    score += 2.0;
                }
                score += match defender.kind {
                    UnitKind::Artillery => 1.6,
                    UnitKind::Cavalry => 0.8,
                    UnitKind::Infantry => 0.2,
                };
                score += (1 - defender.defense) as f32 * 0.6;
                if terrain.contains(defender.cell) {
                    score += 0.8;
                }
            }

            if best.map_or(true, |(_, best_score)| score > best_score) {
                best = Some((cell, score));
            }
        }

        if let Some((cell, score)) = best {
            debug!(attacker = %attacker.id, target = %cell, score, "attack chosen");
        }
        best.map(|(cell, _)| cell)
    }

    /// Chooses where `unit` should move, or `None` when it cannot move or has
    /// no enemy to close on.
    ///
    /// Only the top difficulty steers toward `focus`; the others close on the
    /// nearest enemy.
    #[must_use]
    pub fn pick_best_move(
        &self,
        world: &World,
        unit: &Unit,
        focus: Option<UnitId>,
    ) -> Option<Cell> {
        let level = self.difficulty.level();
        let moves = query::move_targets(world, unit.id);
        let enemies: Vec<&Unit> = query::units_of(world, unit.side().opponent()).collect();
        if moves.is_empty() || enemies.is_empty() {
            return None;
        }
        let terrain = query::terrain(world);
        let focus_cell = focus
            .filter(|_| level == 4)
            .and_then(|id| query::unit(world, id))
            .map(|target| target.cell);
        let terrain_attraction = TERRAIN_ATTRACTION[usize::from(level.clamp(1, 4) - 1)];

        let mut best: Option<(Cell, f32)> = None;
        for destination in moves {
            let distance = match focus_cell {
                Some(target) => destination.manhattan_distance(target),
                None => enemies
                    .iter()
                    .map(|enemy| destination.manhattan_distance(enemy.cell))
                    .min()
                    .unwrap_or(0),
            };
            let mut score = -(distance as f32);

            if terrain.contains(destination) {
                score += terrain_attraction;
            }
            let in_reach = query::attack_targets_from(world, unit, destination).len();
            if in_reach > 0 {
                score += ENGAGE_BONUS;
            }

            let threats = threats_at(destination, &enemies, |_| true) as f32;
            match level {
                2 => score -= threats * 0.35,
                3 | 4 => {
                    let weight = if level == 3 { 0.8 } else { 0.55 };
                    let artillery = threats_at(destination, &enemies, |enemy| {
                        enemy.kind == UnitKind::Artillery
                    }) as f32;
                    score -= threats * weight + artillery * weight;
                }
                _ => {}
            }

            if level == 4 {
                if destination.column() <= 2 || destination.column() >= 5 {
                    score += 0.25;
                }
                score += in_reach as f32 * 0.25;
            }

            if best.map_or(true, |(_, best_score)| score > best_score) {
                best = Some((destination, score));
            }
        }

        if let Some((cell, score)) = best {
            debug!(unit = %unit.id, destination = %cell, score, "move chosen");
        }
        best.map(|(cell, _)| cell)
    }
}

/// Picks the enemy of `side` most worth concentrating on this turn.
///
/// Artillery ranks first, then cavalry, then infantry; wounds and terrain
/// raise the score. Ties keep the earliest deployed unit.
#[must_use]
pub fn pick_focus_target(world: &World, side: Side) -> Option<UnitId> {
    let terrain = query::terrain(world);
    let mut best: Option<(UnitId, f32)> = None;
    for enemy in query::units_of(world, side.opponent()) {
        let mut score = match enemy.kind {
            UnitKind::Artillery => 3.0,
            UnitKind::Cavalry => 1.2,
            UnitKind::Infantry => 0.6,
        };
        score += (FULL_STRENGTH_HP - enemy.hp) as f32 * 0.7;
        if terrain.contains(enemy.cell) {
            score += 1.0;
        }
        if best.map_or(true, |(_, best_score)| score > best_score) {
            best = Some((enemy.id, score));
        }
    }
    best.map(|(id, _)| id)
}

/// Number of `enemies` matching `filter` that could strike `cell`.
fn threats_at(cell: Cell, enemies: &[&Unit], filter: impl Fn(&Unit) -> bool) -> usize {
    enemies
        .iter()
        .filter(|enemy| filter(**enemy) && enemy.reaches_from(enemy.cell, cell))
        .count()
}

/// Plays Reinforcements when it can deploy, then Ammo Shortage when forced
/// or when the dice allow.
fn play_cards<R: Rng + ?Sized>(
    world: &mut World,
    force: bool,
    rng: &mut R,
    out_events: &mut Vec<Event>,
) {
    let side = query::turn_side(world);
    if query::reinforcement_cell(world, side).is_some() {
        if let Some(card) = card_in_hand(world, side, CardKind::Reinforcements) {
            if issue(world, Command::PlayCard { card }, rng, out_events) {
                return;
            }
        }
    }

    if let Some(card) = card_in_hand(world, side, CardKind::AmmoShortage) {
        if force || rng.gen_bool(AMMO_PLAY_CHANCE) {
            let _ = issue(world, Command::PlayCard { card }, rng, out_events);
        }
    }
}

/// Easy-mode fallback: a coin flip orders move and attack, both at random.
fn act_randomly<R: Rng + ?Sized>(
    world: &mut World,
    id: UnitId,
    rng: &mut R,
    out_events: &mut Vec<Event>,
) {
    let move_first = rng.gen_bool(0.5);
    if move_first {
        move_randomly(world, id, rng, out_events);
    }

    let attacked = query::action_state(world, id).map_or(true, |actions| actions.attacked);
    if !attacked {
        let targets = query::attack_targets(world, id);
        if !targets.is_empty() {
            let target = targets[rng.gen_range(0..targets.len())];
            select(world, id, rng, out_events);
            let _ = issue(world, Command::AttackUnit { target }, rng, out_events);
            if query::winner(world).is_some() {
                return;
            }
        }
    }

    if !move_first {
        move_randomly(world, id, rng, out_events);
    }
}

fn move_randomly<R: Rng + ?Sized>(
    world: &mut World,
    id: UnitId,
    rng: &mut R,
    out_events: &mut Vec<Event>,
) {
    let moved = query::action_state(world, id).map_or(true, |actions| actions.moved);
    if moved {
        return;
    }
    let moves = query::move_targets(world, id);
    if moves.is_empty() {
        return;
    }
    let destination = moves[rng.gen_range(0..moves.len())];
    select(world, id, rng, out_events);
    let _ = issue(world, Command::MoveUnit { destination }, rng, out_events);
}

fn card_in_hand(world: &World, side: Side, kind: CardKind) -> Option<CardInstanceId> {
    query::hand(world, side)
        .iter()
        .find(|card| card.kind == kind)
        .map(|card| card.id)
}

fn select<R: Rng + ?Sized>(
    world: &mut World,
    id: UnitId,
    rng: &mut R,
    out_events: &mut Vec<Event>,
) {
    if query::selected_unit(world) != Some(id) {
        let _ = issue(world, Command::SelectUnit { unit: id }, rng, out_events);
    }
}

/// Applies `command` and reports whether the world accepted it.
fn issue<R: Rng + ?Sized>(
    world: &mut World,
    command: Command,
    rng: &mut R,
    out_events: &mut Vec<Event>,
) -> bool {
    let start = out_events.len();
    world::apply(world, command, rng, out_events);
    !out_events[start..]
        .iter()
        .any(|event| matches!(event, Event::ActionRejected { .. }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn threats_count_only_enemies_in_their_own_range() {
        let artillery = Unit::new(
            UnitId::regular(Side::Union, 3),
            UnitKind::Artillery,
            Cell::new(5, 2),
        );
        let infantry = Unit::new(
            UnitId::regular(Side::Union, 1),
            UnitKind::Infantry,
            Cell::new(5, 5),
        );
        let enemies = [&artillery, &infantry];

        assert_eq!(threats_at(Cell::new(3, 2), &enemies, |_| true), 1);
        assert_eq!(threats_at(Cell::new(4, 5), &enemies, |_| true), 1);
        assert_eq!(threats_at(Cell::new(4, 4), &enemies, |_| true), 0);
        assert_eq!(
            threats_at(Cell::new(3, 2), &enemies, |enemy| enemy.kind
                == UnitKind::Infantry),
            0
        );
    }

    #[test]
    fn commander_reports_its_difficulty() {
        let commander = Commander::new(Config::new(Difficulty::Hard));
        assert_eq!(commander.difficulty(), Difficulty::Hard);
    }
}
