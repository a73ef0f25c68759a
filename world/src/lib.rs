#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative battle state for the Gettysburg tactics engine.
//!
//! The world owns the board, the units, the turn/phase machine, the event
//! card hands and the battle outcome. Every mutation goes through [`apply`];
//! read access goes through the [`query`] module.

mod cards;
mod roster;

use std::collections::BTreeSet;

use gettysburg_core::{
    CardInstance, CardInstanceId, CardKind, Cell, Command, Event, Phase, RejectionReason,
    Scenario, Side, TerrainMap, Unit, UnitId, UnitKind, WinCondition,
};
use gettysburg_system_combat::{strike, CombatRoll, Engagement};
use rand::Rng;
use tracing::{debug, info};

use crate::{cards::CardOutcome, roster::Roster};

/// Name of the stand-alone battle loaded when a world is created.
pub const SKIRMISH_NAME: &str = "Skirmish";

/// Value kept separately for each side.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct PerSide<T> {
    union: T,
    confederacy: T,
}

impl<T> PerSide<T> {
    pub(crate) fn get(&self, side: Side) -> &T {
        match side {
            Side::Union => &self.union,
            Side::Confederacy => &self.confederacy,
        }
    }

    pub(crate) fn get_mut(&mut self, side: Side) -> &mut T {
        match side {
            Side::Union => &mut self.union,
            Side::Confederacy => &mut self.confederacy,
        }
    }
}

/// Turn-scoped state: who acts, which unit is selected, and temporary effects.
#[derive(Clone, Debug)]
pub(crate) struct TurnContext {
    side: Side,
    phase: Phase,
    selected: Option<UnitId>,
    pub(crate) modifiers: PerSide<i32>,
    drawn_this_turn: bool,
    number: u32,
}

impl TurnContext {
    fn opening() -> Self {
        Self {
            side: Side::Union,
            phase: Phase::Move,
            selected: None,
            modifiers: PerSide::default(),
            drawn_this_turn: false,
            number: 1,
        }
    }
}

/// Represents the authoritative state of one battle.
#[derive(Clone, Debug)]
pub struct World {
    scenario_name: String,
    terrain: TerrainMap,
    win_condition: WinCondition,
    pub(crate) roster: Roster,
    pub(crate) turn: TurnContext,
    hands: PerSide<Vec<CardInstance>>,
    next_card: u32,
    hold_count: u32,
    winner: Option<Side>,
}

impl World {
    /// Creates a world with the default skirmish loaded and Union to move.
    #[must_use]
    pub fn new() -> Self {
        let scenario = skirmish_scenario();
        Self {
            scenario_name: scenario.name,
            terrain: scenario.terrain,
            win_condition: scenario.win_condition,
            roster: Roster::deploy(scenario.units),
            turn: TurnContext::opening(),
            hands: PerSide::default(),
            next_card: 0,
            hold_count: 0,
            winner: None,
        }
    }

    fn ensure_in_progress(&self) -> Result<(), RejectionReason> {
        if self.winner.is_some() {
            Err(RejectionReason::BattleOver)
        } else {
            Ok(())
        }
    }

    fn execute<R: Rng + ?Sized>(
        &mut self,
        command: Command,
        rng: &mut R,
        out_events: &mut Vec<Event>,
    ) -> Result<(), RejectionReason> {
        match command {
            Command::StartBattle { scenario, roster } => {
                self.start_battle(scenario, roster, out_events)
            }
            Command::SelectUnit { unit } => self.select_unit(unit, out_events),
            Command::MoveUnit { destination } => self.move_selected(destination, out_events),
            Command::AttackUnit { target } => self.attack_with_selected(target, rng, out_events),
            Command::EndTurn => self.end_turn(out_events),
            Command::DrawCard => self.draw_card(rng, out_events),
            Command::PlayCard { card } => self.play_card(card, out_events),
        }
    }

    fn start_battle(
        &mut self,
        scenario: Scenario,
        carried: Option<Vec<Unit>>,
        out_events: &mut Vec<Event>,
    ) -> Result<(), RejectionReason> {
        let roster = match carried {
            Some(carried) => {
                let units = scenario
                    .units
                    .into_iter()
                    .filter(|unit| unit.side() != Side::Union)
                    .collect();
                deploy_units(units, carried)?
            }
            None => deploy_units(scenario.units, Vec::new())?,
        };

        self.scenario_name = scenario.name;
        self.terrain = scenario.terrain;
        self.win_condition = scenario.win_condition;
        self.roster = roster;
        self.turn = TurnContext::opening();
        self.hands = PerSide::default();
        self.next_card = 0;
        self.hold_count = 0;
        self.winner = None;

        info!(scenario = %self.scenario_name, units = self.roster.units().len(), "battle started");
        out_events.push(Event::BattleStarted {
            scenario: self.scenario_name.clone(),
            side: self.turn.side,
        });
        let _ = self.settle_outcome(out_events);
        Ok(())
    }

    fn select_unit(
        &mut self,
        id: UnitId,
        out_events: &mut Vec<Event>,
    ) -> Result<(), RejectionReason> {
        self.ensure_in_progress()?;
        let unit = self.roster.get(id).ok_or(RejectionReason::UnknownUnit)?;
        if unit.side() != self.turn.side {
            return Err(RejectionReason::NotYourUnit);
        }
        let actions = self.roster.actions(id).unwrap_or_default();
        if actions.is_exhausted() {
            return Err(RejectionReason::UnitExhausted);
        }

        let phase = if actions.moved {
            Phase::Attack
        } else {
            Phase::Move
        };
        self.turn.selected = Some(id);
        self.turn.phase = phase;
        out_events.push(Event::UnitSelected { unit: id, phase });
        Ok(())
    }

    fn selected_unit(&self) -> Result<&Unit, RejectionReason> {
        self.turn
            .selected
            .and_then(|id| self.roster.get(id))
            .filter(|unit| unit.side() == self.turn.side)
            .ok_or(RejectionReason::NoSelection)
    }

    fn move_selected(
        &mut self,
        destination: Cell,
        out_events: &mut Vec<Event>,
    ) -> Result<(), RejectionReason> {
        self.ensure_in_progress()?;
        let unit = self.selected_unit()?;
        let id = unit.id;
        let from = unit.cell;
        if self.roster.actions(id).unwrap_or_default().moved {
            return Err(RejectionReason::AlreadyMoved);
        }
        if !destination.is_on_board() {
            return Err(RejectionReason::OutOfBounds);
        }
        if !self.roster.is_free(destination) {
            return Err(RejectionReason::Occupied);
        }
        let distance = from.manhattan_distance(destination);
        if distance == 0 || distance > unit.movement {
            return Err(RejectionReason::OutOfReach);
        }

        if let Some(unit) = self.roster.get_mut(id) {
            unit.cell = destination;
        }
        self.roster.actions_mut(id).moved = true;
        debug!(unit = %id, %from, to = %destination, "unit moved");
        out_events.push(Event::UnitMoved {
            unit: id,
            from,
            to: destination,
        });
        self.advance_phase(out_events);
        Ok(())
    }

    fn attack_with_selected<R: Rng + ?Sized>(
        &mut self,
        target: Cell,
        rng: &mut R,
        out_events: &mut Vec<Event>,
    ) -> Result<(), RejectionReason> {
        self.ensure_in_progress()?;
        let attacker = self.selected_unit()?.clone();
        if self.roster.actions(attacker.id).unwrap_or_default().attacked {
            return Err(RejectionReason::AlreadyAttacked);
        }
        if !target.is_on_board() {
            return Err(RejectionReason::OutOfBounds);
        }
        let defender = self
            .roster
            .unit_at(target)
            .filter(|unit| unit.side() != attacker.side())
            .ok_or(RejectionReason::NoTarget)?;
        if !attacker.reaches_from(attacker.cell, target) {
            return Err(RejectionReason::OutOfRange);
        }

        let defender_id = defender.id;
        let engagement = Engagement::between(
            &attacker,
            defender,
            &self.terrain,
            *self.turn.modifiers.get(attacker.side()),
        );
        let roll = CombatRoll::roll(rng);
        let Some(defender) = self.roster.get_mut(defender_id) else {
            return Err(RejectionReason::NoTarget);
        };
        let outcome = strike(&engagement, roll, defender);
        self.roster.actions_mut(attacker.id).attacked = true;

        debug!(
            attacker = %attacker.id,
            defender = %defender_id,
            damage = outcome.damage,
            "attack resolved"
        );
        out_events.push(Event::UnitAttacked {
            attacker: attacker.id,
            defender: defender_id,
            damage: outcome.damage,
            attacker_on_terrain: engagement.attacker_on_terrain(),
            defender_on_terrain: engagement.defender_on_terrain(),
            modifier: engagement.modifier(),
        });

        if outcome.defender_eliminated && self.roster.remove(defender_id).is_some() {
            debug!(unit = %defender_id, "unit eliminated");
            out_events.push(Event::UnitEliminated { unit: defender_id });
        }

        if self.settle_outcome(out_events) {
            return Ok(());
        }
        self.advance_phase(out_events);
        Ok(())
    }

    fn advance_phase(&mut self, out_events: &mut Vec<Event>) {
        let Some(id) = self.turn.selected else {
            return;
        };
        let actions = self.roster.actions(id).unwrap_or_default();
        if self.turn.phase == Phase::Move && actions.moved {
            self.turn.phase = Phase::Attack;
            out_events.push(Event::PhaseChanged {
                phase: Phase::Attack,
            });
        }
        if actions.is_exhausted() {
            self.turn.selected = None;
            out_events.push(Event::SelectionCleared { unit: id });
        }
    }

    fn end_turn(&mut self, out_events: &mut Vec<Event>) -> Result<(), RejectionReason> {
        self.ensure_in_progress()?;

        if let WinCondition::HoldTerrain { side, turns } = self.win_condition {
            if side == self.turn.side {
                let held = self
                    .roster
                    .units()
                    .iter()
                    .any(|unit| unit.side() == side && self.terrain.contains(unit.cell));
                // The count is not reset when the terrain is lost.
                if held {
                    self.hold_count += 1;
                }
                out_events.push(Event::TerrainHoldEvaluated {
                    side,
                    held,
                    count: self.hold_count,
                    required: turns,
                });
            }
        }

        let side = self.turn.side.opponent();
        self.turn.selected = None;
        self.turn.phase = Phase::Move;
        self.turn.side = side;
        self.turn.number += 1;
        self.roster.reset_actions(side);
        *self.turn.modifiers.get_mut(side) = 0;
        self.turn.drawn_this_turn = false;

        debug!(%side, turn = self.turn.number, "turn started");
        out_events.push(Event::TurnStarted { side });
        let _ = self.settle_outcome(out_events);
        Ok(())
    }

    fn draw_card<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        out_events: &mut Vec<Event>,
    ) -> Result<(), RejectionReason> {
        self.ensure_in_progress()?;
        if self.turn.drawn_this_turn {
            return Err(RejectionReason::AlreadyDrew);
        }

        let kind = CardKind::ALL[rng.gen_range(0..CardKind::ALL.len())];
        let card = CardInstance {
            id: CardInstanceId::new(self.next_card),
            kind,
        };
        self.next_card += 1;
        let side = self.turn.side;
        self.hands.get_mut(side).push(card);
        self.turn.drawn_this_turn = true;

        debug!(%side, card = kind.title(), "card drawn");
        out_events.push(Event::CardDrawn { side, card });
        Ok(())
    }

    fn play_card(
        &mut self,
        id: CardInstanceId,
        out_events: &mut Vec<Event>,
    ) -> Result<(), RejectionReason> {
        self.ensure_in_progress()?;
        let side = self.turn.side;
        let index = self
            .hands
            .get(side)
            .iter()
            .position(|card| card.id == id)
            .ok_or(RejectionReason::CardNotInHand)?;
        let card = self.hands.get(side)[index];

        let outcome = cards::play(card.kind, side, self)?;
        let _ = self.hands.get_mut(side).remove(index);
        out_events.push(Event::CardPlayed { side, card });
        match outcome {
            CardOutcome::Deployed { unit, cell } => {
                out_events.push(Event::ReinforcementDeployed { unit, cell });
            }
            CardOutcome::ModifierApplied { modifier } => {
                out_events.push(Event::AttackModifierChanged { side, modifier });
            }
        }
        Ok(())
    }

    /// Records a winner if the battle just ended. Returns whether it is over.
    fn settle_outcome(&mut self, out_events: &mut Vec<Event>) -> bool {
        if self.winner.is_some() {
            return true;
        }
        let Some(winner) = self.evaluate_winner() else {
            return false;
        };
        self.winner = Some(winner);
        self.turn.selected = None;
        info!(%winner, scenario = %self.scenario_name, "battle ended");
        out_events.push(Event::BattleEnded { winner });
        true
    }

    fn evaluate_winner(&self) -> Option<Side> {
        let union_alive = self.roster.has_units(Side::Union);
        let confederacy_alive = self.roster.has_units(Side::Confederacy);
        if !union_alive || !confederacy_alive {
            return Some(if union_alive {
                Side::Union
            } else {
                Side::Confederacy
            });
        }

        match self.win_condition {
            WinCondition::HoldTerrain { side, turns } if self.hold_count >= turns => Some(side),
            _ => None,
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Places scenario units, rejecting any overlap, then carried-over units.
///
/// A carried-over unit whose cell is taken moves to the first free cell of
/// the Union deployment rows.
fn deploy_units(units: Vec<Unit>, carried: Vec<Unit>) -> Result<Roster, RejectionReason> {
    let mut roster = Roster::deploy(Vec::new());
    let mut ids = BTreeSet::new();

    for unit in units {
        if !ids.insert(unit.id) || !roster.is_free(unit.cell) {
            return Err(RejectionReason::InvalidPlacement);
        }
        roster.insert(unit);
    }

    let mut displaced = Vec::new();
    for unit in carried {
        if !ids.insert(unit.id) || !unit.cell.is_on_board() {
            return Err(RejectionReason::InvalidPlacement);
        }
        if roster.is_free(unit.cell) {
            roster.insert(unit);
        } else {
            displaced.push(unit);
        }
    }

    for mut unit in displaced {
        unit.cell = roster
            .free_deployment_cell(Side::Union)
            .ok_or(RejectionReason::InvalidPlacement)?;
        roster.insert(unit);
    }
    Ok(roster)
}

/// Builds the stand-alone skirmish fought outside the campaign.
#[must_use]
pub fn skirmish_scenario() -> Scenario {
    let terrain = TerrainMap::new([
        Cell::new(6, 6),
        Cell::new(7, 6),
        Cell::new(6, 7),
        Cell::new(7, 7),
        Cell::new(5, 6),
        Cell::new(6, 5),
    ]);
    let placements = [
        (Side::Union, 1, UnitKind::Infantry, 7, 1),
        (Side::Union, 2, UnitKind::Infantry, 7, 3),
        (Side::Union, 3, UnitKind::Artillery, 6, 2),
        (Side::Union, 4, UnitKind::Cavalry, 7, 5),
        (Side::Confederacy, 1, UnitKind::Infantry, 0, 4),
        (Side::Confederacy, 2, UnitKind::Infantry, 0, 6),
        (Side::Confederacy, 3, UnitKind::Artillery, 1, 5),
        (Side::Confederacy, 4, UnitKind::Cavalry, 0, 2),
    ];
    let units = placements
        .into_iter()
        .map(|(side, serial, kind, row, column)| {
            Unit::new(UnitId::regular(side, serial), kind, Cell::new(row, column))
        })
        .collect();
    Scenario::new(SKIRMISH_NAME, terrain, units, WinCondition::Elimination)
}

/// Applies the provided command to the world.
///
/// Every random draw comes from `rng`. A rejected command leaves the world
/// unchanged and reports [`Event::ActionRejected`].
pub fn apply<R: Rng + ?Sized>(
    world: &mut World,
    command: Command,
    rng: &mut R,
    out_events: &mut Vec<Event>,
) {
    let action = command.kind();
    if let Err(reason) = world.execute(command, rng, out_events) {
        debug!(?action, %reason, "command rejected");
        out_events.push(Event::ActionRejected { action, reason });
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use gettysburg_core::{
        ActionState, CardInstance, Cell, Phase, Side, TerrainMap, Unit, UnitId, WinCondition,
    };
    use serde::{Deserialize, Serialize};

    use super::World;

    /// Name of the battle being fought.
    #[must_use]
    pub fn scenario_name(world: &World) -> &str {
        &world.scenario_name
    }

    /// Terrain bonus cells of the current battle.
    #[must_use]
    pub fn terrain(world: &World) -> &TerrainMap {
        &world.terrain
    }

    /// Additional victory condition of the current battle.
    #[must_use]
    pub fn win_condition(world: &World) -> WinCondition {
        world.win_condition
    }

    /// Side whose turn it is.
    #[must_use]
    pub fn turn_side(world: &World) -> Side {
        world.turn.side
    }

    /// Phase of the current selection.
    #[must_use]
    pub fn phase(world: &World) -> Phase {
        world.turn.phase
    }

    /// Unit currently selected, if any.
    #[must_use]
    pub fn selected_unit(world: &World) -> Option<UnitId> {
        world.turn.selected
    }

    /// One-based count of turns begun in this battle.
    #[must_use]
    pub fn turn_number(world: &World) -> u32 {
        world.turn.number
    }

    /// Winner of the battle once it has ended.
    #[must_use]
    pub fn winner(world: &World) -> Option<Side> {
        world.winner
    }

    /// Live units in deployment order.
    #[must_use]
    pub fn units(world: &World) -> &[Unit] {
        world.roster.units()
    }

    /// Live units of one side in deployment order.
    pub fn units_of(world: &World, side: Side) -> impl Iterator<Item = &Unit> {
        world
            .roster
            .units()
            .iter()
            .filter(move |unit| unit.side() == side)
    }

    /// Looks up a live unit.
    #[must_use]
    pub fn unit(world: &World, id: UnitId) -> Option<&Unit> {
        world.roster.get(id)
    }

    /// Unit standing on `cell`, if any.
    #[must_use]
    pub fn unit_at(world: &World, cell: Cell) -> Option<&Unit> {
        world.roster.unit_at(cell)
    }

    /// Action flags of a live unit for its side's current turn.
    #[must_use]
    pub fn action_state(world: &World, id: UnitId) -> Option<ActionState> {
        world.roster.get(id).map(|_| world.roster.actions(id).unwrap_or_default())
    }

    /// Event-card damage modifier in force for `side` this turn.
    #[must_use]
    pub fn attack_modifier(world: &World, side: Side) -> i32 {
        *world.turn.modifiers.get(side)
    }

    /// Reports whether the active side already drew a card this turn.
    #[must_use]
    pub fn has_drawn_card(world: &World) -> bool {
        world.turn.drawn_this_turn
    }

    /// Cards held by `side`.
    #[must_use]
    pub fn hand(world: &World, side: Side) -> &[CardInstance] {
        world.hands.get(side)
    }

    /// Qualifying turn ends recorded toward a hold-terrain victory.
    #[must_use]
    pub fn hold_count(world: &World) -> u32 {
        world.hold_count
    }

    /// Back-row cell a reinforcement for `side` would occupy, if any is free.
    #[must_use]
    pub fn reinforcement_cell(world: &World, side: Side) -> Option<Cell> {
        world.roster.free_back_row_cell(side)
    }

    /// Empty cells the unit could move to from its current cell.
    #[must_use]
    pub fn move_targets(world: &World, id: UnitId) -> Vec<Cell> {
        let Some(unit) = world.roster.get(id) else {
            return Vec::new();
        };
        Cell::all()
            .filter(|cell| {
                let distance = unit.cell.manhattan_distance(*cell);
                distance > 0 && distance <= unit.movement && world.roster.is_free(*cell)
            })
            .collect()
    }

    /// Cells of enemies the unit could attack from its current cell.
    #[must_use]
    pub fn attack_targets(world: &World, id: UnitId) -> Vec<Cell> {
        world
            .roster
            .get(id)
            .map(|unit| attack_targets_from(world, unit, unit.cell))
            .unwrap_or_default()
    }

    /// Cells of enemies `unit` could attack if it stood on `from`.
    #[must_use]
    pub fn attack_targets_from(world: &World, unit: &Unit, from: Cell) -> Vec<Cell> {
        world
            .roster
            .units()
            .iter()
            .filter(|other| other.side() != unit.side() && unit.reaches_from(from, other.cell))
            .map(|other| other.cell)
            .collect()
    }

    /// Captures the observable battle state handed to presentation layers.
    #[must_use]
    pub fn snapshot(world: &World) -> BattleSnapshot {
        BattleSnapshot {
            scenario: world.scenario_name.clone(),
            turn_side: world.turn.side,
            phase: world.turn.phase,
            turn_number: world.turn.number,
            selected: world.turn.selected,
            units: world
                .roster
                .units()
                .iter()
                .map(|unit| UnitSnapshot {
                    unit: unit.clone(),
                    actions: world.roster.actions(unit.id).unwrap_or_default(),
                    on_terrain: world.terrain.contains(unit.cell),
                })
                .collect(),
            union_hand: world.hands.get(Side::Union).clone(),
            confederacy_hand: world.hands.get(Side::Confederacy).clone(),
            union_modifier: *world.turn.modifiers.get(Side::Union),
            confederacy_modifier: *world.turn.modifiers.get(Side::Confederacy),
            hold_count: world.hold_count,
            winner: world.winner,
        }
    }

    /// Serializable picture of a battle at one instant.
    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct BattleSnapshot {
        /// Name of the battle.
        pub scenario: String,
        /// Side whose turn it is.
        pub turn_side: Side,
        /// Phase of the current selection.
        pub phase: Phase,
        /// One-based count of turns begun.
        pub turn_number: u32,
        /// Selected unit, if any.
        pub selected: Option<UnitId>,
        /// Live units in deployment order.
        pub units: Vec<UnitSnapshot>,
        /// Cards held by the Union.
        pub union_hand: Vec<CardInstance>,
        /// Cards held by the Confederacy.
        pub confederacy_hand: Vec<CardInstance>,
        /// Union attack modifier this turn.
        pub union_modifier: i32,
        /// Confederate attack modifier this turn.
        pub confederacy_modifier: i32,
        /// Qualifying hold-terrain turn ends.
        pub hold_count: u32,
        /// Winner once the battle has ended.
        pub winner: Option<Side>,
    }

    /// Unit state captured in a [`BattleSnapshot`].
    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct UnitSnapshot {
        /// Unit statistics and position.
        pub unit: Unit,
        /// Action flags for the current turn.
        pub actions: ActionState,
        /// The unit stands on a terrain bonus cell.
        pub on_terrain: bool,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gettysburg_core::seeded_rng;

    fn run(world: &mut World, command: Command) -> Vec<Event> {
        let mut rng = seeded_rng(7);
        let mut events = Vec::new();
        apply(world, command, &mut rng, &mut events);
        events
    }

    #[test]
    fn new_world_opens_the_skirmish_with_union_to_move() {
        let world = World::new();
        assert_eq!(query::scenario_name(&world), SKIRMISH_NAME);
        assert_eq!(query::turn_side(&world), Side::Union);
        assert_eq!(query::phase(&world), Phase::Move);
        assert_eq!(query::selected_unit(&world), None);
        assert_eq!(query::units(&world).len(), 8);
        assert_eq!(query::winner(&world), None);
    }

    #[test]
    fn overlapping_scenario_is_rejected_without_touching_the_battle() {
        let cell = Cell::new(3, 3);
        let union = Unit::new(UnitId::regular(Side::Union, 1), UnitKind::Infantry, cell);
        let confederate = Unit::new(UnitId::regular(Side::Confederacy, 1), UnitKind::Infantry, cell);

        for units in [
            vec![union.clone(), confederate.clone()],
            vec![confederate.clone(), union.clone()],
        ] {
            let mut world = World::new();
            let scenario =
                Scenario::new("Broken", TerrainMap::default(), units, WinCondition::Elimination);

            let events = run(
                &mut world,
                Command::StartBattle {
                    scenario,
                    roster: None,
                },
            );

            assert_eq!(
                events,
                vec![Event::ActionRejected {
                    action: gettysburg_core::ActionKind::StartBattle,
                    reason: RejectionReason::InvalidPlacement,
                }]
            );
            assert_eq!(query::scenario_name(&world), SKIRMISH_NAME);
            assert_eq!(
                query::unit(&world, UnitId::regular(Side::Union, 1)).map(|unit| unit.cell),
                Some(Cell::new(7, 1))
            );
        }
    }

    #[test]
    fn carried_units_that_collide_are_redeployed_on_the_back_rows() {
        let mut world = World::new();
        let scenario = skirmish_scenario();
        let mut veteran = Unit::new(
            UnitId::regular(Side::Union, 1),
            UnitKind::Infantry,
            Cell::new(0, 4),
        );
        veteran.hp = 2;

        let events = run(
            &mut world,
            Command::StartBattle {
                scenario,
                roster: Some(vec![veteran]),
            },
        );

        assert!(matches!(events.first(), Some(Event::BattleStarted { .. })));
        let union: Vec<&Unit> = query::units_of(&world, Side::Union).collect();
        assert_eq!(union.len(), 1);
        assert_eq!(union[0].cell, Cell::new(7, 3));
        assert_eq!(union[0].hp, 2);
        assert_eq!(query::units_of(&world, Side::Confederacy).count(), 4);
    }

    #[test]
    fn selecting_an_enemy_unit_is_rejected() {
        let mut world = World::new();
        let events = run(
            &mut world,
            Command::SelectUnit {
                unit: UnitId::regular(Side::Confederacy, 1),
            },
        );
        assert_eq!(
            events,
            vec![Event::ActionRejected {
                action: gettysburg_core::ActionKind::SelectUnit,
                reason: RejectionReason::NotYourUnit,
            }]
        );
        assert_eq!(query::selected_unit(&world), None);
    }

    #[test]
    fn moving_advances_the_selection_to_the_attack_phase() {
        let mut world = World::new();
        let unit = UnitId::regular(Side::Union, 4);
        let _ = run(&mut world, Command::SelectUnit { unit });

        let events = run(
            &mut world,
            Command::MoveUnit {
                destination: Cell::new(4, 5),
            },
        );

        assert_eq!(
            events,
            vec![
                Event::UnitMoved {
                    unit,
                    from: Cell::new(7, 5),
                    to: Cell::new(4, 5),
                },
                Event::PhaseChanged {
                    phase: Phase::Attack
                },
            ]
        );
        assert_eq!(query::phase(&world), Phase::Attack);
        assert_eq!(
            query::action_state(&world, unit).map(|state| state.moved),
            Some(true)
        );
    }

    #[test]
    fn moves_beyond_movement_or_onto_units_are_rejected() {
        let mut world = World::new();
        let _ = run(
            &mut world,
            Command::SelectUnit {
                unit: UnitId::regular(Side::Union, 3),
            },
        );

        let too_far = run(
            &mut world,
            Command::MoveUnit {
                destination: Cell::new(4, 2),
            },
        );
        let occupied = run(
            &mut world,
            Command::MoveUnit {
                destination: Cell::new(7, 1),
            },
        );

        assert!(matches!(
            too_far.as_slice(),
            [Event::ActionRejected {
                reason: RejectionReason::OutOfReach,
                ..
            }]
        ));
        assert!(matches!(
            occupied.as_slice(),
            [Event::ActionRejected {
                reason: RejectionReason::Occupied,
                ..
            }]
        ));
        assert_eq!(
            query::unit(&world, UnitId::regular(Side::Union, 3)).map(|unit| unit.cell),
            Some(Cell::new(6, 2))
        );
    }

    #[test]
    fn second_draw_in_one_turn_is_a_reported_no_op() {
        let mut world = World::new();
        let first = run(&mut world, Command::DrawCard);
        assert!(matches!(first.as_slice(), [Event::CardDrawn { .. }]));

        let second = run(&mut world, Command::DrawCard);
        assert_eq!(
            second,
            vec![Event::ActionRejected {
                action: gettysburg_core::ActionKind::DrawCard,
                reason: RejectionReason::AlreadyDrew,
            }]
        );
        assert_eq!(query::hand(&world, Side::Union).len(), 1);
    }

    #[test]
    fn end_turn_hands_over_and_clears_the_new_sides_state() {
        let mut world = World::new();
        world.turn.modifiers = PerSide {
            union: -2,
            confederacy: -3,
        };
        let confed = UnitId::regular(Side::Confederacy, 1);
        world.roster.actions_mut(confed).moved = true;
        world.roster.actions_mut(confed).attacked = true;

        let events = run(&mut world, Command::EndTurn);

        assert_eq!(
            events,
            vec![Event::TurnStarted {
                side: Side::Confederacy
            }]
        );
        assert_eq!(query::attack_modifier(&world, Side::Confederacy), 0);
        assert_eq!(query::attack_modifier(&world, Side::Union), -2);
        assert_eq!(
            query::action_state(&world, confed),
            Some(gettysburg_core::ActionState::default())
        );
        assert!(!query::has_drawn_card(&world));
        assert_eq!(query::turn_number(&world), 2);
    }
}
