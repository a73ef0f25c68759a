//! Battle log lines derived from world events.

use std::collections::BTreeMap;

use gettysburg_core::{CardKind, Event, UnitId, UnitKind, WinCondition};
use gettysburg_world::{query, World};

/// Turns event batches into the lines printed to the battle log.
///
/// Unit kinds are remembered so eliminated units can still be named.
#[derive(Debug, Default)]
pub(crate) struct Narrator {
    kinds: BTreeMap<UnitId, UnitKind>,
}

impl Narrator {
    /// Describes `events`, which the world produced while reaching its current state.
    pub(crate) fn narrate(&mut self, world: &World, events: &[Event]) -> Vec<String> {
        for unit in query::units(world) {
            let _ = self.kinds.insert(unit.id, unit.kind);
        }
        events
            .iter()
            .filter_map(|event| self.describe(world, event))
            .collect()
    }

    fn name(&self, id: UnitId) -> String {
        match self.kinds.get(&id) {
            Some(kind) => format!("{} {} ({id})", id.side(), kind.symbol()),
            None => format!("{} ({id})", id.side()),
        }
    }

    fn describe(&mut self, world: &World, event: &Event) -> Option<String> {
        let line = match event {
            Event::BattleStarted { scenario, side } => {
                format!("=== {scenario} ===\n{}\n{side} to move.", objective(world))
            }
            Event::UnitMoved { unit, to, .. } => format!("{} moves to {to}.", self.name(*unit)),
            Event::UnitAttacked {
                attacker,
                defender,
                damage,
                attacker_on_terrain,
                defender_on_terrain,
                modifier,
            } => {
                let mut line = format!(
                    "{} hits {} for {damage}.",
                    self.name(*attacker),
                    self.name(*defender)
                );
                if *attacker_on_terrain {
                    line.push_str(" [High Ground +1 ATK]");
                }
                if *defender_on_terrain {
                    line.push_str(" [Target on High Ground +1 DEF]");
                }
                if *modifier != 0 {
                    line.push_str(&format!(" [Event ATK mod {modifier}]"));
                }
                line
            }
            Event::UnitEliminated { unit } => format!("{} is eliminated.", self.name(*unit)),
            Event::TerrainHoldEvaluated {
                side,
                held: true,
                count,
                required,
            } => format!("{side} holds the hill ({count}/{required})."),
            Event::TerrainHoldEvaluated { side, .. } => {
                format!("{side} does not hold the hill this turn.")
            }
            Event::TurnStarted { side } => format!("{side} turn begins."),
            Event::CardDrawn { side, card } => {
                format!("{side} draws an event card: {}.", card.kind.title())
            }
            Event::ReinforcementDeployed { unit, cell } => {
                let _ = self.kinds.insert(*unit, UnitKind::Infantry);
                format!(
                    "{} plays {}: INF ({unit}) deployed at {cell}.",
                    unit.side(),
                    CardKind::Reinforcements.title()
                )
            }
            Event::AttackModifierChanged { side, modifier } => format!(
                "{side} plays {}: {modifier} damage to {side} attacks this turn.",
                CardKind::AmmoShortage.title()
            ),
            Event::BattleEnded { winner } => format!("BATTLE OVER: {winner} wins."),
            Event::ActionRejected { action, reason } => format!("{action:?} refused: {reason}"),
            Event::UnitSelected { .. }
            | Event::SelectionCleared { .. }
            | Event::PhaseChanged { .. }
            | Event::CardPlayed { .. } => return None,
        };
        Some(line)
    }
}

fn objective(world: &World) -> String {
    let hill: Vec<String> = query::terrain(world)
        .iter()
        .map(|cell| cell.to_string())
        .collect();
    let hill = hill.join(" ");
    match query::win_condition(world) {
        WinCondition::Elimination => {
            format!("Objective: eliminate the enemy. High ground: {hill}")
        }
        WinCondition::HoldTerrain { side, turns } => {
            format!("Objective: {side} must hold the high ground for {turns} turns: {hill}")
        }
    }
}
