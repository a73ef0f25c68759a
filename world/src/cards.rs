//! Effects of the event card catalogue.
//!
//! Each catalogue entry maps to one effect function. Effects validate before
//! mutating so a failed play leaves the battle untouched.

use gettysburg_core::{CardKind, Cell, RejectionReason, Side, Unit, UnitId, UnitKind};
use tracing::debug;

use crate::World;

/// Damage delta applied by Ammo Shortage.
const AMMO_SHORTAGE_DELTA: i32 = -1;

/// Observable result of a successfully played card.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum CardOutcome {
    /// A unit entered play on the playing side's back row.
    Deployed {
        /// Newly raised unit.
        unit: UnitId,
        /// Cell the unit occupies.
        cell: Cell,
    },
    /// The playing side's attack modifier changed for the rest of the turn.
    ModifierApplied {
        /// Modifier now in force.
        modifier: i32,
    },
}

/// Applies the effect of `kind` for `side`.
pub(crate) fn play(
    kind: CardKind,
    side: Side,
    world: &mut World,
) -> Result<CardOutcome, RejectionReason> {
    match kind {
        CardKind::Reinforcements => reinforce(side, world),
        CardKind::AmmoShortage => short_ammunition(side, world),
    }
}

fn reinforce(side: Side, world: &mut World) -> Result<CardOutcome, RejectionReason> {
    let cell = world
        .roster
        .free_back_row_cell(side)
        .ok_or(RejectionReason::BackRowFull)?;
    let id = UnitId::next_reinforcement(side, world.roster.ids_in_use());
    world.roster.insert(Unit::new(id, UnitKind::Infantry, cell));
    debug!(%side, unit = %id, %cell, "reinforcements deployed");
    Ok(CardOutcome::Deployed { unit: id, cell })
}

fn short_ammunition(side: Side, world: &mut World) -> Result<CardOutcome, RejectionReason> {
    let modifier = world.turn.modifiers.get_mut(side);
    *modifier += AMMO_SHORTAGE_DELTA;
    let modifier = *modifier;
    debug!(%side, modifier, "ammo shortage applied");
    Ok(CardOutcome::ModifierApplied { modifier })
}
