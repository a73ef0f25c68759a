//! Authoritative unit storage for a single battle.

use std::collections::{BTreeMap, BTreeSet};

use gettysburg_core::{ActionState, Cell, Side, Unit, UnitId, BOARD_SIZE};

/// Live units in deployment order plus their per-turn action flags.
///
/// At most one live unit occupies any cell. Identifiers of eliminated units
/// are retired for the rest of the battle so reinforcements never reuse them.
#[derive(Clone, Debug, Default)]
pub(crate) struct Roster {
    units: Vec<Unit>,
    actions: BTreeMap<UnitId, ActionState>,
    retired: BTreeSet<UnitId>,
}

impl Roster {
    /// Builds a roster from units that already satisfy the occupancy invariant.
    pub(crate) fn deploy(units: Vec<Unit>) -> Self {
        let actions = units
            .iter()
            .map(|unit| (unit.id, ActionState::default()))
            .collect();
        Self {
            units,
            actions,
            retired: BTreeSet::new(),
        }
    }

    pub(crate) fn units(&self) -> &[Unit] {
        &self.units
    }

    pub(crate) fn get(&self, id: UnitId) -> Option<&Unit> {
        self.units.iter().find(|unit| unit.id == id)
    }

    pub(crate) fn get_mut(&mut self, id: UnitId) -> Option<&mut Unit> {
        self.units.iter_mut().find(|unit| unit.id == id)
    }

    pub(crate) fn unit_at(&self, cell: Cell) -> Option<&Unit> {
        self.units.iter().find(|unit| unit.cell == cell)
    }

    /// Reports whether the cell is on the board and unoccupied.
    pub(crate) fn is_free(&self, cell: Cell) -> bool {
        cell.is_on_board() && self.unit_at(cell).is_none()
    }

    pub(crate) fn has_units(&self, side: Side) -> bool {
        self.units.iter().any(|unit| unit.side() == side)
    }

    pub(crate) fn actions(&self, id: UnitId) -> Option<ActionState> {
        self.actions.get(&id).copied()
    }

    pub(crate) fn actions_mut(&mut self, id: UnitId) -> &mut ActionState {
        self.actions.entry(id).or_default()
    }

    /// Clears the action flags of every unit belonging to `side`.
    pub(crate) fn reset_actions(&mut self, side: Side) {
        for unit in self.units.iter().filter(|unit| unit.side() == side) {
            let _ = self.actions.insert(unit.id, ActionState::default());
        }
    }

    /// Adds a unit to a free cell with fresh action flags.
    pub(crate) fn insert(&mut self, unit: Unit) {
        debug_assert!(self.is_free(unit.cell), "insert requires a free cell");
        let _ = self.actions.insert(unit.id, ActionState::default());
        self.units.push(unit);
    }

    /// Removes a unit from play and retires its identifier.
    pub(crate) fn remove(&mut self, id: UnitId) -> Option<Unit> {
        let index = self.units.iter().position(|unit| unit.id == id)?;
        let _ = self.actions.remove(&id);
        let _ = self.retired.insert(id);
        Some(self.units.remove(index))
    }

    /// Identifiers of live and eliminated units seen this battle.
    pub(crate) fn ids_in_use(&self) -> impl Iterator<Item = &UnitId> {
        self.units.iter().map(|unit| &unit.id).chain(self.retired.iter())
    }

    /// First free cell on `side`'s back row scanning from the centre outward.
    pub(crate) fn free_back_row_cell(&self, side: Side) -> Option<Cell> {
        let row = side.back_row();
        side.deployment_columns()
            .into_iter()
            .map(|column| Cell::new(row, column))
            .find(|cell| self.is_free(*cell))
    }

    /// First free cell scanning `side`'s rows from the back row forward.
    pub(crate) fn free_deployment_cell(&self, side: Side) -> Option<Cell> {
        let rows: Vec<u8> = match side {
            Side::Union => (0..BOARD_SIZE).rev().collect(),
            Side::Confederacy => (0..BOARD_SIZE).collect(),
        };
        rows.into_iter()
            .flat_map(|row| {
                side.deployment_columns()
                    .into_iter()
                    .map(move |column| Cell::new(row, column))
            })
            .find(|cell| self.is_free(*cell))
    }
}
