#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Gettysburg tactics engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative battle world, and pure systems. Adapters and the AI submit
//! [`Command`] values describing desired mutations, the world executes those
//! commands via its `apply` entry point, and then reports [`Event`] values
//! describing what changed. Rejected commands never mutate state; they surface
//! as [`Event::ActionRejected`] carrying a [`RejectionReason`].

use std::{collections::BTreeSet, fmt};

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of rows and columns on the square battle board.
pub const BOARD_SIZE: u8 = 8;

/// Bonus granted to attack or defense while standing on a terrain bonus cell.
pub const TERRAIN_BONUS: i32 = 1;

/// Random number generator used for every random draw in a battle.
pub type BattleRng = ChaCha8Rng;

/// Creates the battle generator from a seed so runs can be replayed.
#[must_use]
pub fn seeded_rng(seed: u64) -> BattleRng {
    ChaCha8Rng::seed_from_u64(seed)
}

/// One of the two factions fighting the battle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Side {
    /// The player's faction in campaign play.
    Union,
    /// The faction controlled by the AI in single-player games.
    Confederacy,
}

impl Side {
    /// Both sides in turn order.
    pub const ALL: [Side; 2] = [Side::Union, Side::Confederacy];

    /// Returns the opposing side.
    #[must_use]
    pub const fn opponent(self) -> Side {
        match self {
            Self::Union => Self::Confederacy,
            Self::Confederacy => Self::Union,
        }
    }

    /// Row where this side deploys reinforcements.
    #[must_use]
    pub const fn back_row(self) -> u8 {
        match self {
            Self::Union => BOARD_SIZE - 1,
            Self::Confederacy => 0,
        }
    }

    /// Back-row columns ordered from the centre outward, mirrored per side.
    #[must_use]
    pub const fn deployment_columns(self) -> [u8; BOARD_SIZE as usize] {
        match self {
            Self::Union => [3, 4, 2, 5, 1, 6, 0, 7],
            Self::Confederacy => [4, 3, 5, 2, 6, 1, 7, 0],
        }
    }

    /// Short display label used in battle narration.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Union => "Union",
            Self::Confederacy => "Confed",
        }
    }

    const fn id_prefix(self) -> char {
        match self {
            Self::Union => 'U',
            Self::Confederacy => 'C',
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Sub-state of a side's turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// The selected unit may still move.
    Move,
    /// The selected unit has moved and may still attack.
    Attack,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Move => f.write_str("Move"),
            Self::Attack => f.write_str("Attack"),
        }
    }
}

/// Location of a single board cell expressed as row and column coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell {
    row: u8,
    column: u8,
}

impl Cell {
    /// Creates a new board cell coordinate.
    #[must_use]
    pub const fn new(row: u8, column: u8) -> Self {
        Self { row, column }
    }

    /// Zero-based row index of the cell. Row 0 is the Confederate back row.
    #[must_use]
    pub const fn row(&self) -> u8 {
        self.row
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u8 {
        self.column
    }

    /// Reports whether the cell lies on the board.
    #[must_use]
    pub const fn is_on_board(&self) -> bool {
        self.row < BOARD_SIZE && self.column < BOARD_SIZE
    }

    /// Computes the Manhattan distance between two cells.
    #[must_use]
    pub fn manhattan_distance(self, other: Cell) -> u32 {
        u32::from(self.row.abs_diff(other.row)) + u32::from(self.column.abs_diff(other.column))
    }

    /// Iterates every board cell in row-major order.
    pub fn all() -> impl Iterator<Item = Cell> {
        (0..BOARD_SIZE).flat_map(|row| (0..BOARD_SIZE).map(move |column| Cell::new(row, column)))
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.row, self.column)
    }
}

/// Unit templates available to both sides.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum UnitKind {
    /// Balanced line troops.
    Infantry,
    /// Long range, fragile, slow.
    Artillery,
    /// Fast flanking troops.
    Cavalry,
}

impl UnitKind {
    /// Every unit template in catalogue order.
    pub const ALL: [UnitKind; 3] = [UnitKind::Infantry, UnitKind::Artillery, UnitKind::Cavalry];

    /// Full name of the template.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Infantry => "Infantry",
            Self::Artillery => "Artillery",
            Self::Cavalry => "Cavalry",
        }
    }

    /// Three-letter board symbol of the template.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Infantry => "INF",
            Self::Artillery => "ART",
            Self::Cavalry => "CAV",
        }
    }

    /// Base statistics a freshly raised unit of this kind starts with.
    #[must_use]
    pub const fn base_stats(self) -> UnitStats {
        match self {
            Self::Infantry => UnitStats {
                hp: 5,
                attack: 2,
                defense: 1,
                movement: 2,
                range: 1,
            },
            Self::Artillery => UnitStats {
                hp: 4,
                attack: 3,
                defense: 0,
                movement: 1,
                range: 2,
            },
            Self::Cavalry => UnitStats {
                hp: 4,
                attack: 2,
                defense: 1,
                movement: 3,
                range: 1,
            },
        }
    }

    /// Maximum hit points of the template.
    #[must_use]
    pub const fn max_hp(self) -> i32 {
        self.base_stats().hp
    }
}

/// Immutable statistics block of a unit template.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UnitStats {
    /// Starting and maximum hit points.
    pub hp: i32,
    /// Attack strength.
    pub attack: i32,
    /// Defense strength.
    pub defense: i32,
    /// Maximum Manhattan distance covered by one move.
    pub movement: u32,
    /// Maximum Manhattan distance of an attack.
    pub range: u32,
}

/// Stable identifier of a unit, unique across a campaign.
///
/// Scenario units render as `U1` or `C4`, reinforcements as `UR1` or `CR2`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UnitId {
    side: Side,
    serial: u16,
    reinforcement: bool,
}

impl UnitId {
    /// Identifier of a unit placed by a scenario.
    #[must_use]
    pub const fn regular(side: Side, serial: u16) -> Self {
        Self {
            side,
            serial,
            reinforcement: false,
        }
    }

    /// Identifier of a unit raised by a card or an upgrade.
    #[must_use]
    pub const fn reinforcement(side: Side, serial: u16) -> Self {
        Self {
            side,
            serial,
            reinforcement: true,
        }
    }

    /// Side owning the unit.
    #[must_use]
    pub const fn side(&self) -> Side {
        self.side
    }

    /// Numeric part of the identifier.
    #[must_use]
    pub const fn serial(&self) -> u16 {
        self.serial
    }

    /// Reports whether the unit was raised as a reinforcement.
    #[must_use]
    pub const fn is_reinforcement(&self) -> bool {
        self.reinforcement
    }

    /// Lowest reinforcement identifier for `side` not present in `taken`.
    #[must_use]
    pub fn next_reinforcement<'a>(side: Side, taken: impl IntoIterator<Item = &'a UnitId>) -> Self {
        let used: BTreeSet<u16> = taken
            .into_iter()
            .filter(|id| id.side == side && id.reinforcement)
            .map(|id| id.serial)
            .collect();
        let serial = (1..=u16::MAX)
            .find(|serial| !used.contains(serial))
            .unwrap_or(u16::MAX);
        Self::reinforcement(side, serial)
    }
}

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.reinforcement {
            write!(f, "{}R{}", self.side.id_prefix(), self.serial)
        } else {
            write!(f, "{}{}", self.side.id_prefix(), self.serial)
        }
    }
}

/// Unit instance on the board or in a campaign roster.
///
/// Statistics start from the template but campaign upgrades alter them
/// permanently, so every value is stored on the instance.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unit {
    /// Stable identifier of the unit.
    pub id: UnitId,
    /// Template the unit was raised from.
    pub kind: UnitKind,
    /// Remaining hit points. The unit leaves play at zero or below.
    pub hp: i32,
    /// Current attack strength.
    pub attack: i32,
    /// Current defense strength.
    pub defense: i32,
    /// Current movement allowance.
    pub movement: u32,
    /// Current attack range.
    pub range: u32,
    /// Cell the unit occupies.
    pub cell: Cell,
}

impl Unit {
    /// Raises a fresh unit of `kind` at full strength on `cell`.
    #[must_use]
    pub const fn new(id: UnitId, kind: UnitKind, cell: Cell) -> Self {
        let stats = kind.base_stats();
        Self {
            id,
            kind,
            hp: stats.hp,
            attack: stats.attack,
            defense: stats.defense,
            movement: stats.movement,
            range: stats.range,
            cell,
        }
    }

    /// Side owning the unit.
    #[must_use]
    pub const fn side(&self) -> Side {
        self.id.side()
    }

    /// Maximum hit points allowed by the unit's template.
    #[must_use]
    pub const fn max_hp(&self) -> i32 {
        self.kind.max_hp()
    }

    /// Reports whether the unit is still in play.
    #[must_use]
    pub const fn is_alive(&self) -> bool {
        self.hp > 0
    }

    /// Restores up to `amount` hit points without exceeding the template maximum.
    pub fn heal(&mut self, amount: i32) {
        self.hp = self.hp.saturating_add(amount).min(self.max_hp());
    }

    /// Reports whether `target` lies within attack range of `from`.
    #[must_use]
    pub fn reaches_from(&self, from: Cell, target: Cell) -> bool {
        let distance = from.manhattan_distance(target);
        distance > 0 && distance <= self.range
    }
}

/// Per-unit, per-turn action flags.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActionState {
    /// The unit moved during its side's current turn.
    pub moved: bool,
    /// The unit attacked during its side's current turn.
    pub attacked: bool,
}

impl ActionState {
    /// Reports whether the unit has nothing left to do this turn.
    #[must_use]
    pub const fn is_exhausted(&self) -> bool {
        self.moved && self.attacked
    }
}

/// Set of cells granting the terrain bonus for one scenario.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerrainMap {
    cells: BTreeSet<Cell>,
}

impl TerrainMap {
    /// Creates a terrain map from the provided bonus cells.
    #[must_use]
    pub fn new(cells: impl IntoIterator<Item = Cell>) -> Self {
        Self {
            cells: cells.into_iter().collect(),
        }
    }

    /// Reports whether the cell grants the terrain bonus.
    #[must_use]
    pub fn contains(&self, cell: Cell) -> bool {
        self.cells.contains(&cell)
    }

    /// Bonus applied to a unit standing on `cell`.
    #[must_use]
    pub fn bonus(&self, cell: Cell) -> i32 {
        if self.contains(cell) {
            TERRAIN_BONUS
        } else {
            0
        }
    }

    /// Iterates the bonus cells in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = Cell> + '_ {
        self.cells.iter().copied()
    }
}

/// Condition that ends a battle besides elimination.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WinCondition {
    /// The battle ends only when one side has no units left.
    Elimination,
    /// `side` wins after ending `turns` turns with a unit on terrain.
    HoldTerrain {
        /// Side that must hold the terrain.
        side: Side,
        /// Number of qualifying turn ends required.
        turns: u32,
    },
}

/// Fixed battle definition: terrain, starting units and win condition.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    /// Display name of the battle.
    pub name: String,
    /// Cells granting the terrain bonus.
    pub terrain: TerrainMap,
    /// Units placed when the battle starts.
    pub units: Vec<Unit>,
    /// Additional victory condition of the battle.
    pub win_condition: WinCondition,
}

impl Scenario {
    /// Creates a new scenario definition.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        terrain: TerrainMap,
        units: Vec<Unit>,
        win_condition: WinCondition,
    ) -> Self {
        Self {
            name: name.into(),
            terrain,
            units,
            win_condition,
        }
    }
}

/// Event cards in the side-agnostic catalogue.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CardKind {
    /// Spawns one infantry unit on the playing side's back row.
    Reinforcements,
    /// Applies -1 damage to the playing side's attacks for the turn.
    AmmoShortage,
}

impl CardKind {
    /// Every card in the catalogue. Draws pick uniformly from this list.
    pub const ALL: [CardKind; 2] = [CardKind::Reinforcements, CardKind::AmmoShortage];

    /// Title printed on the card.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Reinforcements => "Reinforcements Arrive",
            Self::AmmoShortage => "Ammo Shortage",
        }
    }

    /// Rules text printed on the card.
    #[must_use]
    pub const fn text(self) -> &'static str {
        match self {
            Self::Reinforcements => {
                "Spawn 1 Infantry on your back row (if an empty tile exists)."
            }
            Self::AmmoShortage => {
                "This turn, your attacks deal -1 damage (minimum damage still applies)."
            }
        }
    }
}

/// Identifier of a drawn card, unique within one battle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CardInstanceId(u32);

impl CardInstanceId {
    /// Creates a new card instance identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Card held in a side's hand.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CardInstance {
    /// Identifier of this drawn copy.
    pub id: CardInstanceId,
    /// Catalogue entry the copy was drawn from.
    pub kind: CardKind,
}

/// Roster upgrades purchasable between campaign battles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum UpgradeKind {
    /// Restores every roster unit to full hit points.
    Heal,
    /// Adds one infantry unit to the roster.
    Reinforce,
    /// Adds one range to every roster artillery unit.
    Artillery,
    /// Adds one attack to every roster unit.
    Morale,
}

impl UpgradeKind {
    /// Every upgrade in menu order.
    pub const ALL: [UpgradeKind; 4] = [
        UpgradeKind::Heal,
        UpgradeKind::Reinforce,
        UpgradeKind::Artillery,
        UpgradeKind::Morale,
    ];

    /// Cost of the first purchase. Each repeat costs one point more.
    #[must_use]
    pub const fn base_cost(self) -> u32 {
        match self {
            Self::Heal => 2,
            Self::Reinforce => 3,
            Self::Artillery => 4,
            Self::Morale => 3,
        }
    }

    /// Menu label of the upgrade.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Heal => "heal",
            Self::Reinforce => "reinforce",
            Self::Artillery => "artillery",
            Self::Morale => "morale",
        }
    }
}

/// AI strength. Higher levels weigh more factors but share one algorithm.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Difficulty {
    /// Level 1: frequently acts at random.
    Easy,
    /// Level 2: avoids obvious retaliation.
    Normal,
    /// Level 3: prioritises artillery and wounded targets.
    Hard,
    /// Level 4: focus fire and flanking.
    Lee,
}

impl Difficulty {
    /// Numeric level in `1..=4`.
    #[must_use]
    pub const fn level(self) -> u8 {
        match self {
            Self::Easy => 1,
            Self::Normal => 2,
            Self::Hard => 3,
            Self::Lee => 4,
        }
    }

    /// Converts a numeric level back into a difficulty.
    #[must_use]
    pub const fn from_level(level: u8) -> Option<Self> {
        match level {
            1 => Some(Self::Easy),
            2 => Some(Self::Normal),
            3 => Some(Self::Hard),
            4 => Some(Self::Lee),
            _ => None,
        }
    }

    /// Display name of the difficulty.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Easy => "Easy",
            Self::Normal => "Normal",
            Self::Hard => "Hard",
            Self::Lee => "Robert Mode (Lee)",
        }
    }
}

/// Commands that express all permissible battle mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Replaces the current battle with a fresh one.
    StartBattle {
        /// Battle to load.
        scenario: Scenario,
        /// Carried-over units replacing the scenario's Union units, if any.
        roster: Option<Vec<Unit>>,
    },
    /// Selects one of the active side's units.
    SelectUnit {
        /// Unit to select.
        unit: UnitId,
    },
    /// Moves the selected unit.
    MoveUnit {
        /// Empty cell within the unit's movement.
        destination: Cell,
    },
    /// Attacks with the selected unit.
    AttackUnit {
        /// Cell holding an enemy within the unit's range.
        target: Cell,
    },
    /// Hands the turn to the other side.
    EndTurn,
    /// Draws one event card for the active side.
    DrawCard,
    /// Plays a card from the active side's hand.
    PlayCard {
        /// Drawn copy to play.
        card: CardInstanceId,
    },
}

impl Command {
    /// Category of the command, used when reporting rejections.
    #[must_use]
    pub const fn kind(&self) -> ActionKind {
        match self {
            Self::StartBattle { .. } => ActionKind::StartBattle,
            Self::SelectUnit { .. } => ActionKind::SelectUnit,
            Self::MoveUnit { .. } => ActionKind::MoveUnit,
            Self::AttackUnit { .. } => ActionKind::AttackUnit,
            Self::EndTurn => ActionKind::EndTurn,
            Self::DrawCard => ActionKind::DrawCard,
            Self::PlayCard { .. } => ActionKind::PlayCard,
        }
    }
}

/// Category of a command.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionKind {
    /// [`Command::StartBattle`].
    StartBattle,
    /// [`Command::SelectUnit`].
    SelectUnit,
    /// [`Command::MoveUnit`].
    MoveUnit,
    /// [`Command::AttackUnit`].
    AttackUnit,
    /// [`Command::EndTurn`].
    EndTurn,
    /// [`Command::DrawCard`].
    DrawCard,
    /// [`Command::PlayCard`].
    PlayCard,
}

/// Reasons a command may be rejected by the world.
///
/// The display text is the message shown to the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error, Serialize, Deserialize)]
pub enum RejectionReason {
    /// The battle already has a winner.
    #[error("The battle is over.")]
    BattleOver,
    /// The scenario places a unit off the board or on an occupied cell.
    #[error("The scenario places units off the board or on top of each other.")]
    InvalidPlacement,
    /// No live unit carries the requested identifier.
    #[error("No such unit is in play.")]
    UnknownUnit,
    /// The unit belongs to the side that is not acting.
    #[error("That unit does not belong to the side whose turn it is.")]
    NotYourUnit,
    /// The unit already moved and attacked this turn.
    #[error("That unit has already moved and attacked this turn.")]
    UnitExhausted,
    /// An action needs a selected unit.
    #[error("No unit is selected.")]
    NoSelection,
    /// The selected unit already moved this turn.
    #[error("That unit has already moved this turn.")]
    AlreadyMoved,
    /// The selected unit already attacked this turn.
    #[error("That unit has already attacked this turn.")]
    AlreadyAttacked,
    /// The requested cell lies outside the board.
    #[error("That cell is off the board.")]
    OutOfBounds,
    /// The requested destination holds a unit.
    #[error("That cell is occupied.")]
    Occupied,
    /// The destination exceeds the unit's movement.
    #[error("That cell is beyond the unit's movement.")]
    OutOfReach,
    /// No enemy unit stands on the targeted cell.
    #[error("There is no enemy unit on that cell.")]
    NoTarget,
    /// The target exceeds the unit's range.
    #[error("That target is out of range.")]
    OutOfRange,
    /// The active side already drew a card this turn.
    #[error("You already drew an event card this turn.")]
    AlreadyDrew,
    /// The card is not in the active side's hand.
    #[error("That card is not in your hand.")]
    CardNotInHand,
    /// Reinforcements found no empty back-row cell.
    #[error("No empty tile on your back row.")]
    BackRowFull,
}

/// Events reported by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// A new battle was loaded.
    BattleStarted {
        /// Name of the scenario.
        scenario: String,
        /// Side that moves first.
        side: Side,
    },
    /// A unit became the selection.
    UnitSelected {
        /// Selected unit.
        unit: UnitId,
        /// Phase the selection entered.
        phase: Phase,
    },
    /// The selection was cleared because the unit has nothing left to do.
    SelectionCleared {
        /// Unit that was deselected.
        unit: UnitId,
    },
    /// The selection advanced from the move phase to the attack phase.
    PhaseChanged {
        /// Phase now active.
        phase: Phase,
    },
    /// A unit moved between two cells.
    UnitMoved {
        /// Unit that moved.
        unit: UnitId,
        /// Cell occupied before moving.
        from: Cell,
        /// Cell occupied after moving.
        to: Cell,
    },
    /// A unit struck another unit.
    UnitAttacked {
        /// Attacking unit.
        attacker: UnitId,
        /// Defending unit.
        defender: UnitId,
        /// Damage dealt after the minimum floor.
        damage: u32,
        /// The attacker enjoyed the terrain bonus.
        attacker_on_terrain: bool,
        /// The defender enjoyed the terrain bonus.
        defender_on_terrain: bool,
        /// Event-card modifier applied to the attacker's side.
        modifier: i32,
    },
    /// A unit was reduced to zero hit points and removed from play.
    UnitEliminated {
        /// Unit removed from play.
        unit: UnitId,
    },
    /// The hold-terrain condition was evaluated at the end of a turn.
    TerrainHoldEvaluated {
        /// Side that must hold terrain.
        side: Side,
        /// At least one of the side's units stood on terrain.
        held: bool,
        /// Qualifying turn ends so far.
        count: u32,
        /// Qualifying turn ends required to win.
        required: u32,
    },
    /// A side began its turn.
    TurnStarted {
        /// Side now acting.
        side: Side,
    },
    /// A side drew an event card.
    CardDrawn {
        /// Side that drew.
        side: Side,
        /// Drawn card.
        card: CardInstance,
    },
    /// A side played an event card successfully.
    CardPlayed {
        /// Side that played.
        side: Side,
        /// Card removed from the hand.
        card: CardInstance,
    },
    /// A reinforcement unit entered play.
    ReinforcementDeployed {
        /// Newly raised unit.
        unit: UnitId,
        /// Cell the unit occupies.
        cell: Cell,
    },
    /// A side's attack modifier for the current turn changed.
    AttackModifierChanged {
        /// Side whose attacks are affected.
        side: Side,
        /// Modifier now in force.
        modifier: i32,
    },
    /// The battle ended.
    BattleEnded {
        /// Victorious side.
        winner: Side,
    },
    /// A command was rejected and left state unchanged.
    ActionRejected {
        /// Category of the rejected command.
        action: ActionKind,
        /// Reason shown to the player.
        reason: RejectionReason,
    },
}
