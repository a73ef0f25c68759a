#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure combat resolver shared by player commands and the AI.
//!
//! Damage is `(attack + terrain) - (defense + terrain) + roll + modifier`,
//! floored at [`MINIMUM_DAMAGE`]. The world supplies the roll from the battle
//! generator; the AI scores targets with [`Engagement::expected_damage`],
//! which substitutes the roll's expectation.

use gettysburg_core::{TerrainMap, Unit};
use rand::Rng;

/// Damage dealt by every successful attack, however lopsided.
pub const MINIMUM_DAMAGE: i32 = 1;

/// Expectation of the coin-flip combat die.
pub const EXPECTED_ROLL: f32 = 0.5;

/// Outcome of the coin-flip combat die, either 0 or 1.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CombatRoll(u8);

impl CombatRoll {
    /// The die came up blank.
    pub const ZERO: CombatRoll = CombatRoll(0);
    /// The die added one damage.
    pub const ONE: CombatRoll = CombatRoll(1);

    /// Rolls the die using the battle generator.
    pub fn roll<R: Rng + ?Sized>(rng: &mut R) -> Self {
        if rng.gen_bool(0.5) {
            Self::ONE
        } else {
            Self::ZERO
        }
    }

    /// Damage contributed by the roll.
    #[must_use]
    pub const fn value(self) -> i32 {
        self.0 as i32
    }
}

/// Every input of the damage formula for one attacker/defender pairing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Engagement {
    attack: i32,
    attacker_terrain: i32,
    defense: i32,
    defender_terrain: i32,
    modifier: i32,
}

impl Engagement {
    /// Creates an engagement from raw formula inputs.
    #[must_use]
    pub const fn new(
        attack: i32,
        attacker_terrain: i32,
        defense: i32,
        defender_terrain: i32,
        modifier: i32,
    ) -> Self {
        Self {
            attack,
            attacker_terrain,
            defense,
            defender_terrain,
            modifier,
        }
    }

    /// Reads the formula inputs from two units standing on `terrain`.
    ///
    /// `modifier` is the attacker's side event modifier for the current turn.
    #[must_use]
    pub fn between(attacker: &Unit, defender: &Unit, terrain: &TerrainMap, modifier: i32) -> Self {
        Self::new(
            attacker.attack,
            terrain.bonus(attacker.cell),
            defender.defense,
            terrain.bonus(defender.cell),
            modifier,
        )
    }

    /// Reports whether the attacker stands on a terrain bonus cell.
    #[must_use]
    pub const fn attacker_on_terrain(&self) -> bool {
        self.attacker_terrain > 0
    }

    /// Reports whether the defender stands on a terrain bonus cell.
    #[must_use]
    pub const fn defender_on_terrain(&self) -> bool {
        self.defender_terrain > 0
    }

    /// Event modifier applied to the attack.
    #[must_use]
    pub const fn modifier(&self) -> i32 {
        self.modifier
    }

    const fn raw_without_roll(&self) -> i32 {
        (self.attack + self.attacker_terrain) - (self.defense + self.defender_terrain)
            + self.modifier
    }

    /// Damage dealt for the provided roll, never below [`MINIMUM_DAMAGE`].
    #[must_use]
    pub const fn damage(&self, roll: CombatRoll) -> u32 {
        let raw = self.raw_without_roll() + roll.value();
        if raw < MINIMUM_DAMAGE {
            MINIMUM_DAMAGE as u32
        } else {
            raw as u32
        }
    }

    /// Damage expected before the die is rolled, floored like real damage.
    #[must_use]
    pub fn expected_damage(&self) -> f32 {
        (self.raw_without_roll() as f32 + EXPECTED_ROLL).max(MINIMUM_DAMAGE as f32)
    }
}

/// Result of resolving one attack.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Strike {
    /// Hit points removed from the defender.
    pub damage: u32,
    /// The defender dropped to zero hit points or below.
    pub defender_eliminated: bool,
}

/// Applies the engagement's damage for `roll` to `defender`.
///
/// Only the defender's hit points change; removing an eliminated defender
/// from play is the caller's job.
pub fn strike(engagement: &Engagement, roll: CombatRoll, defender: &mut Unit) -> Strike {
    let damage = engagement.damage(roll);
    defender.hp = defender
        .hp
        .saturating_sub(i32::try_from(damage).unwrap_or(i32::MAX));
    Strike {
        damage,
        defender_eliminated: !defender.is_alive(),
    }
}
