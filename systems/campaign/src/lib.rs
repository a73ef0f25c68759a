#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Campaign controller for the three days at Gettysburg.
//!
//! The campaign owns the persisted Union roster, the resource points earned
//! from victories and the upgrade purchase counters. Battles themselves run
//! in the world; the campaign loads each one with [`Command::StartBattle`] and
//! reads the outcome back through [`gettysburg_world::query`].

mod scenarios;

use std::{collections::BTreeMap, fmt};

use gettysburg_core::{
    Cell, Command, Event, RejectionReason, Side, Unit, UnitId, UnitKind, UpgradeKind,
};
use gettysburg_world::{self as world, query, World};
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

pub use crate::scenarios::{campaign_scenario, CAMPAIGN_LENGTH};

/// Resource points awarded for every victory before the survivor bonus.
pub const VICTORY_REWARD: u32 = 3;

/// Hit points every roster unit recovers between battles.
pub const BETWEEN_BATTLE_HEAL: i32 = 1;

/// Cell recorded for roster reinforcements until the next deployment places them.
const REINFORCEMENT_CELL: Cell = Cell::new(7, 4);

/// Lifecycle of a campaign.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CampaignStatus {
    /// No campaign has been started.
    #[default]
    Inactive,
    /// A campaign battle is being fought.
    InBattle,
    /// The Union won and may buy upgrades before the next battle.
    AwaitingCommand,
    /// The final battle was won.
    Victory,
    /// The Confederacy won a battle.
    Defeat,
}

impl CampaignStatus {
    /// Reports whether the campaign is still being played.
    #[must_use]
    pub const fn is_active(self) -> bool {
        matches!(self, Self::InBattle | Self::AwaitingCommand)
    }
}

/// Failures reported by campaign operations. None of them change state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum CampaignError {
    /// Upgrades and advancing need the campaign to be between battles.
    #[error("The campaign is not awaiting orders.")]
    NotAwaitingCommand,
    /// Recording a result needs a campaign battle in progress.
    #[error("No campaign battle is in progress.")]
    NoBattleInProgress,
    /// The battle being recorded has no winner yet.
    #[error("The battle is still being fought.")]
    BattleUndecided,
    /// The upgrade costs more than the points available.
    #[error("Not enough resource points. Need {cost}.")]
    InsufficientPoints {
        /// Price of the upgrade.
        cost: u32,
        /// Points held.
        available: u32,
    },
    /// The campaign has no battle at this index.
    #[error("There is no campaign battle at index {0}.")]
    UnknownScenario(usize),
    /// The world refused to load the battle.
    #[error("The battle could not be loaded: {0}")]
    BattleRejected(#[source] RejectionReason),
}

/// Persistent progress of one campaign.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignState {
    status: CampaignStatus,
    scenario_index: usize,
    roster: Option<Vec<Unit>>,
    resource_points: u32,
    upgrade_uses: BTreeMap<UpgradeKind, u32>,
}

impl CampaignState {
    /// Lifecycle stage of the campaign.
    #[must_use]
    pub const fn status(&self) -> CampaignStatus {
        self.status
    }

    /// Reports whether the campaign is still being played.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.status.is_active()
    }

    /// Zero-based index of the current or next battle.
    #[must_use]
    pub const fn scenario_index(&self) -> usize {
        self.scenario_index
    }

    /// Union survivors carried into the next battle, once one has been won.
    #[must_use]
    pub fn roster(&self) -> Option<&[Unit]> {
        self.roster.as_deref()
    }

    /// Unspent resource points.
    #[must_use]
    pub const fn resource_points(&self) -> u32 {
        self.resource_points
    }

    /// Number of times `kind` has been bought.
    #[must_use]
    pub fn upgrade_uses(&self, kind: UpgradeKind) -> u32 {
        self.upgrade_uses.get(&kind).copied().unwrap_or(0)
    }
}

/// Result of a battle as seen by the campaign.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BattleReport {
    /// Side that won the battle.
    pub winner: Side,
    /// Resource points awarded.
    pub points_gained: u32,
    /// Union units that survived.
    pub survivors: usize,
    /// Campaign status after recording the battle.
    pub status: CampaignStatus,
}

/// Effect of a purchased upgrade on the roster.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UpgradeEffect {
    /// Every roster unit returned to full hit points.
    Healed,
    /// An infantry unit joined the roster.
    Reinforced {
        /// Identifier of the new unit.
        unit: UnitId,
    },
    /// Roster artillery gained one range.
    ArtilleryRangeRaised {
        /// Number of artillery units upgraded; zero still costs points.
        upgraded: usize,
    },
    /// Every roster unit gained one attack.
    MoraleRaised,
}

/// Confirmation of a purchased upgrade.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UpgradeReceipt {
    /// Upgrade bought.
    pub kind: UpgradeKind,
    /// Points paid.
    pub cost: u32,
    /// What changed in the roster.
    pub effect: UpgradeEffect,
}

impl fmt::Display for UpgradeReceipt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.effect {
            UpgradeEffect::Healed => write!(f, "Healed all units."),
            UpgradeEffect::Reinforced { unit } => write!(f, "Added Infantry ({unit})."),
            UpgradeEffect::ArtilleryRangeRaised { upgraded: 0 } => {
                write!(f, "No artillery to upgrade.")
            }
            UpgradeEffect::ArtilleryRangeRaised { upgraded } => {
                write!(f, "Upgraded {upgraded} artillery unit(s).")
            }
            UpgradeEffect::MoraleRaised => write!(f, "Inspired troops (+1 ATK)."),
        }?;
        write!(f, " Cost {} points.", self.cost)
    }
}

/// Campaign controller driving the world through the three battles.
#[derive(Clone, Debug, Default)]
pub struct Campaign {
    state: CampaignState,
}

impl Campaign {
    /// Creates an inactive campaign.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resumes a campaign from previously saved progress.
    #[must_use]
    pub fn from_state(state: CampaignState) -> Self {
        Self { state }
    }

    /// Current progress.
    #[must_use]
    pub fn state(&self) -> &CampaignState {
        &self.state
    }

    /// Starts a fresh campaign and loads the first battle into `world`.
    pub fn start<R: Rng + ?Sized>(
        &mut self,
        world: &mut World,
        rng: &mut R,
        out_events: &mut Vec<Event>,
    ) -> Result<(), CampaignError> {
        let scenario = campaign_scenario(0).ok_or(CampaignError::UnknownScenario(0))?;
        load_battle(
            world,
            Command::StartBattle {
                scenario,
                roster: None,
            },
            rng,
            out_events,
        )?;

        self.state = CampaignState {
            status: CampaignStatus::InBattle,
            ..CampaignState::default()
        };
        info!(battle = 1, of = CAMPAIGN_LENGTH, "campaign started");
        Ok(())
    }

    /// Records the outcome of the finished battle in `world`.
    ///
    /// A Union victory snapshots the survivors into the roster and awards
    /// [`VICTORY_REWARD`] plus one point per survivor.
    pub fn record_battle_end(&mut self, world: &World) -> Result<BattleReport, CampaignError> {
        if self.state.status != CampaignStatus::InBattle {
            return Err(CampaignError::NoBattleInProgress);
        }
        let winner = query::winner(world).ok_or(CampaignError::BattleUndecided)?;

        if winner != Side::Union {
            self.state.status = CampaignStatus::Defeat;
            info!(battle = self.state.scenario_index + 1, "campaign failed");
            return Ok(BattleReport {
                winner,
                points_gained: 0,
                survivors: 0,
                status: self.state.status,
            });
        }

        let survivors: Vec<Unit> = query::units_of(world, Side::Union).cloned().collect();
        let gained = VICTORY_REWARD + survivors.len() as u32;
        let report_survivors = survivors.len();
        self.state.roster = Some(survivors);
        self.state.resource_points += gained;

        let next = self.state.scenario_index + 1;
        if next >= CAMPAIGN_LENGTH {
            self.state.status = CampaignStatus::Victory;
            info!(points = self.state.resource_points, "campaign won");
        } else {
            self.state.scenario_index = next;
            self.state.status = CampaignStatus::AwaitingCommand;
            info!(gained, points = self.state.resource_points, "battle won");
        }

        Ok(BattleReport {
            winner,
            points_gained: gained,
            survivors: report_survivors,
            status: self.state.status,
        })
    }

    /// Price of the next purchase of `kind`.
    #[must_use]
    pub fn upgrade_cost(&self, kind: UpgradeKind) -> u32 {
        kind.base_cost() + self.state.upgrade_uses(kind)
    }

    /// Buys an upgrade for the roster if the campaign is between battles and
    /// the points suffice.
    pub fn spend_upgrade(&mut self, kind: UpgradeKind) -> Result<UpgradeReceipt, CampaignError> {
        if self.state.status != CampaignStatus::AwaitingCommand {
            return Err(CampaignError::NotAwaitingCommand);
        }
        let cost = self.upgrade_cost(kind);
        let available = self.state.resource_points;
        if available < cost {
            return Err(CampaignError::InsufficientPoints { cost, available });
        }
        let roster = self
            .state
            .roster
            .as_mut()
            .ok_or(CampaignError::NotAwaitingCommand)?;

        let effect = match kind {
            UpgradeKind::Heal => {
                for unit in roster.iter_mut() {
                    unit.hp = unit.max_hp();
                }
                UpgradeEffect::Healed
            }
            UpgradeKind::Reinforce => {
                let id = UnitId::next_reinforcement(
                    Side::Union,
                    roster.iter().map(|unit| &unit.id),
                );
                roster.push(Unit::new(id, UnitKind::Infantry, REINFORCEMENT_CELL));
                UpgradeEffect::Reinforced { unit: id }
            }
            UpgradeKind::Artillery => {
                let mut upgraded = 0;
                for unit in roster
                    .iter_mut()
                    .filter(|unit| unit.kind == UnitKind::Artillery)
                {
                    unit.range += 1;
                    upgraded += 1;
                }
                UpgradeEffect::ArtilleryRangeRaised { upgraded }
            }
            UpgradeKind::Morale => {
                for unit in roster.iter_mut() {
                    unit.attack += 1;
                }
                UpgradeEffect::MoraleRaised
            }
        };

        self.state.resource_points -= cost;
        *self.state.upgrade_uses.entry(kind).or_insert(0) += 1;
        debug!(
            upgrade = kind.label(),
            cost,
            remaining = self.state.resource_points,
            "upgrade bought"
        );
        Ok(UpgradeReceipt { kind, cost, effect })
    }

    /// Heals the roster and loads the next battle into `world`.
    pub fn advance_to_next_scenario<R: Rng + ?Sized>(
        &mut self,
        world: &mut World,
        rng: &mut R,
        out_events: &mut Vec<Event>,
    ) -> Result<(), CampaignError> {
        if self.state.status != CampaignStatus::AwaitingCommand {
            return Err(CampaignError::NotAwaitingCommand);
        }
        let index = self.state.scenario_index;
        let scenario = campaign_scenario(index).ok_or(CampaignError::UnknownScenario(index))?;
        let mut roster = self.state.roster.clone().unwrap_or_default();
        for unit in &mut roster {
            unit.heal(BETWEEN_BATTLE_HEAL);
        }

        let name = scenario.name.clone();
        load_battle(
            world,
            Command::StartBattle {
                scenario,
                roster: Some(roster.clone()),
            },
            rng,
            out_events,
        )?;

        self.state.roster = Some(roster);
        self.state.status = CampaignStatus::InBattle;
        info!(
            battle = self.state.scenario_index + 1,
            of = CAMPAIGN_LENGTH,
            scenario = %name,
            "campaign battle started"
        );
        Ok(())
    }
}

fn load_battle<R: Rng + ?Sized>(
    world: &mut World,
    command: Command,
    rng: &mut R,
    out_events: &mut Vec<Event>,
) -> Result<(), CampaignError> {
    let start = out_events.len();
    world::apply(world, command, rng, out_events);
    let rejection = out_events[start..].iter().find_map(|event| match event {
        Event::ActionRejected { reason, .. } => Some(*reason),
        _ => None,
    });
    match rejection {
        Some(reason) => Err(CampaignError::BattleRejected(reason)),
        None => Ok(()),
    }
}
