#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that fights Gettysburg battles headlessly.
//!
//! Each side is either idle or played by the computer commander. The battle
//! log is printed to stdout while `tracing` output goes to stderr.

mod config;
mod narration;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use gettysburg_core::{seeded_rng, BattleRng, Command, Event, Side};
use gettysburg_system_ai::{Commander, Config};
use gettysburg_system_campaign::{Campaign, CampaignStatus, CAMPAIGN_LENGTH};
use gettysburg_world::{self as world, query, skirmish_scenario, World};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::{
    config::{Controller, ControllerKind, FileConfig, Mode, Overrides, Settings},
    narration::Narrator,
};

const DEFAULT_LOG_FILTER: &str = "warn";

#[derive(Debug, Parser)]
#[command(name = "gettysburg", version, about = "Gettysburg tactics battles on an 8x8 board")]
struct Cli {
    #[command(subcommand)]
    mode: Option<ModeCommand>,

    /// Seed for every random draw. Chosen at random when omitted.
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Who plays the Union.
    #[arg(long, global = true, value_enum)]
    union: Option<ControllerKind>,

    /// Union commander difficulty, 1 to 4.
    #[arg(long, global = true, value_parser = clap::value_parser!(u8).range(1..=4))]
    union_difficulty: Option<u8>,

    /// Confederate commander difficulty, 1 to 4.
    #[arg(long, global = true, value_parser = clap::value_parser!(u8).range(1..=4))]
    confed_difficulty: Option<u8>,

    /// Turns fought per battle before giving up.
    #[arg(long, global = true)]
    max_turns: Option<u32>,

    /// TOML file with run settings. Flags take precedence.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, Subcommand)]
enum ModeCommand {
    /// Fight the stand-alone skirmish.
    Skirmish,
    /// Fight the three-day campaign.
    Campaign,
}

impl Cli {
    fn overrides(&self) -> Overrides {
        Overrides {
            mode: self.mode.map(|mode| match mode {
                ModeCommand::Skirmish => Mode::Skirmish,
                ModeCommand::Campaign => Mode::Campaign,
            }),
            seed: self.seed,
            union: self.union,
            union_difficulty: self.union_difficulty,
            confed_difficulty: self.confed_difficulty,
            max_turns: self.max_turns,
        }
    }
}

/// How one battle ended.
#[derive(Clone, Copy, Debug)]
struct BattleResult {
    winner: Option<Side>,
    turns: u32,
}

/// Everything a run needs while fighting battles.
struct Runner {
    settings: Settings,
    world: World,
    rng: BattleRng,
    narrator: Narrator,
}

/// Entry point for the Gettysburg command-line interface.
fn main() -> Result<()> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with_writer(std::io::stderr)
        .init();

    let file = cli
        .config
        .as_deref()
        .map(FileConfig::load)
        .transpose()?;
    let settings = Settings::resolve(file, cli.overrides()).context("invalid settings")?;
    let seed = settings.seed.unwrap_or_else(rand::random);
    println!("Seed: {seed}");
    info!(seed, mode = ?settings.mode, "run starting");

    let mut runner = Runner {
        settings,
        world: World::new(),
        rng: seeded_rng(seed),
        narrator: Narrator::default(),
    };
    match runner.settings.mode {
        Mode::Skirmish => runner.skirmish(),
        Mode::Campaign => runner.campaign(),
    }
}

impl Runner {
    fn skirmish(&mut self) -> Result<()> {
        let mut events = Vec::new();
        world::apply(
            &mut self.world,
            Command::StartBattle {
                scenario: skirmish_scenario(),
                roster: None,
            },
            &mut self.rng,
            &mut events,
        );
        self.report(&events);

        let result = self.fight();
        println!();
        match result.winner {
            Some(winner) => println!("Winner: {winner} after {} turns.", result.turns),
            None => println!("No winner after {} turns.", result.turns),
        }
        Ok(())
    }

    fn campaign(&mut self) -> Result<()> {
        let mut campaign = Campaign::new();
        let mut events = Vec::new();
        campaign
            .start(&mut self.world, &mut self.rng, &mut events)
            .context("failed to open the campaign")?;
        self.report(&events);

        let mut total_turns = 0;
        loop {
            let result = self.fight();
            total_turns += result.turns;
            if result.winner.is_none() {
                println!(
                    "Turn limit reached on {}. Campaign halted.",
                    query::scenario_name(&self.world)
                );
                break;
            }

            let report = campaign
                .record_battle_end(&self.world)
                .context("failed to record the battle")?;
            match report.status {
                CampaignStatus::Victory => {
                    println!("=== CAMPAIGN COMPLETE: Union Victory at Gettysburg! ===");
                    break;
                }
                CampaignStatus::Defeat => {
                    println!("CAMPAIGN FAILED on {}.", query::scenario_name(&self.world));
                    break;
                }
                CampaignStatus::AwaitingCommand => {
                    println!(
                        "Victory! +{} points ({} survivors). Resource points: {}.",
                        report.points_gained,
                        report.survivors,
                        campaign.state().resource_points()
                    );
                    for &kind in &self.settings.upgrades {
                        match campaign.spend_upgrade(kind) {
                            Ok(receipt) => println!("{receipt}"),
                            Err(error) => println!("Cannot buy {}: {error}", kind.label()),
                        }
                    }
                    events.clear();
                    campaign
                        .advance_to_next_scenario(&mut self.world, &mut self.rng, &mut events)
                        .context("failed to load the next battle")?;
                    println!();
                    self.report(&events);
                }
                CampaignStatus::Inactive | CampaignStatus::InBattle => break,
            }
        }

        let state = campaign.state();
        println!();
        println!(
            "Campaign: {:?} after battle {} of {}, {} turns, {} resource points.",
            state.status(),
            state.scenario_index() + 1,
            CAMPAIGN_LENGTH,
            total_turns,
            state.resource_points()
        );
        Ok(())
    }

    /// Plays turns until the loaded battle ends or the turn limit is hit.
    fn fight(&mut self) -> BattleResult {
        let mut turns = 0;
        while turns < self.settings.max_turns {
            if query::winner(&self.world).is_some() {
                break;
            }
            let side = query::turn_side(&self.world);
            let mut events = Vec::new();
            match self.settings.controller(side) {
                Controller::Ai(difficulty) => Commander::new(Config::new(difficulty)).run_turn(
                    &mut self.world,
                    &mut self.rng,
                    &mut events,
                ),
                Controller::Idle => {
                    world::apply(&mut self.world, Command::EndTurn, &mut self.rng, &mut events)
                }
            }
            turns += 1;
            self.report(&events);
        }
        BattleResult {
            winner: query::winner(&self.world),
            turns,
        }
    }

    fn report(&mut self, events: &[Event]) {
        for line in self.narrator.narrate(&self.world, events) {
            println!("{line}");
        }
    }
}
