//! Run settings assembled from an optional TOML file and command-line flags.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use clap::ValueEnum;
use gettysburg_core::{Difficulty, Side, UpgradeKind};
use serde::Deserialize;
use thiserror::Error;

/// Configuration file format understood by this build.
pub(crate) const CONFIG_VERSION: u32 = 1;

const DEFAULT_MAX_TURNS: u32 = 200;
const DEFAULT_DIFFICULTY: Difficulty = Difficulty::Normal;

/// Battle or campaign.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum Mode {
    /// One stand-alone battle.
    Skirmish,
    /// The three-day campaign.
    Campaign,
}

/// Who issues a side's orders.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub(crate) enum ControllerKind {
    /// The side only ends its turns.
    Idle,
    /// The computer commander plays the side.
    Ai,
}

/// Resolved controller of one side.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Controller {
    /// Ends every turn without acting.
    Idle,
    /// Computer commander at the given difficulty.
    Ai(Difficulty),
}

/// Upgrade names accepted in the shopping list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
enum UpgradeChoice {
    Heal,
    Reinforce,
    Artillery,
    Morale,
}

impl From<UpgradeChoice> for UpgradeKind {
    fn from(choice: UpgradeChoice) -> Self {
        match choice {
            UpgradeChoice::Heal => UpgradeKind::Heal,
            UpgradeChoice::Reinforce => UpgradeKind::Reinforce,
            UpgradeChoice::Artillery => UpgradeKind::Artillery,
            UpgradeChoice::Morale => UpgradeKind::Morale,
        }
    }
}

#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SideSection {
    controller: Option<ControllerKind>,
    difficulty: Option<u8>,
}

/// Contents of a configuration file.
#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct FileConfig {
    version: u32,
    mode: Option<Mode>,
    seed: Option<u64>,
    max_turns: Option<u32>,
    union: Option<SideSection>,
    confederacy: Option<SideSection>,
    #[serde(default)]
    upgrades: Vec<UpgradeChoice>,
}

/// Problems found in an otherwise well-formed configuration file.
#[derive(Debug, PartialEq, Eq, Error)]
pub(crate) enum ConfigError {
    /// The file was written for another format version.
    #[error("unsupported config version {found}, expected {expected}")]
    UnsupportedVersion {
        /// Version declared by the file.
        found: u32,
        /// Version this build reads.
        expected: u32,
    },
    /// A difficulty outside `1..=4`.
    #[error("difficulty must be between 1 and 4, got {0}")]
    InvalidDifficulty(u8),
}

impl FileConfig {
    /// Parses and validates configuration text.
    pub(crate) fn parse(text: &str) -> Result<Self> {
        let config: FileConfig = toml::from_str(text).context("failed to parse config TOML")?;
        if config.version != CONFIG_VERSION {
            return Err(ConfigError::UnsupportedVersion {
                found: config.version,
                expected: CONFIG_VERSION,
            }
            .into());
        }
        Ok(config)
    }

    /// Reads and parses the configuration file at `path`.
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("invalid config file {}", path.display()))
    }
}

/// Values supplied on the command line. Each overrides the file.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct Overrides {
    pub(crate) mode: Option<Mode>,
    pub(crate) seed: Option<u64>,
    pub(crate) union: Option<ControllerKind>,
    pub(crate) union_difficulty: Option<u8>,
    pub(crate) confed_difficulty: Option<u8>,
    pub(crate) max_turns: Option<u32>,
}

/// Fully resolved run settings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Settings {
    pub(crate) mode: Mode,
    pub(crate) seed: Option<u64>,
    pub(crate) union: Controller,
    pub(crate) confederacy: Controller,
    pub(crate) max_turns: u32,
    pub(crate) upgrades: Vec<UpgradeKind>,
}

impl Settings {
    /// Merges the optional file with command-line overrides.
    pub(crate) fn resolve(file: Option<FileConfig>, overrides: Overrides) -> Result<Self> {
        let union_section = file.as_ref().and_then(|file| file.union);
        let confederacy_section = file.as_ref().and_then(|file| file.confederacy);

        let union = controller(
            overrides
                .union
                .or_else(|| union_section.and_then(|section| section.controller)),
            overrides
                .union_difficulty
                .or_else(|| union_section.and_then(|section| section.difficulty)),
        )?;
        let confederacy = controller(
            confederacy_section.and_then(|section| section.controller),
            overrides
                .confed_difficulty
                .or_else(|| confederacy_section.and_then(|section| section.difficulty)),
        )?;

        Ok(Self {
            mode: overrides
                .mode
                .or_else(|| file.as_ref().and_then(|file| file.mode))
                .unwrap_or(Mode::Skirmish),
            seed: overrides.seed.or_else(|| file.as_ref().and_then(|file| file.seed)),
            union,
            confederacy,
            max_turns: overrides
                .max_turns
                .or_else(|| file.as_ref().and_then(|file| file.max_turns))
                .unwrap_or(DEFAULT_MAX_TURNS),
            upgrades: file
                .map(|file| file.upgrades.into_iter().map(UpgradeKind::from).collect())
                .unwrap_or_default(),
        })
    }

    /// Controller of `side`.
    pub(crate) fn controller(&self, side: Side) -> Controller {
        match side {
            Side::Union => self.union,
            Side::Confederacy => self.confederacy,
        }
    }
}

fn controller(kind: Option<ControllerKind>, level: Option<u8>) -> Result<Controller> {
    let difficulty = match level {
        Some(level) => {
            Difficulty::from_level(level).ok_or(ConfigError::InvalidDifficulty(level))?
        }
        None => DEFAULT_DIFFICULTY,
    };
    Ok(match kind.unwrap_or(ControllerKind::Ai) {
        ControllerKind::Idle => Controller::Idle,
        ControllerKind::Ai => Controller::Ai(difficulty),
    })
}
