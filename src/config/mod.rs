use crate::{debug, info};

use anyhow::Context;
use boardinfo::BoardDescriptor;
use serde::{Deserialize, Serialize};

use std::path::Path;

mod general;
mod log;
mod sampling;

pub use general::General;
pub use log::{raise_level, Log};
pub use sampling::{SamplingConfig, MAX_RATE_HZ};

/// Recorder configuration, loaded from a TOML file. Every section is
/// optional and takes its defaults when absent.
#[derive(Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    general: General,
    #[serde(default)]
    log: Log,
    #[serde(default)]
    sampling: SamplingConfig,
    // an inline board description, taking precedence over `general.board`
    #[serde(default)]
    board: Option<BoardDescriptor>,
}

impl Config {
    pub fn load(path: &dyn AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("unable to open config file: {}", path.display()))?;

        let config = Self::parse(&content)
            .with_context(|| format!("invalid config file: {}", path.display()))?;

        Ok(config)
    }

    pub fn parse(content: &str) -> anyhow::Result<Self> {
        let config: Config = toml::from_str(content).context("failed to parse config")?;

        config.check()?;

        Ok(config)
    }

    pub fn check(&self) -> anyhow::Result<()> {
        self.general.check()?;
        self.sampling.check()?;

        if let Some(board) = &self.board {
            board.validate().context("invalid [board] table")?;
        }

        Ok(())
    }

    pub fn general(&self) -> &General {
        &self.general
    }

    pub fn log(&self) -> &Log {
        &self.log
    }

    pub fn sampling(&self) -> &SamplingConfig {
        &self.sampling
    }

    /// Pick the board to record. In order of precedence: a preset named by
    /// `preset`, the inline `[board]` table, the preset named in `[general]`,
    /// and finally detection of the running board.
    pub fn resolve_board(&self, preset: Option<&str>) -> anyhow::Result<BoardDescriptor> {
        if let Some(name) = preset {
            debug!("using board preset from command line: {name}");
            return Ok(boardinfo::preset(name)?);
        }

        if let Some(board) = &self.board {
            debug!("using board from config: {}", board.name);
            return Ok(board.clone());
        }

        if let Some(name) = self.general.board() {
            debug!("using board preset from config: {name}");
            return Ok(boardinfo::preset(name)?);
        }

        let board = boardinfo::detect().context("board detection failed, name a preset with --board")?;
        info!("detected board: {}", board.name);

        Ok(board)
    }
}
