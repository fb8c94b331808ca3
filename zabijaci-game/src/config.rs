//! Run configuration.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{DEFAULT_GAMES, DEFAULT_PLAYERS};
use crate::shuffle::ShuffleStrategy;
use crate::state::{GameError, ensure_roster};

/// Errors raised when a run configuration cannot be loaded or used.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid run configuration JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error(transparent)]
    Game(#[from] GameError),
}

/// Parameters of a batch of simulated games.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialConfig {
    #[serde(default = "TrialConfig::default_games")]
    pub games: usize,
    #[serde(default = "TrialConfig::default_players")]
    pub players: usize,
    #[serde(default)]
    pub strategy: ShuffleStrategy,
    /// Fixed run seed; fresh entropy is drawn when absent.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl TrialConfig {
    const fn default_games() -> usize {
        DEFAULT_GAMES
    }

    const fn default_players() -> usize {
        DEFAULT_PLAYERS
    }

    #[must_use]
    pub fn new(games: usize, players: usize, strategy: ShuffleStrategy) -> Self {
        Self {
            games,
            players,
            strategy,
            seed: None,
        }
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Parse a configuration from JSON, filling omitted fields with defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON and
    /// [`ConfigError::Game`] when the result fails [`TrialConfig::validate`].
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// # Errors
    ///
    /// Returns [`ConfigError::Game`] when fewer than two players are set.
    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure_roster(self.players)?;
        Ok(())
    }
}

impl Default for TrialConfig {
    fn default() -> Self {
        Self::new(
            Self::default_games(),
            Self::default_players(),
            ShuffleStrategy::default(),
        )
    }
}
