use rand::RngCore;
use std::ops::Index;
use thiserror::Error;

use crate::constants::MIN_PLAYERS;
use crate::cycles::{CycleSummary, analyze};
use crate::shuffle::{DerangementStrategy, is_derangement, is_permutation};

/// Participant index in `0..players`.
pub type Player = usize;

/// Errors raised when a game cannot be built or addressed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("there must be at least 2 players (got {players})")]
    InvalidSize { players: usize },
    #[error("player index {index} out of range for {len} players")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("targets are not a permutation of 0..{len}")]
    NotAPermutation { len: usize },
}

/// Check that a roster of `players` can be dealt a derangement.
///
/// # Errors
///
/// Returns [`GameError::InvalidSize`] below two players.
pub fn ensure_roster(players: usize) -> Result<(), GameError> {
    if players < MIN_PLAYERS {
        return Err(GameError::InvalidSize { players });
    }
    Ok(())
}

/// Target assignment for one game: `targets[i]` is the player `i` hunts.
///
/// The assignment is always a permutation of `0..len`. After
/// [`GameState::start_game`] it is also free of self-targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    targets: Vec<Player>,
}

impl GameState {
    /// Build a game for `players` participants, starting from the identity
    /// assignment.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::InvalidSize`] when fewer than two players are
    /// requested.
    pub fn new(players: usize) -> Result<Self, GameError> {
        ensure_roster(players)?;
        Ok(Self {
            targets: (0..players).collect(),
        })
    }

    /// Build a game from an explicit assignment.
    ///
    /// # Errors
    ///
    /// Fails when the roster is too small or `targets` is not a permutation.
    pub fn from_targets(targets: Vec<Player>) -> Result<Self, GameError> {
        let len = targets.len();
        ensure_roster(len)?;
        if !is_permutation(&targets) {
            return Err(GameError::NotAPermutation { len });
        }
        Ok(Self { targets })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    #[must_use]
    pub fn targets(&self) -> &[Player] {
        &self.targets
    }

    /// Target of `player`.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::IndexOutOfRange`] for an unknown player.
    pub fn target(&self, player: Player) -> Result<Player, GameError> {
        self.targets
            .get(player)
            .copied()
            .ok_or(GameError::IndexOutOfRange {
                index: player,
                len: self.len(),
            })
    }

    /// Point `player` at `target`.
    ///
    /// Whoever held `target` before takes over `player`'s old target, so the
    /// assignment stays a permutation.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::IndexOutOfRange`] when either index is outside the
    /// roster.
    pub fn set_target(&mut self, player: Player, target: Player) -> Result<(), GameError> {
        let len = self.len();
        if target >= len {
            return Err(GameError::IndexOutOfRange { index: target, len });
        }
        let previous = self.target(player)?;
        if let Some(holder) = self.targets.iter().position(|&t| t == target) {
            self.targets[holder] = previous;
        }
        self.targets[player] = target;
        Ok(())
    }

    /// True when nobody targets themselves.
    #[must_use]
    pub fn is_valid_derangement(&self) -> bool {
        is_derangement(&self.targets)
    }

    /// Deal targets using `strategy`, leaving a valid derangement behind.
    pub fn start_game(&mut self, strategy: &dyn DerangementStrategy, rng: &mut dyn RngCore) {
        strategy.derange(&mut self.targets, rng);
        debug_assert!(self.is_valid_derangement());
    }

    /// Decompose the current assignment into cycles.
    #[must_use]
    pub fn count_cycles(&self) -> CycleSummary {
        analyze(&self.targets)
    }
}

impl Index<Player> for GameState {
    type Output = Player;

    fn index(&self, player: Player) -> &Self::Output {
        &self.targets[player]
    }
}
