//! Derangement strategies.
//!
//! A strategy rearranges a target array in place so that it ends up a
//! permutation of `0..n` without fixed points. Strategies are used through
//! the [`DerangementStrategy`] trait object so the trial driver does not need
//! to know which one it runs.

use rand::RngCore;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::state::Player;

/// Rearranges targets into a derangement.
pub trait DerangementStrategy {
    /// Short stable name used in logs and reports.
    fn name(&self) -> &'static str;

    /// Rearrange `targets` in place. On return `targets` is a permutation of
    /// `0..targets.len()` with `targets[i] != i` for every `i`.
    ///
    /// Callers must pass at least two slots; a single slot has no derangement
    /// and the call would never return.
    fn derange(&self, targets: &mut [Player], rng: &mut dyn RngCore);
}

/// True when no slot maps to itself.
#[must_use]
pub fn is_derangement(targets: &[Player]) -> bool {
    targets.iter().enumerate().all(|(i, &t)| t != i)
}

/// True when every index in `0..len` appears exactly once.
#[must_use]
pub fn is_permutation(targets: &[Player]) -> bool {
    let mut seen = vec![false; targets.len()];
    for &t in targets {
        match seen.get_mut(t) {
            Some(slot) if !*slot => *slot = true,
            _ => return false,
        }
    }
    true
}

/// Shuffle the whole array uniformly and start over while any fixed point
/// remains.
///
/// Every derangement is equally likely. The expected number of shuffles
/// approaches `e` as the roster grows.
#[derive(Debug, Clone, Copy, Default)]
pub struct Reshuffle;

impl Reshuffle {
    /// Run the strategy and return how many shuffles it took.
    pub fn shuffle_until_valid(targets: &mut [Player], rng: &mut dyn RngCore) -> u32 {
        let mut attempts = 1;
        targets.shuffle(rng);
        while !is_derangement(targets) {
            targets.shuffle(rng);
            attempts += 1;
        }
        attempts
    }
}

impl DerangementStrategy for Reshuffle {
    fn name(&self) -> &'static str {
        "reshuffle"
    }

    fn derange(&self, targets: &mut [Player], rng: &mut dyn RngCore) {
        let attempts = Self::shuffle_until_valid(targets, rng);
        log::trace!("reshuffle settled after {attempts} shuffle(s)");
    }
}

/// Players draw their target from a shuffled box in turn.
///
/// A player who draws their own name shuffles the remaining box and draws
/// again. When only the last player is left and the box holds just their own
/// name, the round is void: every name goes back in the box and dealing
/// starts over from the first player.
///
/// The result is always a derangement, but the distribution is *not*
/// uniform. With three players `[2, 0, 1]` comes out twice as often as
/// `[1, 2, 0]`, so statistics from this strategy must not be mixed with
/// [`Reshuffle`] results as if they were interchangeable.
#[derive(Debug, Clone, Copy, Default)]
pub struct BoxDraw;

impl BoxDraw {
    /// Run the strategy and return how many times dealing started over.
    ///
    /// There is no cap on restarts. Any fair random source ends with
    /// probability one.
    pub fn draw_from_box(targets: &mut [Player], rng: &mut dyn RngCore) -> u32 {
        let n = targets.len();
        let mut restarts = 0;
        let mut pool: Vec<Player> = Vec::with_capacity(n);

        'deal: loop {
            pool.clear();
            pool.extend(0..n);
            pool.shuffle(rng);

            for (player, slot) in targets.iter_mut().enumerate() {
                // `pool` holds exactly the `n - player` names not yet drawn.
                let mut candidate = pool[pool.len() - 1];
                while candidate == player {
                    if pool.len() == 1 {
                        restarts += 1;
                        continue 'deal;
                    }
                    pool.shuffle(rng);
                    candidate = pool[pool.len() - 1];
                }
                *slot = candidate;
                pool.pop();
            }

            return restarts;
        }
    }
}

impl DerangementStrategy for BoxDraw {
    fn name(&self) -> &'static str {
        "box"
    }

    fn derange(&self, targets: &mut [Player], rng: &mut dyn RngCore) {
        let restarts = Self::draw_from_box(targets, rng);
        if restarts > 0 {
            log::trace!("box draw restarted {restarts} time(s)");
        }
    }
}

/// Serializable selector for the built-in strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ShuffleStrategy {
    #[serde(rename = "reshuffle")]
    Reshuffle,
    #[default]
    #[serde(rename = "box")]
    BoxDraw,
}

impl ShuffleStrategy {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Reshuffle => "reshuffle",
            Self::BoxDraw => "box",
        }
    }

    /// Strategy object implementing this selector.
    #[must_use]
    pub fn strategy(self) -> &'static dyn DerangementStrategy {
        match self {
            Self::Reshuffle => &Reshuffle,
            Self::BoxDraw => &BoxDraw,
        }
    }
}

impl fmt::Display for ShuffleStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ShuffleStrategy {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "reshuffle" => Ok(Self::Reshuffle),
            "box" => Ok(Self::BoxDraw),
            _ => Err(()),
        }
    }
}
