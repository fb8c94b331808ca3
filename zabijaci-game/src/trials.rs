//! Repeated games and their aggregate table.

use rand::RngCore;
use serde::Serialize;

use crate::config::{ConfigError, TrialConfig};
use crate::constants::CYCLES_COUNT_COLUMN;
use crate::cycles::CycleSummary;
use crate::rng::TrialStreams;
use crate::shuffle::{DerangementStrategy, ShuffleStrategy};
use crate::state::{GameError, GameState, ensure_roster};
use crate::table::{CycleTable, SparseRow};

/// Play one game: deal targets with `strategy`, then decompose into cycles.
///
/// # Errors
///
/// Returns [`GameError::InvalidSize`] for fewer than two players.
pub fn run_trial(
    players: usize,
    strategy: &dyn DerangementStrategy,
    rng: &mut dyn RngCore,
) -> Result<CycleSummary, GameError> {
    let mut game = GameState::new(players)?;
    game.start_game(strategy, rng);
    Ok(game.count_cycles())
}

/// Play `num_games` games of `players` participants and tabulate their cycles.
///
/// All games draw from the single `rng` stream in order. The table has one
/// row per game and the columns `cycles_count, cycle_1 ..= cycle_<players>`.
///
/// # Errors
///
/// Returns [`GameError::InvalidSize`] for fewer than two players, even when
/// `num_games` is zero. No partial table is produced.
pub fn generate_data(
    num_games: usize,
    players: usize,
    strategy: &dyn DerangementStrategy,
    rng: &mut dyn RngCore,
) -> Result<CycleTable, GameError> {
    ensure_roster(players)?;

    let mut rows = Vec::with_capacity(num_games);
    for _ in 0..num_games {
        let summary = run_trial(players, strategy, rng)?;
        rows.push(SparseRow::from(&summary));
    }

    log::debug!(
        "generated {num_games} game(s) of {players} players with {} strategy",
        strategy.name()
    );
    Ok(CycleTable::from_sparse_rows(players, rows))
}

/// Total number of cycles of each length across all games in `table`.
///
/// Position `i` holds the total for cycle length `table.lengths()[i]`, which
/// is `i + 1` for tables built by this crate. Length 1 is kept even though a
/// derangement never produces it.
#[must_use]
pub fn count_cycles(table: &CycleTable) -> Vec<u64> {
    let skip = table.column_index(CYCLES_COUNT_COLUMN);
    table
        .column_sums()
        .into_iter()
        .enumerate()
        .filter(|&(index, _)| Some(index) != skip)
        .map(|(_, total)| total)
        .collect()
}

/// Completed run, ready for reporting.
#[derive(Debug, Clone, Serialize)]
pub struct TrialRun {
    pub seed: u64,
    pub strategy: ShuffleStrategy,
    pub games: usize,
    pub players: usize,
    /// Random draws consumed across every trial stream.
    pub random_draws: u64,
    pub table: CycleTable,
}

impl TrialRun {
    /// Per-length totals, see [`count_cycles`].
    #[must_use]
    pub fn cycle_totals(&self) -> Vec<u64> {
        count_cycles(&self.table)
    }
}

/// Seeded driver that gives every game its own random stream.
#[derive(Debug, Clone)]
pub struct TrialRunner {
    config: TrialConfig,
    streams: TrialStreams,
}

impl TrialRunner {
    /// # Errors
    ///
    /// Returns the validation error of `config`.
    pub fn new(config: TrialConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let streams = config
            .seed
            .map_or_else(TrialStreams::from_entropy, TrialStreams::from_user_seed);
        Ok(Self { config, streams })
    }

    #[must_use]
    pub fn config(&self) -> &TrialConfig {
        &self.config
    }

    /// Seed in effect for this run, whether configured or drawn.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.streams.seed()
    }

    /// Play every configured game.
    ///
    /// # Errors
    ///
    /// Propagates [`GameError`] from game construction.
    pub fn run(&self) -> Result<TrialRun, GameError> {
        let TrialConfig {
            games,
            players,
            strategy,
            ..
        } = self.config;
        let dealer = strategy.strategy();

        let mut random_draws = 0u64;
        let mut rows = Vec::with_capacity(games);
        for index in 0..games {
            let mut rng = self.streams.stream(index as u64);
            let summary = run_trial(players, dealer, &mut rng)?;
            log::trace!(
                "game {index}: {} cycle(s), {} draw(s)",
                summary.cycle_count,
                rng.draws()
            );
            random_draws += rng.draws();
            rows.push(SparseRow::from(&summary));
        }

        log::debug!(
            "seed {}: {games} game(s) of {players} players with {strategy} strategy, {random_draws} draw(s)",
            self.seed()
        );

        Ok(TrialRun {
            seed: self.seed(),
            strategy,
            games,
            players,
            random_draws,
            table: CycleTable::from_sparse_rows(players, rows),
        })
    }
}
