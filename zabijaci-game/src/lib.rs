//! Zabijaci Simulation Engine
//!
//! Every player in a game of Zabijaci is secretly handed one other player as
//! a target. The assignment is a derangement of the roster and splits into
//! disjoint hunting rings (cycles). This crate deals such games with
//! pluggable strategies, decomposes them into cycles and tabulates cycle
//! statistics over many simulated games.

pub mod config;
pub mod constants;
pub mod cycles;
pub mod rng;
pub mod shuffle;
pub mod state;
pub mod table;
pub mod trials;

// Re-export commonly used types
pub use config::{ConfigError, TrialConfig};
pub use cycles::{CycleHistogram, CycleSummary, analyze, analyze_from};
pub use rng::{CountingRng, TrialStreams};
pub use shuffle::{
    BoxDraw, DerangementStrategy, Reshuffle, ShuffleStrategy, is_derangement, is_permutation,
};
pub use state::{GameError, GameState, Player, ensure_roster};
pub use table::{CycleTable, SparseRow, cycle_column_name};
pub use trials::{TrialRun, TrialRunner, count_cycles, generate_data, run_trial};
