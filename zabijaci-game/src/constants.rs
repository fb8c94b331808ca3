//! Shared constants for the Zabijaci simulation.
//!
//! Defaults used by configuration and the CLI live here so that the library
//! and the driver agree on them without duplicating literals.

// Game shape ---------------------------------------------------------------
/// Smallest roster for which a derangement exists.
pub const MIN_PLAYERS: usize = 2;

// Run defaults -------------------------------------------------------------
pub const DEFAULT_GAMES: usize = 10_000;
pub const DEFAULT_PLAYERS: usize = 60;

// Table columns ------------------------------------------------------------
pub const CYCLES_COUNT_COLUMN: &str = "cycles_count";
pub const CYCLE_COLUMN_PREFIX: &str = "cycle_";

// RNG stream domains -------------------------------------------------------
pub(crate) const TRIAL_STREAM_DOMAIN: &[u8] = b"zabijaci-trial";
