//! Swiss tournament organizer: library with models, pairing and standings logic, and file formats.

pub mod formats;
pub mod logic;
pub mod models;

pub use formats::{parse_results_csv, render_pairings, render_standings, standings_to_csv, Snapshot};
pub use logic::{
    compare_tiebreaks, generate_pairings, pair_next_round, rankings, record_results, standings,
    update_derived_stats, validate_pairings, validate_results, Standing,
};
pub use models::{
    MatchResult, Pairing, PairingConfig, PairingError, Player, PlayerIndex, PlayerMatchResult,
    Tournament, TournamentError, TournamentId, PERCENT_FLOOR, POINTS_PER_DRAW, POINTS_PER_WIN,
};
