//! Data structures for a Swiss tournament: players, pairings, results, tournament state.

mod game;
mod player;
mod tournament;

pub use game::{MatchResult, Pairing, PlayerMatchResult};
pub use player::{Player, PlayerIndex, PERCENT_FLOOR, POINTS_PER_DRAW, POINTS_PER_WIN};
pub use tournament::{PairingConfig, PairingError, Tournament, TournamentError, TournamentId};
