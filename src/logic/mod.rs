//! Tournament business logic: pairing, result recording, standings.

mod pairing;
mod results;
mod standings;

pub use pairing::{generate_pairings, pair_next_round, validate_pairings};
pub use results::{record_results, validate_results};
pub use standings::{compare_tiebreaks, rankings, standings, update_derived_stats, Standing};
