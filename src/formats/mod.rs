//! Moving tournaments in and out of plain text: results CSV, printable reports, JSON snapshots.

mod report;
mod results_csv;
mod snapshot;

pub use report::{render_pairings, render_standings, standings_to_csv};
pub use results_csv::parse_results_csv;
pub use snapshot::Snapshot;
