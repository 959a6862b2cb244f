//! Results sheet: one headerless CSV row per match.
//!
//! Cells are read left to right:
//! - `name:wins` is a player side,
//! - `-name` drops a player already named earlier in the row,
//! - anything else is the number of drawn games.
//!
//! `Alice:2,Bob:1,1,-Bob` is a 2-1-1 win for Alice after which Bob drops.

use crate::models::{MatchResult, PlayerMatchResult, TournamentError};

/// Parse a results sheet into match results. Arity is not checked here; that is
/// `record_results`' job.
pub fn parse_results_csv(input: &str) -> Result<Vec<MatchResult>, TournamentError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(input.as_bytes());

    let mut results = Vec::new();
    for (row, record) in reader.records().enumerate() {
        let record = record.map_err(|e| invalid(row + 1, e.to_string()))?;
        let line = record
            .position()
            .map_or(row + 1, |pos| pos.line() as usize);
        if record.iter().all(str::is_empty) {
            continue;
        }
        results.push(parse_row(line, &record)?);
    }
    Ok(results)
}

fn parse_row(line: usize, record: &csv::StringRecord) -> Result<MatchResult, TournamentError> {
    let mut players: Vec<PlayerMatchResult> = Vec::new();
    let mut draws = 0;

    for cell in record.iter().filter(|c| !c.is_empty()) {
        if let Some((name, wins)) = cell.split_once(':') {
            let name = name.trim();
            let wins: u32 = wins
                .trim()
                .parse()
                .map_err(|_| invalid(line, format!("bad win count in {:?}", cell)))?;
            if name.is_empty() {
                return Err(invalid(line, format!("missing player name in {:?}", cell)));
            }
            if players.iter().any(|p| p.name == name) {
                return Err(invalid(line, format!("{} listed twice", name)));
            }
            players.push(PlayerMatchResult::new(name, wins));
        } else if let Some(name) = cell.strip_prefix('-') {
            let name = name.trim();
            let side = players
                .iter_mut()
                .find(|p| p.name == name)
                .ok_or_else(|| invalid(line, format!("drop for {} before their score", name)))?;
            side.drop = true;
        } else {
            draws = cell
                .parse()
                .map_err(|_| invalid(line, format!("unrecognised cell {:?}", cell)))?;
        }
    }

    Ok(MatchResult::new(players, draws))
}

fn invalid(line: usize, reason: String) -> TournamentError {
    TournamentError::InvalidResultsCsv { line, reason }
}
