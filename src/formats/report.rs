//! Printable pairings and standings.

use crate::logic::Standing;
use crate::models::{Pairing, TournamentError};

const STANDINGS_HEADER: [&str; 6] = ["Rank", "Name", "Points", "OMW%", "GW%", "OGW%"];

/// One line per pairing: `A vs B`, or `C has a bye`.
pub fn render_pairings(pairings: &[Pairing]) -> String {
    let mut out = String::new();
    for pairing in pairings {
        match pairing {
            Pairing::Match { player_1, player_2 } => {
                out.push_str(&format!("{} vs {}\n", player_1, player_2))
            }
            Pairing::Bye { player } => out.push_str(&format!("{} has a bye\n", player)),
        }
    }
    out
}

/// Fixed-width standings table.
pub fn render_standings(standings: &[Standing]) -> String {
    let name_width = standings
        .iter()
        .map(|s| s.name.len())
        .chain(std::iter::once(STANDINGS_HEADER[1].len()))
        .max()
        .unwrap_or_default();

    let mut out = format!(
        "{:>4}  {:<w$}  {:>6}  {:>6}  {:>6}  {:>6}\n",
        STANDINGS_HEADER[0],
        STANDINGS_HEADER[1],
        STANDINGS_HEADER[2],
        STANDINGS_HEADER[3],
        STANDINGS_HEADER[4],
        STANDINGS_HEADER[5],
        w = name_width
    );
    for s in standings {
        let [omw, gw, ogw] = percentages(s);
        out.push_str(&format!(
            "{:>4}  {:<w$}  {:>6}  {:>6}  {:>6}  {:>6}\n",
            s.rank,
            s.name,
            s.match_points,
            omw,
            gw,
            ogw,
            w = name_width
        ));
    }
    out
}

/// Standings as CSV with a header row.
pub fn standings_to_csv(standings: &[Standing]) -> Result<String, TournamentError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(STANDINGS_HEADER).map_err(csv_error)?;
    for s in standings {
        let [omw, gw, ogw] = percentages(s);
        writer
            .write_record([
                s.rank.to_string(),
                s.name.clone(),
                s.match_points.to_string(),
                omw,
                gw,
                ogw,
            ])
            .map_err(csv_error)?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| TournamentError::Export(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| TournamentError::Export(e.to_string()))
}

fn percentages(s: &Standing) -> [String; 3] {
    [
        format!("{:.2}", s.opp_match_win_percent),
        format!("{:.2}", s.game_win_percent),
        format!("{:.2}", s.opp_game_win_percent),
    ]
}

fn csv_error(e: csv::Error) -> TournamentError {
    TournamentError::Export(e.to_string())
}
