//! Tie-break percentages and rankings.

use crate::models::{Player, Tournament, PERCENT_FLOOR};
use serde::Serialize;
use std::cmp::Ordering;

/// One row of the standings table.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Standing {
    /// 1-based.
    pub rank: usize,
    pub name: String,
    pub match_points: u32,
    pub opp_match_win_percent: f64,
    pub game_win_percent: f64,
    pub opp_game_win_percent: f64,
}

impl Standing {
    fn from_player(rank: usize, p: &Player) -> Self {
        Self {
            rank,
            name: p.name.clone(),
            match_points: p.match_points,
            opp_match_win_percent: p.opp_match_win_percent,
            game_win_percent: p.game_win_percent,
            opp_game_win_percent: p.opp_game_win_percent,
        }
    }
}

/// Recompute every registry player's percentages.
///
/// Own percentages for everyone first; opponent averages read those, so they need the
/// first pass finished. Dropped players are included since they remain opponents of record.
pub fn update_derived_stats(tournament: &mut Tournament) {
    for p in &mut tournament.registry {
        p.match_win_percent = floored_ratio(p.match_points, p.rounds_played);
        p.game_win_percent = floored_ratio(p.game_points, p.games_played);
    }

    let opponent_averages: Vec<(f64, f64)> = tournament
        .registry
        .iter()
        .map(|p| {
            let opponents: Vec<&Player> = p
                .already_played
                .iter()
                .filter_map(|name| tournament.player(name))
                .collect();
            (
                mean_or_floor(opponents.iter().map(|o| o.match_win_percent)),
                mean_or_floor(opponents.iter().map(|o| o.game_win_percent)),
            )
        })
        .collect();

    for (p, (omw, ogw)) in tournament.registry.iter_mut().zip(opponent_averages) {
        p.opp_match_win_percent = omw;
        p.opp_game_win_percent = ogw;
    }
}

/// Active players, best first, by (match points, OMW%, GW%, OGW%). Ties keep roster order.
pub fn rankings(tournament: &Tournament) -> Vec<&Player> {
    let mut players = tournament.active_players();
    players.sort_by(|a, b| compare_tiebreaks(b, a));
    players
}

/// `rankings` with 1-based ranks attached.
pub fn standings(tournament: &Tournament) -> Vec<Standing> {
    rankings(tournament)
        .into_iter()
        .enumerate()
        .map(|(i, p)| Standing::from_player(i + 1, p))
        .collect()
}

/// Lexicographic comparison of the tie-break tuple, lowest first.
pub fn compare_tiebreaks(a: &Player, b: &Player) -> Ordering {
    let (a_mp, a_omw, a_gw, a_ogw) = a.tiebreak_key();
    let (b_mp, b_omw, b_gw, b_ogw) = b.tiebreak_key();
    a_mp.cmp(&b_mp)
        .then(a_omw.total_cmp(&b_omw))
        .then(a_gw.total_cmp(&b_gw))
        .then(a_ogw.total_cmp(&b_ogw))
}

/// `points / (3 * played)`, never below the floor; the floor itself when nothing was played.
fn floored_ratio(points: u32, played: u32) -> f64 {
    if played == 0 {
        return PERCENT_FLOOR;
    }
    let ratio = f64::from(points) / (3.0 * f64::from(played));
    ratio.max(PERCENT_FLOOR)
}

fn mean_or_floor(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0, 0u32), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        PERCENT_FLOOR
    } else {
        sum / f64::from(count)
    }
}
