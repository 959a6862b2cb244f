//! Applying a round of match results: points, games, opponent history, byes, drops.

use crate::logic::standings::update_derived_stats;
use crate::models::{MatchResult, Player, Tournament, TournamentError, POINTS_PER_WIN};
use std::collections::HashSet;

/// Record one complete round of results, then recompute tie-breaks.
///
/// The batch must cover every active player exactly once. Nothing is applied unless the
/// whole batch is valid. Round number increments on success and stored pairings are cleared.
pub fn record_results(
    tournament: &mut Tournament,
    results: &[MatchResult],
) -> Result<(), TournamentError> {
    validate_results(tournament, results)?;

    let mut dropped = Vec::new();
    for (index, result) in results.iter().enumerate() {
        apply_match_result(tournament, index, result)?;
        for side in result.players.iter().filter(|side| side.drop) {
            tournament.drop_player(&side.name)?;
            dropped.push(side.name.clone());
        }
    }

    tournament.round += 1;
    tournament.pairings.clear();
    update_derived_stats(tournament);

    log::info!(
        "Recorded round {} of {}: {} result(s), {} active player(s)",
        tournament.round,
        tournament.name,
        results.len(),
        tournament.active.len()
    );
    if !dropped.is_empty() {
        log::info!("Dropped after round {}: {}", tournament.round, dropped.join(", "));
    }
    Ok(())
}

/// Check arity, names and coverage of a batch without touching the tournament.
pub fn validate_results(
    tournament: &Tournament,
    results: &[MatchResult],
) -> Result<(), TournamentError> {
    for (index, result) in results.iter().enumerate() {
        let sides = result.players.len();
        if sides != 1 && sides != 2 {
            return Err(TournamentError::MalformedResult { index, sides });
        }
    }

    let mut outstanding = tournament.active_names();
    let mut seen: HashSet<&str> = HashSet::new();
    for side in results.iter().flat_map(|r| &r.players) {
        let name = side.name.as_str();
        if !seen.insert(name) {
            return Err(TournamentError::DuplicateResult(name.to_string()));
        }
        if !outstanding.remove(name) {
            return Err(TournamentError::UnknownPlayer(name.to_string()));
        }
    }

    if !outstanding.is_empty() {
        // Roster order keeps the message stable.
        let missing = tournament
            .active_players()
            .into_iter()
            .filter(|p| outstanding.contains(p.name.as_str()))
            .map(|p| p.name.clone())
            .collect();
        return Err(TournamentError::MissingResults(missing));
    }

    for result in results {
        check_totals(tournament, result)?;
    }
    Ok(())
}

/// New totals for every side must fit in a `u32`. Each player has at most one side per
/// batch, so checking against current totals covers the whole round.
fn check_totals(tournament: &Tournament, result: &MatchResult) -> Result<(), TournamentError> {
    for side in &result.players {
        let overflow = || TournamentError::ScoreOverflow(side.name.clone());
        let p = tournament
            .player(&side.name)
            .ok_or_else(|| TournamentError::UnknownPlayer(side.name.clone()))?;
        let total_games = result.total_games().ok_or_else(overflow)?;
        let won = POINTS_PER_WIN
            .checked_mul(side.wins)
            .and_then(|points| points.checked_add(result.draws))
            .ok_or_else(overflow)?;
        p.game_points.checked_add(won).ok_or_else(overflow)?;
        p.games_played.checked_add(total_games).ok_or_else(overflow)?;
        p.match_points.checked_add(POINTS_PER_WIN).ok_or_else(overflow)?;
        p.rounds_played.checked_add(1).ok_or_else(overflow)?;
    }
    Ok(())
}

/// Apply a single validated result: games for every side, then match points and history.
fn apply_match_result(
    tournament: &mut Tournament,
    index: usize,
    result: &MatchResult,
) -> Result<(), TournamentError> {
    let sides = result.players.len();
    let total_games = result
        .total_games()
        .ok_or_else(|| TournamentError::MalformedResult { index, sides })?;
    for side in &result.players {
        player_mut(tournament, &side.name)?.add_games(side.wins, result.draws, total_games);
    }

    let tournament_round = tournament.round + 1;
    match result.players.as_slice() {
        [bye] => {
            let p = player_mut(tournament, &bye.name)?;
            if p.had_bye {
                log::warn!("{} receives a second bye in round {}", p.name, tournament_round);
            }
            p.record_bye();
        }
        [first, second] => {
            let (a, b) = (first.name.as_str(), second.name.as_str());
            if player_mut(tournament, a)?.has_played(b) {
                log::warn!("Rematch recorded in round {}: {} vs {}", tournament_round, a, b);
            }
            if first.wins == second.wins {
                player_mut(tournament, a)?.add_match_draw();
                player_mut(tournament, b)?.add_match_draw();
            } else if first.wins > second.wins {
                player_mut(tournament, a)?.add_match_win();
            } else {
                player_mut(tournament, b)?.add_match_win();
            }
            player_mut(tournament, a)?.record_opponent(b);
            player_mut(tournament, b)?.record_opponent(a);
        }
        _ => return Err(TournamentError::MalformedResult { index, sides }),
    }
    Ok(())
}

fn player_mut<'a>(
    tournament: &'a mut Tournament,
    name: &str,
) -> Result<&'a mut Player, TournamentError> {
    tournament
        .player_mut(name)
        .ok_or_else(|| TournamentError::UnknownPlayer(name.to_string()))
}
