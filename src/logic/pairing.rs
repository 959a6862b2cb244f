//! Swiss pairing: score-grouped random pairings, regenerated until no rematch and no second bye.

use crate::models::{Pairing, PairingConfig, PairingError, Player, Tournament, TournamentError};
use rand::seq::SliceRandom;
use rand::Rng;

/// Generate pairings for the next round and store them on the tournament.
///
/// Results for the round are still checked against the active roster, not against
/// these pairings, so a tournament director can re-pair by hand.
pub fn pair_next_round<R: Rng + ?Sized>(
    tournament: &mut Tournament,
    rng: &mut R,
    config: &PairingConfig,
) -> Result<(), TournamentError> {
    let pairings = generate_pairings(&tournament.active_players(), rng, config)?;
    log::info!(
        "Paired round {} of {}: {} pairing(s)",
        tournament.round + 1,
        tournament.name,
        pairings.len()
    );
    tournament.pairings = pairings;
    Ok(())
}

/// Pair `players`, retrying with fresh randomness until the candidate is valid.
///
/// 1. Fuzz match points that are not a multiple of 3 (round down, then up by 3 half the time).
/// 2. Shuffle, then stable-sort ascending by fuzzed points.
/// 3. Odd count: the lowest player without a bye sits out.
/// 4. Reverse and pair neighbours: (0, 1), (2, 3), ...
///
/// Gives up after `config.max_attempts` candidates.
pub fn generate_pairings<R: Rng + ?Sized>(
    players: &[&Player],
    rng: &mut R,
    config: &PairingConfig,
) -> Result<Vec<Pairing>, PairingError> {
    if players.len() % 2 == 1 && players.iter().all(|p| p.had_bye) {
        return Err(PairingError::NoByeCandidate);
    }

    for attempt in 1..=config.max_attempts {
        let candidate = candidate_pairings(players, rng);
        if validate_pairings(players, &candidate) {
            log::debug!(
                "Found pairings for {} player(s) on attempt {}",
                players.len(),
                attempt
            );
            return Ok(candidate);
        }
        log::trace!("Pairing attempt {} rejected", attempt);
    }

    log::warn!(
        "No valid pairing for {} player(s) after {} attempts",
        players.len(),
        config.max_attempts
    );
    Err(PairingError::Exhausted {
        attempts: config.max_attempts,
    })
}

/// True if no bye goes to a player who already had one and no match is a rematch.
/// Names missing from `players` make the pairing invalid.
pub fn validate_pairings(players: &[&Player], pairings: &[Pairing]) -> bool {
    let find = |name: &str| players.iter().find(|p| p.name == name);
    pairings.iter().all(|pairing| match pairing {
        Pairing::Bye { player } => find(player).map_or(false, |p| !p.had_bye),
        Pairing::Match { player_1, player_2 } => match (find(player_1), find(player_2)) {
            (Some(a), Some(b)) => !a.has_played(&b.name) && !b.has_played(&a.name),
            _ => false,
        },
    })
}

/// One unchecked candidate. Works on a copy of the pool; players are never mutated.
fn candidate_pairings<R: Rng + ?Sized>(players: &[&Player], rng: &mut R) -> Vec<Pairing> {
    let mut pool: Vec<(&Player, u32)> = players
        .iter()
        .map(|&p| (p, fuzzed_points(p.match_points, rng)))
        .collect();
    pool.shuffle(rng);
    // Stable: shuffled order survives within each score group.
    pool.sort_by_key(|&(_, points)| points);

    let mut bye = None;
    if pool.len() % 2 == 1 {
        // Falls back to the lowest player; validation rejects that candidate.
        let index = pool.iter().position(|(p, _)| !p.had_bye).unwrap_or(0);
        bye = Some(pool.remove(index).0);
    }

    pool.reverse();
    let mut pairings: Vec<Pairing> = pool
        .chunks_exact(2)
        .map(|pair| Pairing::Match {
            player_1: pair[0].0.name.clone(),
            player_2: pair[1].0.name.clone(),
        })
        .collect();

    if let Some(p) = bye {
        pairings.push(Pairing::Bye {
            player: p.name.clone(),
        });
    }
    pairings
}

/// Sort key only; never stored.
fn fuzzed_points<R: Rng + ?Sized>(points: u32, rng: &mut R) -> u32 {
    let remainder = points % 3;
    if remainder == 0 {
        return points;
    }
    let floored = points - remainder;
    if rng.gen_bool(0.5) {
        floored + 3
    } else {
        floored
    }
}
