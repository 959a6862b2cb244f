//! Player record: running totals plus the derived tie-break percentages.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Index of a player in the tournament registry.
pub type PlayerIndex = usize;

/// Lowest value any tie-break percentage may take.
pub const PERCENT_FLOOR: f64 = 0.33;

/// Match points for a match win (byes included).
pub const POINTS_PER_WIN: u32 = 3;

/// Match points for a drawn (or unplayed) match.
pub const POINTS_PER_DRAW: u32 = 1;

/// A player in the tournament.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub name: String,
    pub match_points: u32,
    pub game_points: u32,
    pub games_played: u32,
    pub rounds_played: u32,
    pub had_bye: bool,
    /// Names of every opponent faced so far.
    pub already_played: BTreeSet<String>,
    /// Derived after each round; see `logic::update_derived_stats`.
    #[serde(default = "floor")]
    pub match_win_percent: f64,
    #[serde(default = "floor")]
    pub game_win_percent: f64,
    #[serde(default = "floor")]
    pub opp_match_win_percent: f64,
    #[serde(default = "floor")]
    pub opp_game_win_percent: f64,
}

fn floor() -> f64 {
    PERCENT_FLOOR
}

impl Player {
    /// Create a new player with the given name. Totals start at zero, percentages at the floor.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            match_points: 0,
            game_points: 0,
            games_played: 0,
            rounds_played: 0,
            had_bye: false,
            already_played: BTreeSet::new(),
            match_win_percent: PERCENT_FLOOR,
            game_win_percent: PERCENT_FLOOR,
            opp_match_win_percent: PERCENT_FLOOR,
            opp_game_win_percent: PERCENT_FLOOR,
        }
    }

    pub fn has_played(&self, opponent: &str) -> bool {
        self.already_played.contains(opponent)
    }

    /// Record the games of one match: `wins` won, `draws` drawn, `total_games` played in all.
    pub fn add_games(&mut self, wins: u32, draws: u32, total_games: u32) {
        self.game_points += POINTS_PER_WIN * wins + draws;
        self.games_played += total_games;
        self.rounds_played += 1;
    }

    /// Record a match win.
    pub fn add_match_win(&mut self) {
        self.match_points += POINTS_PER_WIN;
    }

    /// Record a drawn match.
    pub fn add_match_draw(&mut self) {
        self.match_points += POINTS_PER_DRAW;
    }

    /// Record a bye: counts as a match win.
    pub fn record_bye(&mut self) {
        self.add_match_win();
        self.had_bye = true;
    }

    /// Remember `opponent` so they are never paired again.
    pub fn record_opponent(&mut self, opponent: impl Into<String>) {
        self.already_played.insert(opponent.into());
    }

    /// The tuple rankings are sorted by, highest first.
    pub fn tiebreak_key(&self) -> (u32, f64, f64, f64) {
        (
            self.match_points,
            self.opp_match_win_percent,
            self.game_win_percent,
            self.opp_game_win_percent,
        )
    }
}
