//! Pairings handed out for a round and the match results that come back.

use serde::{Deserialize, Serialize};

/// One round assignment: two players meet, or one player sits out with a bye.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum Pairing {
    Match { player_1: String, player_2: String },
    Bye { player: String },
}

impl Pairing {
    pub fn names(&self) -> Vec<&str> {
        match self {
            Pairing::Match { player_1, player_2 } => vec![player_1, player_2],
            Pairing::Bye { player } => vec![player],
        }
    }

    pub fn is_bye(&self) -> bool {
        matches!(self, Pairing::Bye { .. })
    }
}

/// One side of a match: games won and whether the player leaves the event afterwards.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct PlayerMatchResult {
    pub name: String,
    pub wins: u32,
    #[serde(default)]
    pub drop: bool,
}

impl PlayerMatchResult {
    pub fn new(name: impl Into<String>, wins: u32) -> Self {
        Self {
            name: name.into(),
            wins,
            drop: false,
        }
    }

    pub fn dropping(mut self) -> Self {
        self.drop = true;
        self
    }
}

/// Outcome of a single match. One side means a bye, two sides a played match.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub players: Vec<PlayerMatchResult>,
    #[serde(default)]
    pub draws: u32,
}

impl MatchResult {
    pub fn new(players: Vec<PlayerMatchResult>, draws: u32) -> Self {
        Self { players, draws }
    }

    /// Two-player result with no drops.
    pub fn played(
        player_1: impl Into<String>,
        wins_1: u32,
        player_2: impl Into<String>,
        wins_2: u32,
        draws: u32,
    ) -> Self {
        Self::new(
            vec![
                PlayerMatchResult::new(player_1, wins_1),
                PlayerMatchResult::new(player_2, wins_2),
            ],
            draws,
        )
    }

    /// Bye for `player`, scored as a 2-0 win.
    pub fn bye(player: impl Into<String>) -> Self {
        Self::new(vec![PlayerMatchResult::new(player, 2)], 0)
    }

    /// Games played in the match, across both sides. `None` if the count overflows.
    pub fn total_games(&self) -> Option<u32> {
        self.players
            .iter()
            .try_fold(self.draws, |total, p| total.checked_add(p.wins))
    }
}
