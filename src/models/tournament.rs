//! Tournament aggregate: player registry, active roster, round counter.

use crate::models::game::Pairing;
use crate::models::player::{Player, PlayerIndex};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

/// Errors that can occur during tournament operations.
#[derive(Clone, Debug, PartialEq)]
pub enum TournamentError {
    /// A player name is empty after trimming.
    InvalidPlayerName,
    /// A player with this name is already registered.
    DuplicatePlayerName(String),
    /// A match result has neither one nor two sides.
    MalformedResult { index: usize, sides: usize },
    /// A result names a player who is not in the active roster.
    UnknownPlayer(String),
    /// The same player appears in more than one result side this round.
    DuplicateResult(String),
    /// Active players with no submitted result.
    MissingResults(Vec<String>),
    /// Applying a result would push this player's totals past `u32::MAX`.
    ScoreOverflow(String),
    /// A results CSV row could not be understood.
    InvalidResultsCsv { line: usize, reason: String },
    /// Pairing generation failed.
    Pairing(PairingError),
    /// Reading or writing a snapshot failed.
    Snapshot(String),
    /// Rendering a report failed.
    Export(String),
}

impl std::fmt::Display for TournamentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TournamentError::InvalidPlayerName => write!(f, "Player name must not be empty"),
            TournamentError::DuplicatePlayerName(name) => {
                write!(f, "A player named {} already exists", name)
            }
            TournamentError::MalformedResult { index, sides } => write!(
                f,
                "Result #{} has {} player(s); expected 1 (bye) or 2",
                index + 1,
                sides
            ),
            TournamentError::UnknownPlayer(name) => {
                write!(f, "{} is not an active player", name)
            }
            TournamentError::DuplicateResult(name) => {
                write!(f, "More than one result submitted for {}", name)
            }
            TournamentError::MissingResults(names) => {
                write!(f, "No result submitted for: {}", names.join(", "))
            }
            TournamentError::ScoreOverflow(name) => {
                write!(f, "Result for {} is too large to record", name)
            }
            TournamentError::InvalidResultsCsv { line, reason } => {
                write!(f, "Results line {}: {}", line, reason)
            }
            TournamentError::Pairing(e) => write!(f, "{}", e),
            TournamentError::Snapshot(msg) => write!(f, "Snapshot error: {}", msg),
            TournamentError::Export(msg) => write!(f, "Export error: {}", msg),
        }
    }
}

impl std::error::Error for TournamentError {}

impl From<PairingError> for TournamentError {
    fn from(e: PairingError) -> Self {
        TournamentError::Pairing(e)
    }
}

/// Why no pairing could be produced for a round.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum PairingError {
    /// Odd pool and every player has already had a bye.
    NoByeCandidate,
    /// No candidate satisfied the constraints within the attempt limit.
    Exhausted { attempts: u32 },
}

impl std::fmt::Display for PairingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PairingError::NoByeCandidate => {
                write!(f, "Every remaining player has already had a bye")
            }
            PairingError::Exhausted { attempts } => write!(
                f,
                "No pairing without rematches found after {} attempts",
                attempts
            ),
        }
    }
}

impl std::error::Error for PairingError {}

/// Limits for the randomized pairing search.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct PairingConfig {
    /// Candidates generated before giving up.
    pub max_attempts: u32,
}

impl Default for PairingConfig {
    fn default() -> Self {
        Self { max_attempts: 1000 }
    }
}

/// Unique identifier for a tournament.
pub type TournamentId = Uuid;

/// Full tournament state: every player ever registered plus who is still playing.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Tournament {
    pub id: TournamentId,
    pub name: String,
    /// Number of the last completed round.
    pub round: u32,
    /// Every registered player, dropped ones included, in registration order.
    pub registry: Vec<Player>,
    /// Players still in the event, as registry indexes.
    pub active: Vec<PlayerIndex>,
    /// Pairings handed out for the upcoming round, if generated.
    #[serde(default)]
    pub pairings: Vec<Pairing>,
}

impl Tournament {
    /// Create a tournament at round 0 with all `player_names` active.
    pub fn new<I, S>(name: impl Into<String>, player_names: I) -> Result<Self, TournamentError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut tournament = Self {
            id: Uuid::new_v4(),
            name: name.into(),
            round: 0,
            registry: Vec::new(),
            active: Vec::new(),
            pairings: Vec::new(),
        };
        for player_name in player_names {
            tournament.add_player(player_name.as_ref())?;
        }
        Ok(tournament)
    }

    /// Register a player and add them to the active roster. Names are unique (exact, trimmed).
    pub fn add_player(&mut self, name: &str) -> Result<PlayerIndex, TournamentError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(TournamentError::InvalidPlayerName);
        }
        if self.index_of(name).is_some() {
            return Err(TournamentError::DuplicatePlayerName(name.to_string()));
        }
        let index = self.registry.len();
        self.registry.push(Player::new(name));
        self.active.push(index);
        Ok(index)
    }

    pub fn index_of(&self, name: &str) -> Option<PlayerIndex> {
        self.registry.iter().position(|p| p.name == name)
    }

    /// Look up a player in the full registry (dropped players included).
    pub fn player(&self, name: &str) -> Option<&Player> {
        self.registry.iter().find(|p| p.name == name)
    }

    pub fn player_mut(&mut self, name: &str) -> Option<&mut Player> {
        self.registry.iter_mut().find(|p| p.name == name)
    }

    /// Active players in roster order.
    pub fn active_players(&self) -> Vec<&Player> {
        self.active.iter().map(|&i| &self.registry[i]).collect()
    }

    pub fn active_names(&self) -> HashSet<&str> {
        self.active
            .iter()
            .map(|&i| self.registry[i].name.as_str())
            .collect()
    }

    /// Players who have dropped, in registration order.
    pub fn dropped_players(&self) -> Vec<&Player> {
        self.registry
            .iter()
            .enumerate()
            .filter(|(i, _)| !self.active.contains(i))
            .map(|(_, p)| p)
            .collect()
    }

    pub fn is_active(&self, name: &str) -> bool {
        self.index_of(name)
            .map_or(false, |i| self.active.contains(&i))
    }

    /// Pair the active roster for the next round and keep the result in `pairings`.
    pub fn new_pairings<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        config: &PairingConfig,
    ) -> Result<&[Pairing], TournamentError> {
        crate::logic::pair_next_round(self, rng, config)?;
        Ok(&self.pairings)
    }

    /// Remove a player from the active roster. Their record stays in the registry.
    pub fn drop_player(&mut self, name: &str) -> Result<(), TournamentError> {
        let index = self
            .index_of(name)
            .ok_or_else(|| TournamentError::UnknownPlayer(name.to_string()))?;
        let position = self
            .active
            .iter()
            .position(|&i| i == index)
            .ok_or_else(|| TournamentError::UnknownPlayer(name.to_string()))?;
        self.active.remove(position);
        Ok(())
    }
}
