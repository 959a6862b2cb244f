//! JSON snapshots of a tournament between rounds.

use crate::logic::update_derived_stats;
use crate::models::{Tournament, TournamentError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// A saved tournament and when it was saved.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Snapshot {
    pub saved_at: DateTime<Utc>,
    pub tournament: Tournament,
}

impl Snapshot {
    pub fn new(tournament: Tournament) -> Self {
        Self {
            saved_at: Utc::now(),
            tournament,
        }
    }

    pub fn to_json(&self) -> Result<String, TournamentError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| TournamentError::Snapshot(format!("Failed to serialize: {}", e)))
    }

    /// Parse a snapshot and rebuild the derived statistics, which are never trusted from disk.
    pub fn from_json(json: &str) -> Result<Self, TournamentError> {
        let mut snapshot: Snapshot = serde_json::from_str(json)
            .map_err(|e| TournamentError::Snapshot(format!("Failed to parse: {}", e)))?;
        check_roster(&snapshot.tournament)?;
        update_derived_stats(&mut snapshot.tournament);
        Ok(snapshot)
    }

    pub fn save(&self, path: &Path) -> Result<(), TournamentError> {
        let json = self.to_json()?;
        std::fs::write(path, json)
            .map_err(|e| TournamentError::Snapshot(format!("Failed to write: {}", e)))?;
        log::debug!(
            "Saved {} after round {} to {}",
            self.tournament.name,
            self.tournament.round,
            path.display()
        );
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self, TournamentError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| TournamentError::Snapshot(format!("Failed to read: {}", e)))?;
        Self::from_json(&contents)
    }
}

/// Active indexes must point into the registry, once each; names must be unique.
fn check_roster(tournament: &Tournament) -> Result<(), TournamentError> {
    let mut seen = HashSet::new();
    for &index in &tournament.active {
        if index >= tournament.registry.len() || !seen.insert(index) {
            return Err(TournamentError::Snapshot(format!(
                "Invalid active player index {}",
                index
            )));
        }
    }
    let mut names = HashSet::new();
    for p in &tournament.registry {
        if !names.insert(p.name.as_str()) {
            return Err(TournamentError::DuplicatePlayerName(p.name.clone()));
        }
    }
    Ok(())
}
