//! Persisted session snapshots for resuming an interrupted round.
//!
//! Only `Playing` sessions are ever written; the record is deleted the moment
//! a round finishes. Restoring re-validates the snapshot against the current
//! verse store, since the underlying data may have changed between runs.

use crate::types::{GamePhase, GameSession, Verse};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Schema version for snapshot format compatibility
pub const SNAPSHOT_SCHEMA_VERSION: u32 = 1;

/// A serializable snapshot of an in-progress round
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSnapshot {
    /// Schema version for forward compatibility
    pub schema_version: u32,
    /// Snapshot timestamp (ISO8601)
    pub saved_at: String,
    pub phase: GamePhase,
    pub round: Vec<Verse>,
    pub current_index: usize,
    pub answers: Vec<bool>,
}

impl SessionSnapshot {
    /// Capture the current session for persistence
    pub fn capture(session: &GameSession) -> Self {
        Self {
            schema_version: SNAPSHOT_SCHEMA_VERSION,
            saved_at: chrono::Utc::now().to_rfc3339(),
            phase: session.phase,
            round: session.round.clone(),
            current_index: session.current_index,
            answers: session.answers.clone(),
        }
    }

    /// Validate the snapshot against the current verse store and turn it
    /// back into a live session.
    ///
    /// Verses that no longer resolve are dropped; the snapshot as a whole is
    /// rejected when nothing resolves, when the recorded position falls out
    /// of range after filtering, or when the record was written by a newer
    /// binary.
    pub fn restore(self, store: &[Verse]) -> Result<GameSession, String> {
        if self.schema_version > SNAPSHOT_SCHEMA_VERSION {
            return Err(format!(
                "Snapshot schema version {} is newer than supported version {}",
                self.schema_version, SNAPSHOT_SCHEMA_VERSION
            ));
        }

        if self.phase != GamePhase::Playing {
            return Err("Only in-progress rounds can be resumed".to_string());
        }

        let known: HashSet<&str> = store.iter().map(|v| v.id()).collect();
        let round: Vec<Verse> = self
            .round
            .into_iter()
            .filter(|v| known.contains(v.id()))
            .collect();

        if round.is_empty() {
            return Err("No verse in the snapshot exists in the current store".to_string());
        }
        if self.current_index >= round.len() {
            return Err(format!(
                "Snapshot position {} is out of range for {} verses",
                self.current_index,
                round.len()
            ));
        }
        if self.answers.len() > round.len() {
            return Err("Snapshot has more answers than verses".to_string());
        }

        Ok(GameSession {
            phase: GamePhase::Playing,
            round,
            current_index: self.current_index,
            answers: self.answers,
        })
    }
}
