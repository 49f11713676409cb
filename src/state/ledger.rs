use std::collections::HashSet;

use super::AppState;
use crate::storage::PLAYED_VERSES_KEY;

impl AppState {
    /// All played verse identifiers. Malformed or missing stored state
    /// degrades to an empty set.
    pub async fn played_set(&self) -> HashSet<String> {
        let raw = match self.storage.get(PLAYED_VERSES_KEY).await {
            Some(raw) => raw,
            None => return HashSet::new(),
        };

        match serde_json::from_str::<Vec<String>>(&raw) {
            Ok(ids) => ids.into_iter().collect(),
            Err(e) => {
                tracing::warn!("Ignoring malformed played ledger: {}", e);
                HashSet::new()
            }
        }
    }

    /// Record a verse as played. Idempotent.
    pub async fn mark_played(&self, id: &str) {
        let mut played: Vec<String> = self
            .storage
            .get(PLAYED_VERSES_KEY)
            .await
            .and_then(|raw| serde_json::from_str(&raw).ok())
            .unwrap_or_default();

        if played.iter().any(|p| p == id) {
            return;
        }
        played.push(id.to_string());

        match serde_json::to_string(&played) {
            Ok(json) => self.storage.set(PLAYED_VERSES_KEY, json).await,
            Err(e) => tracing::warn!("Failed to serialize played ledger: {}", e),
        }
    }

    pub async fn is_played(&self, id: &str) -> bool {
        self.played_set().await.contains(id)
    }

    pub async fn played_count(&self) -> usize {
        self.played_set().await.len()
    }

    /// Forget all played verses. Irreversible; user-triggered only.
    pub async fn reset_progress(&self) {
        self.storage.remove(PLAYED_VERSES_KEY).await;
        tracing::info!("Played ledger reset");
    }
}
