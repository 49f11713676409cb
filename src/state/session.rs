use super::snapshot::SessionSnapshot;
use super::AppState;
use crate::answer;
use crate::share;
use crate::storage::GAME_STATE_KEY;
use crate::types::{GamePhase, GameSession, Verse};
use crate::verses;
use serde::Serialize;

/// Result of a single answer submission
#[derive(Debug, Clone, Serialize)]
pub struct AnswerOutcome {
    pub correct: bool,
    pub correct_line: String,
    pub finished: bool,
}

impl AppState {
    /// Start a fresh random round, overwriting any previous session
    pub async fn start_round(&self) -> Result<GameSession, String> {
        if self.verses.is_empty() {
            return Err("Verse store is empty".to_string());
        }

        let played = self.played_set().await;
        let round =
            verses::select_for_round(&self.verses, &played, self.config.questions_per_round);
        self.begin(round).await
    }

    /// Start a round from a shared token.
    ///
    /// Falls back to random selection when the token is malformed or no
    /// longer resolves completely against the current verse store.
    pub async fn start_shared_round(&self, token: &str) -> Result<GameSession, String> {
        let ids = share::decode_token(token);
        if ids.is_empty() {
            tracing::info!("Malformed share token, starting a random round instead");
            return self.start_round().await;
        }

        let round = verses::select_by_ids(&self.verses, &ids);
        if round.len() < ids.len() {
            tracing::info!(
                "Share token resolved {} of {} verses, starting a random round instead",
                round.len(),
                ids.len()
            );
            return self.start_round().await;
        }

        self.begin(round).await
    }

    async fn begin(&self, round: Vec<Verse>) -> Result<GameSession, String> {
        if round.is_empty() {
            return Err("No verses available for a round".to_string());
        }

        let session = GameSession {
            phase: GamePhase::Playing,
            round,
            current_index: 0,
            answers: Vec::new(),
        };

        *self.session.write().await = session.clone();
        self.persist_snapshot(&session).await;

        tracing::info!("Started round with {} questions", session.round.len());
        Ok(session)
    }

    /// Resume the persisted snapshot. Stale or unreadable snapshots are
    /// discarded and reported as an error.
    pub async fn resume(&self) -> Result<GameSession, String> {
        let raw = self
            .storage
            .get(GAME_STATE_KEY)
            .await
            .ok_or("No saved game")?;

        let snapshot: SessionSnapshot = match serde_json::from_str(&raw) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                tracing::warn!("Discarding unreadable session snapshot: {}", e);
                self.storage.remove(GAME_STATE_KEY).await;
                return Err("Saved game is unreadable".to_string());
            }
        };

        match snapshot.restore(&self.verses) {
            Ok(session) => {
                *self.session.write().await = session.clone();
                tracing::info!(
                    "Resumed round at question {} of {}",
                    session.current_index + 1,
                    session.round.len()
                );
                Ok(session)
            }
            Err(e) => {
                tracing::warn!("Discarding stale session snapshot: {}", e);
                self.storage.remove(GAME_STATE_KEY).await;
                Err(e)
            }
        }
    }

    /// Whether a persisted snapshot exists. Existence only; validation
    /// happens on resume.
    pub async fn has_saved_session(&self) -> bool {
        self.storage.get(GAME_STATE_KEY).await.is_some()
    }

    /// Submit an answer for the current question.
    ///
    /// Marks the verse as played, records the result, and either advances to
    /// the next question (re-persisting the snapshot) or finishes the round
    /// (deleting it).
    pub async fn submit_answer(&self, guess: &str) -> Result<AnswerOutcome, String> {
        if guess.trim().is_empty() {
            return Err("Answer must not be empty".to_string());
        }

        let mut session = self.session.write().await;
        if session.phase != GamePhase::Playing {
            return Err("No active round".to_string());
        }

        let verse = session
            .round
            .get(session.current_index)
            .cloned()
            .ok_or("No current question")?;

        let correct = answer::check_answer(guess, verse.target_line());
        self.mark_played(verse.id()).await;

        session.answers.push(correct);
        let finished = session.current_index + 1 >= session.round.len();
        if finished {
            session.phase = GamePhase::Finished;
            self.storage.remove(GAME_STATE_KEY).await;
        } else {
            session.current_index += 1;
            self.persist_snapshot(&session).await;
        }

        Ok(AnswerOutcome {
            correct,
            correct_line: verse.target_line().to_string(),
            finished,
        })
    }

    /// Leave for the start screen. An active round is persisted as-is so it
    /// can be resumed later; the session itself stays in `Playing`.
    pub async fn go_home(&self) {
        let session = self.session.read().await;
        if session.phase == GamePhase::Playing && !session.round.is_empty() {
            self.persist_snapshot(&session).await;
        }
    }

    /// Share token for the current round
    pub async fn share_token(&self) -> Result<String, String> {
        let session = self.session.read().await;
        if session.round.is_empty() {
            return Err("No round to share".to_string());
        }
        Ok(share::encode_round(&session.round))
    }

    async fn persist_snapshot(&self, session: &GameSession) {
        let snapshot = SessionSnapshot::capture(session);
        match serde_json::to_string(&snapshot) {
            Ok(json) => self.storage.set(GAME_STATE_KEY, json).await,
            Err(e) => tracing::warn!("Failed to serialize session snapshot: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::StoragePort;
    use crate::types::GameConfig;

    fn verse(number: &str, target: &str) -> Verse {
        Verse {
            number: number.to_string(),
            lines: vec![
                format!("первая {}", number),
                "вторая".to_string(),
                "третья".to_string(),
                target.to_string(),
            ],
            attribution: None,
        }
    }

    fn state(n: usize, per_round: usize) -> AppState {
        let verses = (1..=n)
            .map(|i| verse(&format!("{:02}", i), &format!("ответ {}", i)))
            .collect();
        AppState::in_memory(
            verses,
            GameConfig {
                questions_per_round: per_round,
            },
        )
    }

    #[tokio::test]
    async fn test_snapshot_written_on_start_and_each_answer() {
        let state = state(10, 3);
        state.start_round().await.unwrap();
        assert!(state.has_saved_session().await);

        let raw_before = state.storage.get(GAME_STATE_KEY).await.unwrap();
        state.submit_answer("мимо").await.unwrap();
        let raw_after = state.storage.get(GAME_STATE_KEY).await.unwrap();
        assert_ne!(raw_before, raw_after);

        let snapshot: SessionSnapshot = serde_json::from_str(&raw_after).unwrap();
        assert_eq!(snapshot.current_index, 1);
        assert_eq!(snapshot.answers, vec![false]);
    }

    #[tokio::test]
    async fn test_snapshot_deleted_on_finish() {
        let state = state(10, 2);
        state.start_round().await.unwrap();

        state.submit_answer("мимо").await.unwrap();
        assert!(state.has_saved_session().await);

        let outcome = state.submit_answer("мимо").await.unwrap();
        assert!(outcome.finished);
        assert!(!state.has_saved_session().await);
    }

    #[tokio::test]
    async fn test_submit_answer_requires_active_round() {
        let state = state(10, 3);
        let result = state.submit_answer("что-то").await;
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("No active round"));
    }

    #[tokio::test]
    async fn test_submit_answer_rejects_empty_guess() {
        let state = state(10, 3);
        state.start_round().await.unwrap();

        assert!(state.submit_answer("").await.is_err());
        assert!(state.submit_answer("   ").await.is_err());

        // The question was not consumed
        let session = state.current_session().await;
        assert_eq!(session.current_index, 0);
        assert!(session.answers.is_empty());
    }

    #[tokio::test]
    async fn test_go_home_keeps_round_resumable() {
        let state = state(10, 3);
        state.start_round().await.unwrap();
        state.submit_answer("мимо").await.unwrap();

        state.go_home().await;

        // Still playing, still persisted
        assert_eq!(state.current_session().await.phase, GamePhase::Playing);
        assert!(state.has_saved_session().await);

        let resumed = state.resume().await.unwrap();
        assert_eq!(resumed.current_index, 1);
    }

    #[tokio::test]
    async fn test_resume_without_snapshot_fails() {
        let state = state(10, 3);
        assert!(state.resume().await.is_err());
    }

    #[tokio::test]
    async fn test_resume_discards_unreadable_snapshot() {
        let state = state(10, 3);
        state
            .storage
            .set(GAME_STATE_KEY, "not json".to_string())
            .await;

        assert!(state.resume().await.is_err());
        assert!(!state.has_saved_session().await);
    }

    #[tokio::test]
    async fn test_resume_discards_stale_snapshot() {
        let state = state(10, 3);
        state.start_round().await.unwrap();

        // The store moved on: none of the snapshot verses exist anymore
        let stale = AppState::new(
            vec![verse("99", "другое")],
            state.config.clone(),
            state.storage.clone(),
        );
        assert!(stale.resume().await.is_err());
        assert!(!stale.has_saved_session().await);
    }

    #[tokio::test]
    async fn test_new_round_overwrites_saved_session() {
        let state = state(10, 3);
        state.start_round().await.unwrap();
        state.submit_answer("мимо").await.unwrap();
        let old = state.storage.get(GAME_STATE_KEY).await.unwrap();

        state.start_round().await.unwrap();
        let fresh = state.storage.get(GAME_STATE_KEY).await.unwrap();
        assert_ne!(old, fresh);

        let snapshot: SessionSnapshot = serde_json::from_str(&fresh).unwrap();
        assert_eq!(snapshot.current_index, 0);
        assert!(snapshot.answers.is_empty());
    }

    #[tokio::test]
    async fn test_share_token_matches_round() {
        let state = state(10, 4);
        let session = state.start_round().await.unwrap();

        let token = state.share_token().await.unwrap();
        assert_eq!(token, share::encode_round(&session.round));
        assert_eq!(token.chars().count(), session.round.len() * share::CHUNK_LEN);
    }

    #[tokio::test]
    async fn test_share_token_requires_round() {
        let state = state(10, 4);
        assert!(state.share_token().await.is_err());
    }
}
