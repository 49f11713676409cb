mod ledger;
mod session;
pub mod snapshot;

pub use session::AnswerOutcome;

use std::sync::Arc;
use tokio::sync::RwLock;

use crate::storage::{MemoryStorage, StoragePort};
use crate::types::{GameConfig, GameSession, Verse};

/// Shared application state
pub struct AppState {
    /// Read-only verse store, loaded once at startup
    pub verses: Vec<Verse>,
    pub config: GameConfig,
    pub session: RwLock<GameSession>,
    pub storage: Arc<dyn StoragePort>,
}

impl AppState {
    pub fn new(verses: Vec<Verse>, config: GameConfig, storage: Arc<dyn StoragePort>) -> Self {
        Self {
            verses,
            config,
            session: RwLock::new(GameSession::idle()),
            storage,
        }
    }

    /// State backed by in-memory storage, for tests and ephemeral runs
    pub fn in_memory(verses: Vec<Verse>, config: GameConfig) -> Self {
        Self::new(verses, config, Arc::new(MemoryStorage::new()))
    }

    /// A copy of the current session
    pub async fn current_session(&self) -> GameSession {
        self.session.read().await.clone()
    }
}
