//! Verse store loading and round selection.
//!
//! The verse list is fetched once at startup and read-only afterwards.
//! Selection never mutates the played ledger; it only consults it.

use std::collections::HashSet;
use std::path::PathBuf;

use rand::seq::SliceRandom;

use crate::share;
use crate::types::Verse;

/// Result type for verse loading
pub type VerseResult<T> = Result<T, VerseLoadError>;

/// Errors that can occur while loading the verse list
#[derive(Debug, thiserror::Error)]
pub enum VerseLoadError {
    #[error("fetching verses failed: {0}")]
    Fetch(#[from] reqwest::Error),

    #[error("reading verses failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("parsing verses failed: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Where the verse list comes from
#[derive(Debug, Clone)]
pub enum VerseSource {
    Url(String),
    Path(PathBuf),
}

/// Load the verse list from its configured source
pub async fn load_verses(source: &VerseSource) -> VerseResult<Vec<Verse>> {
    let verses: Vec<Verse> = match source {
        VerseSource::Url(url) => {
            tracing::info!("Fetching verses from {}", url);
            reqwest::get(url.as_str())
                .await?
                .error_for_status()?
                .json()
                .await?
        }
        VerseSource::Path(path) => {
            tracing::info!("Reading verses from {}", path.display());
            let raw = tokio::fs::read_to_string(path).await?;
            serde_json::from_str(&raw)?
        }
    };

    tracing::info!("Loaded {} verses", verses.len());
    Ok(verses)
}

/// Select verses for a fresh round, preferring ones not yet played.
///
/// When fewer than `count` unplayed verses remain, the round is drawn from
/// the full list instead; the ledger itself is untouched. Returns at most
/// `count` verses, fewer when the whole pool is smaller, never duplicates.
pub fn select_for_round(all: &[Verse], played: &HashSet<String>, count: usize) -> Vec<Verse> {
    let available: Vec<&Verse> = all.iter().filter(|v| !played.contains(v.id())).collect();

    let mut pool: Vec<&Verse> = if available.len() >= count {
        available
    } else {
        all.iter().collect()
    };

    pool.shuffle(&mut rand::rng());
    pool.into_iter().take(count).cloned().collect()
}

/// Resolve truncated identifiers from a shared round back to verses.
///
/// Requested order is preserved, unresolved ids are dropped, and when
/// truncation collides the first matching verse wins.
pub fn select_by_ids(all: &[Verse], ids: &[String]) -> Vec<Verse> {
    ids.iter()
        .filter_map(|id| all.iter().find(|v| share::short_id(v.id()) == *id).cloned())
        .collect()
}
