//! Server configuration from environment variables.

use std::path::PathBuf;

use crate::types::GameConfig;
use crate::verses::VerseSource;

const DEFAULT_PORT: u16 = 8017;
const DEFAULT_VERSES_PATH: &str = "static/verses.json";
const DEFAULT_DATA_DIR: &str = "data";

/// Runtime configuration, loaded once at startup
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    /// Where the verse list is fetched from (URL wins when both are set)
    pub verse_source: VerseSource,
    /// Directory for the file-backed storage port
    pub data_dir: PathBuf,
    pub game: GameConfig,
}

/// Read an env var, treating unset/blank as absent
fn env_trimmed(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

impl ServerConfig {
    /// Load config from POROSHKI_* environment variables with logged fallbacks
    pub fn from_env() -> Self {
        let port = match env_trimmed("POROSHKI_PORT") {
            Some(raw) => match raw.parse() {
                Ok(port) => port,
                Err(_) => {
                    tracing::warn!("Invalid POROSHKI_PORT '{}', using {}", raw, DEFAULT_PORT);
                    DEFAULT_PORT
                }
            },
            None => DEFAULT_PORT,
        };

        let verse_source = if let Some(url) = env_trimmed("POROSHKI_VERSES_URL") {
            VerseSource::Url(url)
        } else {
            let path = env_trimmed("POROSHKI_VERSES_PATH")
                .unwrap_or_else(|| DEFAULT_VERSES_PATH.to_string());
            VerseSource::Path(PathBuf::from(path))
        };

        let data_dir = PathBuf::from(
            env_trimmed("POROSHKI_DATA_DIR").unwrap_or_else(|| DEFAULT_DATA_DIR.to_string()),
        );

        let default_count = GameConfig::default().questions_per_round;
        let questions_per_round = match env_trimmed("POROSHKI_QUESTIONS_PER_ROUND") {
            Some(raw) => match raw.parse::<usize>() {
                Ok(n) if n > 0 => n,
                _ => {
                    tracing::warn!(
                        "Invalid POROSHKI_QUESTIONS_PER_ROUND '{}', using {}",
                        raw,
                        default_count
                    );
                    default_count
                }
            },
            None => default_count,
        };

        Self {
            port,
            verse_source,
            data_dir,
            game: GameConfig {
                questions_per_round,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_env() {
        for key in [
            "POROSHKI_PORT",
            "POROSHKI_VERSES_URL",
            "POROSHKI_VERSES_PATH",
            "POROSHKI_DATA_DIR",
            "POROSHKI_QUESTIONS_PER_ROUND",
        ] {
            std::env::remove_var(key);
        }
    }

    #[test]
    #[serial]
    fn test_defaults() {
        clear_env();
        let config = ServerConfig::from_env();

        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.game.questions_per_round, 10);
        assert_eq!(config.data_dir, PathBuf::from(DEFAULT_DATA_DIR));
        assert!(matches!(
            config.verse_source,
            VerseSource::Path(ref p) if p == &PathBuf::from(DEFAULT_VERSES_PATH)
        ));
    }

    #[test]
    #[serial]
    fn test_url_wins_over_path() {
        clear_env();
        std::env::set_var("POROSHKI_VERSES_URL", "https://example.com/verses.json");
        std::env::set_var("POROSHKI_VERSES_PATH", "somewhere/else.json");

        let config = ServerConfig::from_env();
        assert!(matches!(
            config.verse_source,
            VerseSource::Url(ref u) if u == "https://example.com/verses.json"
        ));
        clear_env();
    }

    #[test]
    #[serial]
    fn test_invalid_values_fall_back() {
        clear_env();
        std::env::set_var("POROSHKI_PORT", "not-a-port");
        std::env::set_var("POROSHKI_QUESTIONS_PER_ROUND", "0");

        let config = ServerConfig::from_env();
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.game.questions_per_round, 10);
        clear_env();
    }

    #[test]
    #[serial]
    fn test_blank_values_are_absent() {
        clear_env();
        std::env::set_var("POROSHKI_VERSES_URL", "   ");

        let config = ServerConfig::from_env();
        assert!(matches!(config.verse_source, VerseSource::Path(_)));
        clear_env();
    }
}
