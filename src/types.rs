use serde::{Deserialize, Serialize};

/// Opaque ID type for verse identity
pub type VerseId = String;

/// Sentinel value used in the source data for verses without an assigned number
pub const UNNUMBERED: &str = "-1";

/// A four-line verse: three lines shown to the player, the fourth to guess
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Verse {
    #[serde(default)]
    pub number: String,
    pub lines: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attribution: Option<String>,
}

impl Verse {
    /// Stable identifier: the assigned number, or the first line for
    /// unnumbered verses. Must not change across loads of the same data.
    pub fn id(&self) -> &str {
        if !self.number.is_empty() && self.number != UNNUMBERED {
            &self.number
        } else {
            self.lines.first().map(String::as_str).unwrap_or("")
        }
    }

    /// The three lines shown to the player
    pub fn shown_lines(&self) -> &[String] {
        if self.lines.len() > 3 {
            &self.lines[..3]
        } else {
            &self.lines
        }
    }

    /// The hidden fourth line the player has to guess
    pub fn target_line(&self) -> &str {
        self.lines.get(3).map(String::as_str).unwrap_or("")
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GamePhase {
    Idle,
    Playing,
    Finished,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    pub questions_per_round: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            questions_per_round: 10,
        }
    }
}

/// The in-memory record of a round in progress
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameSession {
    pub phase: GamePhase,
    pub round: Vec<Verse>,
    pub current_index: usize,
    pub answers: Vec<bool>,
}

impl GameSession {
    pub fn idle() -> Self {
        Self {
            phase: GamePhase::Idle,
            round: Vec::new(),
            current_index: 0,
            answers: Vec::new(),
        }
    }

    /// The verse the current question is about (None outside an active round)
    pub fn current_verse(&self) -> Option<&Verse> {
        if self.phase == GamePhase::Playing {
            self.round.get(self.current_index)
        } else {
            None
        }
    }

    /// Number of correctly answered questions so far
    pub fn score(&self) -> usize {
        self.answers.iter().filter(|a| **a).count()
    }
}

impl Default for GameSession {
    fn default() -> Self {
        Self::idle()
    }
}
