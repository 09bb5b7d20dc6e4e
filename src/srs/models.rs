//! Data models for the scheduling engine

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Ease factor given to a card on its first rating
pub const DEFAULT_EASE_FACTOR: f64 = 2.5;

/// Per-card scheduling state for one study mode, keyed by word id
pub type CardStates = HashMap<String, CardState>;

/// A vocabulary entry supplied by the list it belongs to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VocabCard {
    pub id: String,
    /// The word itself
    pub primary: String,
    /// Readings, alternate spellings
    #[serde(default)]
    pub secondary: Vec<String>,
    #[serde(default)]
    pub translations: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
}

impl VocabCard {
    pub fn new(id: impl Into<String>, primary: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            primary: primary.into(),
            secondary: Vec::new(),
            translations: Vec::new(),
            level: None,
        }
    }

    pub fn with_translation(mut self, translation: impl Into<String>) -> Self {
        self.translations.push(translation.into());
        self
    }

    /// Text shown before the card is revealed
    pub fn prompt(&self, mode: StudyMode) -> String {
        match mode {
            StudyMode::Forward => self.primary.clone(),
            StudyMode::Reverse => self.translations.join("; "),
        }
    }

    /// Text shown once the card is revealed
    pub fn answer(&self, mode: StudyMode) -> String {
        let (head, tail) = match mode {
            StudyMode::Forward => (self.translations.join("; "), &self.secondary),
            StudyMode::Reverse => (self.primary.clone(), &self.secondary),
        };

        if tail.is_empty() {
            head
        } else {
            format!("{} ({})", head, tail.join(", "))
        }
    }
}

/// A named, ordered collection of cards
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VocabList {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub cards: Vec<VocabCard>,
}

/// Study direction. Each mode keeps an independent schedule over the same cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StudyMode {
    /// Word to translation (recognition)
    Forward,
    /// Translation to word (production)
    Reverse,
}

impl Default for StudyMode {
    fn default() -> Self {
        Self::Forward
    }
}

impl StudyMode {
    pub const ALL: [StudyMode; 2] = [StudyMode::Forward, StudyMode::Reverse];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Forward => "forward",
            Self::Reverse => "reverse",
        }
    }

    pub fn flipped(self) -> Self {
        match self {
            Self::Forward => Self::Reverse,
            Self::Reverse => Self::Forward,
        }
    }
}

impl fmt::Display for StudyMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug)]
#[error("Unknown study mode: {0} (expected forward or reverse)")]
pub struct InvalidMode(pub String);

impl FromStr for StudyMode {
    type Err = InvalidMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "forward" | "fwd" | "f" => Ok(Self::Forward),
            "reverse" | "rev" | "r" => Ok(Self::Reverse),
            _ => Err(InvalidMode(s.to_string())),
        }
    }
}

/// Recall rating on the three-point scale.
///
/// Values follow the 0-5 SM-2 quality scale:
/// - 1: Hard, not remembered (a lapse)
/// - 3: Good, remembered with effort
/// - 5: Easy, remembered without hesitation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Quality {
    Hard = 1,
    Good = 3,
    Easy = 5,
}

impl Quality {
    pub const ALL: [Quality; 3] = [Quality::Hard, Quality::Good, Quality::Easy];

    pub fn value(self) -> u8 {
        self as u8
    }

    /// Whether the rating counts as remembered
    pub fn is_pass(self) -> bool {
        self.value() >= 3
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Hard => "hard",
            Self::Good => "good",
            Self::Easy => "easy",
        }
    }
}

#[derive(Error, Debug)]
#[error("Invalid rating: {0} (expected 1/hard, 3/good or 5/easy)")]
pub struct InvalidQuality(pub String);

impl From<Quality> for u8 {
    fn from(quality: Quality) -> Self {
        quality.value()
    }
}

impl TryFrom<u8> for Quality {
    type Error = InvalidQuality;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Hard),
            3 => Ok(Self::Good),
            5 => Ok(Self::Easy),
            other => Err(InvalidQuality(other.to_string())),
        }
    }
}

impl FromStr for Quality {
    type Err = InvalidQuality;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "1" | "h" | "hard" => Ok(Self::Hard),
            "3" | "g" | "good" => Ok(Self::Good),
            "5" | "e" | "easy" => Ok(Self::Easy),
            _ => Err(InvalidQuality(s.to_string())),
        }
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Spaced repetition state for one card under one study mode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardState {
    /// Held as the map key when persisted
    #[serde(skip)]
    pub word_id: String,
    /// Current interval in days
    pub interval: u32,
    /// Consecutive successful reviews
    pub repetitions: u32,
    pub ease_factor: f64,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub next_review: DateTime<Utc>,
    #[serde(default)]
    pub last_quality: Option<Quality>,
}

impl CardState {
    /// State of a card that has never been rated
    pub fn new(word_id: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            word_id: word_id.into(),
            interval: 0,
            repetitions: 0,
            ease_factor: DEFAULT_EASE_FACTOR,
            next_review: now,
            last_quality: None,
        }
    }

    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.next_review <= now
    }

    /// Still inside the fixed onboarding intervals
    pub fn is_learning(&self) -> bool {
        self.repetitions < 2
    }
}

/// Ratings issued so far in a session, by category
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStats {
    pub hard: usize,
    pub good: usize,
    pub easy: usize,
}

impl SessionStats {
    pub fn record(&mut self, quality: Quality) {
        match quality {
            Quality::Hard => self.hard += 1,
            Quality::Good => self.good += 1,
            Quality::Easy => self.easy += 1,
        }
    }

    pub fn count(&self, quality: Quality) -> usize {
        match quality {
            Quality::Hard => self.hard,
            Quality::Good => self.good,
            Quality::Easy => self.easy,
        }
    }

    pub fn total(&self) -> usize {
        self.hard + self.good + self.easy
    }
}

/// Result of a finished session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub total_reviewed: usize,
    pub counts: SessionStats,
    /// Earliest upcoming review among cards rated this session
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_review: Option<DateTime<Utc>>,
}

/// Scheduling overview for a list under one mode
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewOverview {
    pub total_cards: usize,
    pub new_cards: usize,
    pub learning_cards: usize,
    pub review_cards: usize,
    pub due_cards: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_due: Option<DateTime<Utc>>,
}
