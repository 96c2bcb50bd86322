//! Core types for cloze study sessions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{ContractError, Result};

/// An acceptable answer for a blank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    /// Text as it appears in the sentence.
    pub text: String,
    /// Normalized form of the word.
    pub normalized: String,
    /// Whether the word hasn't been reviewed before.
    #[serde(rename = "new", default)]
    pub is_new: bool,
    /// Frequency class of the word.
    #[serde(default)]
    pub difficulty: i64,
}

impl Answer {
    pub fn new(text: impl Into<String>, normalized: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            normalized: normalized.into(),
            is_new: false,
            difficulty: 0,
        }
    }

    /// Mark the answer as a word the learner hasn't seen yet.
    pub fn unseen(mut self) -> Self {
        self.is_new = true;
        self
    }
}

/// Part of a sentence. Parts with answers are blanks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Part {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answers: Option<Vec<Answer>>,
}

impl Part {
    /// Fixed text that isn't graded.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            answers: None,
        }
    }

    /// A blank. The first answer is the preferred one.
    pub fn blank(text: impl Into<String>, answers: Vec<Answer>) -> Self {
        Self {
            text: text.into(),
            answers: Some(answers),
        }
    }

    pub fn is_blank(&self) -> bool {
        self.answers.is_some()
    }

    /// Preferred answer of a blank.
    pub fn preferred(&self) -> Option<&Answer> {
        self.answers.as_ref().and_then(|answers| answers.first())
    }
}

/// Cloze sentence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sentence {
    pub id: i64,
    pub parts: Vec<Part>,
    #[serde(rename = "tatoebaID", default, skip_serializing_if = "Option::is_none")]
    pub tatoeba_id: Option<i64>,
}

/// Translation of a sentence in the learner's language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Translation {
    pub text: String,
    #[serde(rename = "tatoebaID", default, skip_serializing_if = "Option::is_none")]
    pub tatoeba_id: Option<i64>,
}

/// Flashcard served to the study loop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub sentence: Sentence,
    pub translation: Translation,
}

impl Item {
    /// Iterate over blank parts in sentence order.
    pub fn blanks(&self) -> impl Iterator<Item = &Part> {
        self.sentence.parts.iter().filter(|part| part.is_blank())
    }

    /// Normalized preferred answer of every blank.
    ///
    /// Blanks without answers are skipped; use [`Item::validate`] to reject them.
    pub fn dedup_keys(&self) -> Vec<&str> {
        self.blanks()
            .filter_map(Part::preferred)
            .map(|answer| answer.normalized.as_str())
            .collect()
    }

    /// Check that every blank has at least one acceptable answer.
    pub fn validate(&self) -> Result<()> {
        for (index, part) in self.sentence.parts.iter().enumerate() {
            if matches!(&part.answers, Some(answers) if answers.is_empty()) {
                return Err(ContractError::EmptyBlank { part: index });
            }
        }
        Ok(())
    }
}

/// Result of reviewing one word.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewOutcome {
    /// Normalized form of the reviewed word.
    pub word: String,
    pub correct: bool,
    /// Only used locally; the server already knows which words are new.
    #[serde(rename = "new", default, skip_serializing)]
    pub is_new: bool,
    #[serde(with = "chrono::serde::ts_seconds")]
    pub timestamp: DateTime<Utc>,
}

impl ReviewOutcome {
    pub fn new(
        word: impl Into<String>,
        correct: bool,
        is_new: bool,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            word: word.into(),
            correct,
            is_new,
            timestamp,
        }
    }
}

/// Grading status of a typed answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Correct,
    Almost,
    Incorrect,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Correct => "correct",
            Self::Almost => "almost",
            Self::Incorrect => "incorrect",
        }
    }
}
