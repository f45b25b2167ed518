//! Core domain types for VeriFlash.
//!
//! This module defines the fundamental types used throughout the system:
//! - Categories and their candidate words (the editable catalog)
//! - Deck items and their keys
//! - Session statistics and judgements

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

// ============================================================================
// Catalog Types
// ============================================================================

/// A candidate answer inside a category
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Word {
    /// Unique within the owning category. Empty until ids are assigned.
    #[serde(default)]
    pub id: String,
    pub text: String,
    #[serde(rename = "isRight", default)]
    pub is_correct: bool,
}

impl Word {
    pub fn new(id: impl Into<String>, text: impl Into<String>, is_correct: bool) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            is_correct,
        }
    }
}

/// A quiz category ("column") with its ordered candidate words
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Category {
    #[serde(default)]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub words: Vec<Word>,
}

impl Category {
    pub fn new(id: impl Into<String>, title: impl Into<String>, words: Vec<Word>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            words,
        }
    }

    /// Words flagged as the right answer (normally exactly one)
    pub fn correct_words(&self) -> impl Iterator<Item = &Word> {
        self.words.iter().filter(|w| w.is_correct)
    }

    /// Words not flagged as the right answer
    pub fn distractors(&self) -> impl Iterator<Item = &Word> {
        self.words.iter().filter(|w| !w.is_correct)
    }

    /// Text of the first correct word, used for feedback display
    pub fn answer(&self) -> Option<&str> {
        self.correct_words().next().map(|w| w.text.as_str())
    }

    pub fn word(&self, word_id: &str) -> Option<&Word> {
        self.words.iter().find(|w| w.id == word_id)
    }
}

/// The complete, ordered set of categories
///
/// Serialized as a bare JSON array to stay compatible with exported backups.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct Catalog {
    pub categories: Vec<Category>,
}

impl Catalog {
    pub fn new(categories: Vec<Category>) -> Self {
        Self { categories }
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

// ============================================================================
// Deck Types
// ============================================================================

/// Identity of a deck item: (category id, word id)
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemKey {
    pub category_id: String,
    pub word_id: String,
}

impl ItemKey {
    pub fn new(category_id: impl Into<String>, word_id: impl Into<String>) -> Self {
        Self {
            category_id: category_id.into(),
            word_id: word_id.into(),
        }
    }
}

impl fmt::Display for ItemKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.category_id, self.word_id)
    }
}

/// One quizzable word-in-category pairing with its session weight
///
/// Built by the deck builder and never mutated afterwards. The owning
/// category is shared between all items built from it.
#[derive(Clone, Debug)]
pub struct DeckItem {
    pub key: ItemKey,
    pub word: Word,
    pub category: Arc<Category>,
    pub weight: f64,
}

impl DeckItem {
    /// Whether this item shows the category's right answer
    pub fn is_correct(&self) -> bool {
        self.word.is_correct
    }
}

// ============================================================================
// Session Types
// ============================================================================

/// Outcome of judging a single guess
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Judgement {
    Correct,
    Incorrect,
}

/// Running score for a binary-quiz session
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStats {
    pub correct: u32,
    pub total: u32,
    /// Consecutive correct guesses
    pub streak: u32,
}

impl SessionStats {
    pub fn record(&mut self, judgement: Judgement) {
        self.total += 1;
        match judgement {
            Judgement::Correct => {
                self.correct += 1;
                self.streak += 1;
            }
            Judgement::Incorrect => self.streak = 0,
        }
    }

    /// Score as a rounded percentage, 0 before any guess
    pub fn percentage(&self) -> u32 {
        if self.total == 0 {
            return 0;
        }
        ((f64::from(self.correct) / f64::from(self.total)) * 100.0).round() as u32
    }
}
