//! Free-recall session: type every right answer of one category.

use crate::types::{Catalog, Category};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::collections::HashSet;

/// Categories that can be recalled (at least one correct word)
pub fn recallable_categories(catalog: &Catalog) -> Vec<&Category> {
    catalog
        .categories
        .iter()
        .filter(|c| c.correct_words().next().is_some())
        .collect()
}

fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

/// Result of feeding the current input to the session
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RecallOutcome {
    /// Matched a correct word; its id was added to the found set
    Found(String),
    NoMatch,
}

/// Tracks which correct words of a category the user has produced
#[derive(Debug)]
pub struct RecallSession<R = StdRng> {
    category: Category,
    found: HashSet<String>,
    input: String,
    suggested: bool,
    rng: R,
}

impl RecallSession<StdRng> {
    pub fn start(category: Category, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(category, rng)
    }
}

impl<R: Rng> RecallSession<R> {
    pub fn with_rng(category: Category, rng: R) -> Self {
        tracing::debug!(
            "Recall session on '{}' ({} answers)",
            category.title,
            category.correct_words().count()
        );
        Self {
            category,
            found: HashSet::new(),
            input: String::new(),
            suggested: false,
            rng,
        }
    }

    pub fn category(&self) -> &Category {
        &self.category
    }

    /// Current input text
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Whether the input holds a hint rather than typed text
    pub fn is_suggestion(&self) -> bool {
        self.suggested
    }

    pub fn found(&self) -> &HashSet<String> {
        &self.found
    }

    /// Texts of found words, in category order
    pub fn found_words(&self) -> Vec<&str> {
        self.category
            .words
            .iter()
            .filter(|w| self.found.contains(&w.id))
            .map(|w| w.text.as_str())
            .collect()
    }

    pub fn answer_count(&self) -> usize {
        self.category.correct_words().count()
    }

    pub fn is_complete(&self) -> bool {
        self.found.len() == self.answer_count()
    }

    /// Replace the input and test it against the unfound answers
    ///
    /// Called on every input change. A match clears the input; anything
    /// else leaves it as typed.
    pub fn submit(&mut self, text: &str) -> RecallOutcome {
        self.input = text.to_string();
        self.suggested = false;

        let typed = normalize(text);
        let hit = self
            .category
            .correct_words()
            .find(|w| !self.found.contains(&w.id) && normalize(&w.text) == typed)
            .map(|w| w.id.clone());

        match hit {
            Some(id) => {
                tracing::debug!("Recalled word {}", id);
                self.found.insert(id.clone());
                self.input.clear();
                RecallOutcome::Found(id)
            }
            None => RecallOutcome::NoMatch,
        }
    }

    /// Put a random unfound distractor in the input as a suggestion
    ///
    /// The suggestion is never counted as found. Returns the suggested text,
    /// or `None` when no distractor is left.
    pub fn hint(&mut self) -> Option<&str> {
        let candidates: Vec<&str> = self
            .category
            .distractors()
            .filter(|w| !self.found.contains(&w.id))
            .map(|w| w.text.as_str())
            .collect();

        let text = candidates.choose(&mut self.rng)?.to_string();
        self.input = text;
        self.suggested = true;
        Some(&self.input)
    }
}
