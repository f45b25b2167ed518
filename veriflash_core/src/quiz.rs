//! Binary-quiz session: "is this the right answer for its category?"
//!
//! ## Mastery policy
//!
//! After each judged guess, `advance` decides what to retire:
//!
//! 1. **Incorrect judgement**: nothing is retired; the item stays live and
//!    may be drawn again.
//! 2. **Correct judgement on the category's answer**: every item of that
//!    category is retired.
//! 3. **Correct judgement on a distractor**: only that item is retired.
//!
//! The next item is drawn in the same call, from the deck minus the
//! retired keys. The session finishes once every key is retired.
//!
//! A category with no flagged answer can only lose items one by one. A
//! category with several flagged answers is retired as soon as any of them
//! is judged correctly.

use crate::deck::{Deck, MasterySet};
use crate::sampler;
use crate::types::{DeckItem, ItemKey, Judgement, SessionStats};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

/// Session state
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QuizState {
    Playing,
    Feedback,
    Finished,
}

/// The item currently on screen
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CurrentCard {
    pub category_title: String,
    pub word_text: String,
}

/// Snapshot of the session for the presentation layer
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct QuizView {
    pub state: QuizState,
    pub current: Option<CurrentCard>,
    pub last_judgement: Option<Judgement>,
    /// The category's right answer, revealed while in feedback
    pub answer: Option<String>,
    pub stats: SessionStats,
    pub remaining: usize,
    pub deck_size: usize,
}

/// Weighted, without-replacement quiz over one deck
#[derive(Debug)]
pub struct BinaryQuizSession<R = StdRng> {
    deck: Deck,
    mastered: MasterySet,
    stats: SessionStats,
    state: QuizState,
    current: Option<ItemKey>,
    last_judgement: Option<Judgement>,
    rng: R,
}

impl BinaryQuizSession<StdRng> {
    /// Start a session drawing from OS entropy, or from `seed` when given
    pub fn start(deck: Deck, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(deck, rng)
    }
}

impl<R: Rng> BinaryQuizSession<R> {
    /// Start a session with an injected random source
    pub fn with_rng(deck: Deck, rng: R) -> Self {
        let mut session = Self {
            deck,
            mastered: MasterySet::new(),
            stats: SessionStats::default(),
            state: QuizState::Playing,
            current: None,
            last_judgement: None,
            rng,
        };
        session.draw_next();
        session
    }

    pub fn state(&self) -> QuizState {
        self.state
    }

    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn mastered(&self) -> &MasterySet {
        &self.mastered
    }

    pub fn last_judgement(&self) -> Option<Judgement> {
        self.last_judgement
    }

    pub fn current_item(&self) -> Option<&DeckItem> {
        self.current.as_ref().and_then(|key| self.deck.get(key))
    }

    /// Items left to master
    pub fn remaining(&self) -> usize {
        self.deck.len() - self.mastered.len()
    }

    pub fn is_finished(&self) -> bool {
        self.state == QuizState::Finished
    }

    /// Judge the user's claim that the current word is (or is not) the answer
    ///
    /// Ignored unless a card is being shown. Returns the judgement when the
    /// guess was accepted.
    pub fn guess(&mut self, user_says_correct: bool) -> Option<Judgement> {
        if self.state != QuizState::Playing {
            return None;
        }
        let actual = self.current_item()?.is_correct();

        let judgement = if user_says_correct == actual {
            Judgement::Correct
        } else {
            Judgement::Incorrect
        };

        self.stats.record(judgement);
        self.last_judgement = Some(judgement);
        self.state = QuizState::Feedback;

        tracing::debug!(
            "Guess on {:?}: {:?} (stats {:?})",
            self.current,
            judgement,
            self.stats
        );
        Some(judgement)
    }

    /// Apply the mastery update for the last judgement and draw the next card
    ///
    /// Ignored unless in feedback. Returns the resulting state.
    pub fn advance(&mut self) -> QuizState {
        if self.state != QuizState::Feedback {
            return self.state;
        }

        if self.last_judgement == Some(Judgement::Correct) {
            if let Some(item) = self.current_item() {
                let retired: Vec<ItemKey> = if item.is_correct() {
                    self.deck.category_keys(&item.key.category_id).cloned().collect()
                } else {
                    vec![item.key.clone()]
                };
                tracing::debug!("Retiring {} item(s)", retired.len());
                for key in retired {
                    self.mastered.retire(key);
                }
            }
        }

        self.last_judgement = None;
        self.current = None;
        self.draw_next();
        self.state
    }

    /// Forget all progress and start over on the same deck
    pub fn restart(&mut self) {
        tracing::debug!("Restarting quiz session");
        self.mastered.clear();
        self.stats = SessionStats::default();
        self.last_judgement = None;
        self.current = None;
        self.state = QuizState::Playing;
        self.draw_next();
    }

    /// Draw from the live deck, or finish when nothing is left
    fn draw_next(&mut self) {
        let live = self.deck.live(&self.mastered);
        match sampler::select(&live, &mut self.rng) {
            Some(item) => {
                tracing::debug!("Drew {} ({} live)", item.key, live.len());
                self.current = Some(item.key.clone());
                self.state = QuizState::Playing;
            }
            None => {
                tracing::debug!("Deck exhausted, session finished");
                self.current = None;
                self.state = QuizState::Finished;
            }
        }
    }

    pub fn view(&self) -> QuizView {
        let item = self.current_item();
        let answer = match (self.state, item) {
            (QuizState::Feedback, Some(item)) => item.category.answer().map(str::to_string),
            _ => None,
        };

        QuizView {
            state: self.state,
            current: item.map(|item| CurrentCard {
                category_title: item.category.title.clone(),
                word_text: item.word.text.clone(),
            }),
            last_judgement: self.last_judgement,
            answer,
            stats: self.stats,
            remaining: self.remaining(),
            deck_size: self.deck.len(),
        }
    }
}
