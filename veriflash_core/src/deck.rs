//! Deck building and mastery tracking.
//!
//! A deck is the flat, weighted list of quizzable items derived from a
//! catalog. It is read-only once built; session progress lives entirely in
//! a [`MasterySet`] of retired item keys.

use crate::types::{Catalog, Category, DeckItem, ItemKey};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Immutable, weighted collection of deck items for one session
#[derive(Clone, Debug, Default)]
pub struct Deck {
    items: Vec<DeckItem>,
    index: HashMap<ItemKey, usize>,
}

impl Deck {
    /// Build a deck from the catalog
    ///
    /// Categories without words are skipped. Every word of a category with
    /// `n` words weighs `1 / n`, so each category contributes a total mass
    /// of 1 regardless of its size.
    ///
    /// Item keys are unique within a deck. A category or word whose id was
    /// already taken (e.g. from a hand-edited import) keeps its place in the
    /// deck under a suffixed id, and a warning is logged.
    pub fn build(catalog: &Catalog) -> Self {
        let mut items = Vec::new();
        let mut category_ids = HashSet::new();

        for category in catalog.categories.iter().filter(|c| !c.words.is_empty()) {
            let weight = 1.0 / category.words.len() as f64;
            let shared: Arc<Category> = Arc::new(category.clone());
            let category_id = unique_id(&mut category_ids, &category.id);
            if category_id != category.id {
                tracing::warn!(
                    "Duplicate category id '{}' ('{}'), quizzing it as '{}'",
                    category.id,
                    category.title,
                    category_id
                );
            }

            let mut word_ids = HashSet::new();
            for word in &category.words {
                let word_id = unique_id(&mut word_ids, &word.id);
                if word_id != word.id {
                    tracing::warn!(
                        "Duplicate word id '{}' ('{}') in category '{}', quizzing it as '{}'",
                        word.id,
                        word.text,
                        category.title,
                        word_id
                    );
                }

                items.push(DeckItem {
                    key: ItemKey::new(category_id.clone(), word_id),
                    word: word.clone(),
                    category: Arc::clone(&shared),
                    weight,
                });
            }
        }

        let index = items
            .iter()
            .enumerate()
            .map(|(i, item)| (item.key.clone(), i))
            .collect();

        tracing::debug!("Built deck with {} items", items.len());
        Self { items, index }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[DeckItem] {
        &self.items
    }

    pub fn get(&self, key: &ItemKey) -> Option<&DeckItem> {
        self.index.get(key).map(|&i| &self.items[i])
    }

    /// Items not yet retired, in deck order
    pub fn live<'a>(&'a self, mastered: &MasterySet) -> Vec<&'a DeckItem> {
        self.items
            .iter()
            .filter(|item| !mastered.contains(&item.key))
            .collect()
    }

    /// Keys of every item belonging to `category_id`
    pub fn category_keys<'a>(&'a self, category_id: &'a str) -> impl Iterator<Item = &'a ItemKey> {
        self.items
            .iter()
            .filter(move |item| item.key.category_id == category_id)
            .map(|item| &item.key)
    }
}

/// Claim `id` in `taken`, suffixing `#2`, `#3`, ... until it is free
fn unique_id(taken: &mut HashSet<String>, id: &str) -> String {
    let mut candidate = id.to_string();
    let mut n = 2;
    while !taken.insert(candidate.clone()) {
        candidate = format!("{}#{}", id, n);
        n += 1;
    }
    candidate
}

/// Item keys retired for the rest of a binary-quiz session
///
/// Grows monotonically until cleared by a restart.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MasterySet {
    keys: HashSet<ItemKey>,
}

impl MasterySet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn retire(&mut self, key: ItemKey) -> bool {
        self.keys.insert(key)
    }

    pub fn contains(&self, key: &ItemKey) -> bool {
        self.keys.contains(key)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn clear(&mut self) {
        self.keys.clear();
    }
}
