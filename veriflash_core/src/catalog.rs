//! Default catalog and catalog editing.
//!
//! The editor keeps the "one correct word per category" rule by clearing
//! sibling flags; `validate` reports catalogs that break it anyway
//! (hand-edited or imported backups).

use crate::types::*;
use crate::{Error, Result};
use once_cell::sync::Lazy;
use std::collections::HashSet;
use uuid::Uuid;

/// Cached default catalog - built once and reused
static DEFAULT_CATALOG: Lazy<Catalog> = Lazy::new(build_default_catalog_internal);

/// Get a reference to the cached default catalog
pub fn get_default_catalog() -> &'static Catalog {
    &DEFAULT_CATALOG
}

/// Builds the default catalog shown on first launch
pub fn build_default_catalog() -> Catalog {
    get_default_catalog().clone()
}

fn build_default_catalog_internal() -> Catalog {
    Catalog::new(vec![
        Category::new(
            "col-1",
            "Capital of France",
            vec![
                Word::new("w-1", "Lyon", false),
                Word::new("w-2", "Paris", true),
                Word::new("w-3", "Marseille", false),
            ],
        ),
        Category::new(
            "col-2",
            "Fastest Land Animal",
            vec![
                Word::new("w-4", "Cheetah", true),
                Word::new("w-5", "Lion", false),
            ],
        ),
    ])
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

impl Catalog {
    /// Look up a category by id, falling back to a case-insensitive title match
    pub fn find_category(&self, id_or_title: &str) -> Option<&Category> {
        self.category_index(id_or_title)
            .ok()
            .map(|idx| &self.categories[idx])
    }

    fn category_index(&self, id_or_title: &str) -> Result<usize> {
        let wanted = id_or_title.trim().to_lowercase();
        self.categories
            .iter()
            .position(|c| c.id == id_or_title)
            .or_else(|| {
                self.categories
                    .iter()
                    .position(|c| c.title.trim().to_lowercase() == wanted)
            })
            .ok_or_else(|| Error::UnknownCategory(id_or_title.to_string()))
    }

    fn category_mut(&mut self, id_or_title: &str) -> Result<&mut Category> {
        let idx = self.category_index(id_or_title)?;
        Ok(&mut self.categories[idx])
    }

    /// Add a new category with two placeholder words, the first one correct
    ///
    /// Returns the id of the new category.
    pub fn add_category(&mut self, title: &str) -> String {
        let id = new_id();
        self.categories.push(Category::new(
            id.clone(),
            title,
            vec![
                Word::new(new_id(), "Option 1", true),
                Word::new(new_id(), "Option 2", false),
            ],
        ));
        tracing::debug!("Added category {} ({})", title, id);
        id
    }

    pub fn rename_category(&mut self, category: &str, title: &str) -> Result<()> {
        self.category_mut(category)?.title = title.to_string();
        Ok(())
    }

    /// Remove a category and all of its words
    pub fn remove_category(&mut self, category: &str) -> Result<Category> {
        let idx = self.category_index(category)?;
        let removed = self.categories.remove(idx);
        tracing::debug!("Removed category {}", removed.id);
        Ok(removed)
    }

    /// Append a non-correct word to a category, returning the word id
    pub fn add_word(&mut self, category: &str, text: &str) -> Result<String> {
        let id = new_id();
        self.category_mut(category)?
            .words
            .push(Word::new(id.clone(), text, false));
        Ok(id)
    }

    pub fn update_word_text(&mut self, category: &str, word: &str, text: &str) -> Result<()> {
        let cat = self.category_mut(category)?;
        let idx = word_index(cat, word)?;
        cat.words[idx].text = text.to_string();
        Ok(())
    }

    /// Mark `word` as the category's answer and clear the flag on all siblings
    pub fn set_correct_word(&mut self, category: &str, word: &str) -> Result<()> {
        let cat = self.category_mut(category)?;
        let idx = word_index(cat, word)?;
        for (i, w) in cat.words.iter_mut().enumerate() {
            w.is_correct = i == idx;
        }
        Ok(())
    }

    pub fn remove_word(&mut self, category: &str, word: &str) -> Result<Word> {
        let cat = self.category_mut(category)?;
        let idx = word_index(cat, word)?;
        Ok(cat.words.remove(idx))
    }

    /// Give a fresh uuid to every category or word with an empty id
    ///
    /// Returns the number of ids assigned.
    pub fn assign_missing_ids(&mut self) -> usize {
        let mut assigned = 0;
        for cat in &mut self.categories {
            if cat.id.trim().is_empty() {
                cat.id = new_id();
                assigned += 1;
            }
            for word in &mut cat.words {
                if word.id.trim().is_empty() {
                    word.id = new_id();
                    assigned += 1;
                }
            }
        }
        if assigned > 0 {
            tracing::info!("Assigned {} missing ids", assigned);
        }
        assigned
    }

    /// Validate the catalog for consistency
    ///
    /// Returns a list of validation errors, or empty Vec if valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        let mut seen_categories = HashSet::new();

        for cat in &self.categories {
            if cat.id.trim().is_empty() {
                errors.push(format!("Category '{}' has empty ID", cat.title));
            } else if !seen_categories.insert(cat.id.as_str()) {
                errors.push(format!("Duplicate category ID '{}'", cat.id));
            }
            if cat.title.trim().is_empty() {
                errors.push(format!("Category '{}' has empty title", cat.id));
            }
            if cat.words.is_empty() {
                errors.push(format!("Category '{}' has no words", cat.title));
                continue;
            }

            let mut seen_words = HashSet::new();
            for word in &cat.words {
                if word.id.trim().is_empty() {
                    errors.push(format!(
                        "Word '{}' in category '{}' has empty ID",
                        word.text, cat.title
                    ));
                } else if !seen_words.insert(word.id.as_str()) {
                    errors.push(format!(
                        "Duplicate word ID '{}' in category '{}'",
                        word.id, cat.title
                    ));
                }
            }

            match cat.correct_words().count() {
                0 => errors.push(format!("Category '{}' has no correct word", cat.title)),
                1 => {}
                n => errors.push(format!(
                    "Category '{}' has {} correct words",
                    cat.title, n
                )),
            }
        }

        errors
    }
}

/// Find a word by id, falling back to a case-insensitive text match
fn word_index(cat: &Category, word: &str) -> Result<usize> {
    let wanted = word.trim().to_lowercase();
    cat.words
        .iter()
        .position(|w| w.id == word)
        .or_else(|| {
            cat.words
                .iter()
                .position(|w| w.text.trim().to_lowercase() == wanted)
        })
        .ok_or_else(|| Error::UnknownWord {
            category: cat.title.clone(),
            word: word.to_string(),
        })
}
