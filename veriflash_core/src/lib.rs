#![forbid(unsafe_code)]

//! Core domain model and session engine for VeriFlash.
//!
//! This crate provides:
//! - Domain types (categories, words, deck items, stats)
//! - Catalog editing and validation
//! - Weighted deck building and sampling
//! - Binary-quiz and free-recall sessions
//! - Persistence (catalog store, backups) and configuration

pub mod types;
pub mod error;
pub mod catalog;
pub mod config;
pub mod logging;
pub mod deck;
pub mod sampler;
pub mod quiz;
pub mod recall;
pub mod store;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use catalog::{build_default_catalog, get_default_catalog};
pub use config::Config;
pub use deck::{Deck, MasterySet};
pub use quiz::{BinaryQuizSession, CurrentCard, QuizState, QuizView};
pub use recall::{recallable_categories, RecallOutcome, RecallSession};
pub use store::{
    export_catalog, import_catalog, load_catalog, load_catalog_strict, save_catalog,
    update_catalog,
};
