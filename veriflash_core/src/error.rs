//! Error types for the veriflash_core library.

use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for veriflash_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Catalog validation error
    #[error("Catalog validation error: {0}")]
    CatalogValidation(String),

    /// No category matches the given id or title
    #[error("Unknown category: {0}")]
    UnknownCategory(String),

    /// No word in the category matches the given id or text
    #[error("Unknown word '{word}' in category '{category}'")]
    UnknownWord { category: String, word: String },

    /// Imported backup is not a catalog
    #[error("Import error: {0}")]
    Import(String),
}
