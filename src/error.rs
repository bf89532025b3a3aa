// src/error.rs

use thiserror::Error;

/// Errors raised while building or reading the catalog.
///
/// Decoding a view and filtering it never fail; only the backing store does.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("failed to parse catalog seed: {0}")]
    SeedParse(#[from] serde_json::Error),

    /// A seed record that the closed enums accept but the catalog cannot hold.
    #[error("invalid seed record {id}: {reason}")]
    InvalidSeed { id: String, reason: String },

    /// A stored row carried a token outside its closed set.
    #[error("unrecognized {field} '{value}' in catalog row")]
    CorruptRow { field: &'static str, value: String },
}

pub type Result<T> = std::result::Result<T, CatalogError>;
