//! Error types for astral-content

use astral_core::CatalogError;
use thiserror::Error;

/// Content loading error type
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("RON parse error: {0}")]
    Ron(#[from] ron::error::SpannedError),

    #[error("Invalid catalog: {0}")]
    Catalog(#[from] CatalogError),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
