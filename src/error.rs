//! Error types for Tafel.
//!
//! All fallible operations in the crate return [`Result`], built on one
//! crate-wide [`TafelError`] enum. Error chains are preserved with
//! `#[source]` attributes so backend diagnostics survive the trip through
//! the orchestration layer.
//!
//! # Error Handling Philosophy
//!
//! **Fatal before the batch starts:**
//! - `InvalidRange` - malformed page selection, surfaced before any extraction
//! - `Validation` - invalid configuration
//! - `Io` - file system errors (always bubble up unchanged)
//!
//! **Recovered per unit:**
//! - `Backend` - one page's extraction failed; the batch orchestrator turns
//!   it into a `Failure` outcome and continues with the remaining units
//!
//! **Not expected to occur:**
//! - `Serialization` - rendering a well-formed report is total; cells that
//!   need escaping are escaped, never rejected

use crate::types::ExtractionMethod;
use thiserror::Error;

/// Result type alias using `TafelError`.
pub type Result<T> = std::result::Result<T, TafelError>;

/// Main error type for all Tafel operations.
#[derive(Debug, Error)]
pub enum TafelError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed page-selection expression. Fatal; raised before any
    /// extraction work begins.
    #[error("Invalid page range: {message}")]
    InvalidRange { message: String },

    /// One unit's extraction failed inside an external capability. Recovered
    /// at the unit level by the batch orchestrator.
    #[error("{method} extraction failed on page {page}: {message}")]
    Backend {
        method: ExtractionMethod,
        page: usize,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Serialization error: {message}")]
    Serialization {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("{0}")]
    Other(String),
}

impl From<serde_json::Error> for TafelError {
    fn from(err: serde_json::Error) -> Self {
        TafelError::Serialization {
            message: err.to_string(),
            source: Some(Box::new(err)),
        }
    }
}

impl TafelError {
    /// Create an `InvalidRange` error.
    pub fn invalid_range<S: Into<String>>(message: S) -> Self {
        Self::InvalidRange {
            message: message.into(),
        }
    }

    /// Create a `Backend` error without an underlying cause.
    pub fn backend<S: Into<String>>(method: ExtractionMethod, page: usize, message: S) -> Self {
        Self::Backend {
            method,
            page,
            message: message.into(),
            source: None,
        }
    }

    /// Create a `Backend` error with the original cause attached.
    pub fn backend_with_source<S, E>(method: ExtractionMethod, page: usize, message: S, source: E) -> Self
    where
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Backend {
            method,
            page,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a `Serialization` error.
    pub fn serialization<S: Into<String>>(message: S) -> Self {
        Self::Serialization {
            message: message.into(),
            source: None,
        }
    }

    /// Create a `Validation` error.
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }
}
