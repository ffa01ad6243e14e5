//! Error types for schedule storage and operations.

use hours_engine::RuleError;
use std::fmt;
use thiserror::Error;

/// Errors surfaced by schedule operations.
///
/// Validation and not-found failures carry enough structure for a caller to
/// say what was wrong with the request. Storage failures do not: their
/// display form is a fixed generic message, and backend detail stays on the
/// error source chain for logs.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The submitted rule payload failed validation. Nothing was persisted.
    #[error("validation failed: {0}")]
    Rule(#[from] RuleError),

    /// A request field was missing or unusable.
    #[error("validation failed: {0}")]
    Validation(String),

    /// A referenced row does not exist. The operation was aborted.
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: String },

    /// Backend failure.
    #[error("internal storage error")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl StoreError {
    pub(crate) fn not_found(entity: &'static str, id: impl fmt::Display) -> Self {
        StoreError::NotFound {
            entity,
            id: id.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;
