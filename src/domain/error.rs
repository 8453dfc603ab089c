//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent invalid input to the domain model.
/// The grouping passes themselves never fail; they skip what they cannot place.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("invalid navigation date: {value}")]
    InvalidNavDate { value: String },

    #[error("invalid leaf label format: {0}")]
    InvalidLabelFormat(String),

    #[error("unknown sort type: {0} (expected 'none' or 'date')")]
    UnknownSortType(String),
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
