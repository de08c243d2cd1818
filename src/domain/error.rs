//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent invalid input records.
/// These are independent of infrastructure concerns.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("row {row}: missing required field '{field}'")]
    MissingField { row: usize, field: &'static str },

    #[error("row {row}: malformed CSV record: {message}")]
    MalformedRow { row: usize, message: String },
}
