//! Error types for cloze-core.

use thiserror::Error;

/// Result type alias using ContractError.
pub type Result<T> = std::result::Result<T, ContractError>;

/// Violations of the flashcard contract. These mean the item can't be graded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContractError {
    #[error("no acceptable answers")]
    NoAnswers,

    #[error("blank at part {part} has no acceptable answers")]
    EmptyBlank { part: usize },

    #[error("expected {expected} inputs, got {got}")]
    BlankCountMismatch { expected: usize, got: usize },
}
