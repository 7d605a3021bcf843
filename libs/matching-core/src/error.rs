//! Error types for matching-core.

use thiserror::Error;

/// Result type alias using GameError.
pub type Result<T> = std::result::Result<T, GameError>;

/// Errors that prevent a game session from starting.
///
/// Turn-level problems are never errors; they surface as
/// [`SelectionOutcome::Rejected`](crate::SelectionOutcome::Rejected).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("deck has no flashcards")]
    EmptyDeck,

    #[error("deck {deck_id} not found")]
    DeckNotFound { deck_id: i64 },

    #[error("invalid deck data: {0}")]
    InvalidDeckData(String),

    #[error("invalid session snapshot: {0}")]
    InvalidSnapshot(String),
}
