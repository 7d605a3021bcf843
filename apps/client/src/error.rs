//! Error types for the matching client.

use matching_core::GameError;
use thiserror::Error;

/// Client errors.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Backend error: {status} - {message}")]
    Backend { status: u16, message: String },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Not authenticated - please log in again")]
    NotAuthenticated,

    #[error(transparent)]
    Game(#[from] GameError),
}

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// A finished game could not be recorded remotely.
#[derive(Debug, Error)]
#[error("failed to save game for deck {deck_id}: {source}")]
pub struct SaveGameError {
    pub deck_id: i64,
    #[source]
    pub source: ClientError,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_backend() {
        let error = ClientError::Backend {
            status: 500,
            message: "boom".to_string(),
        };
        assert_eq!(error.to_string(), "Backend error: 500 - boom");
    }

    #[test]
    fn test_error_display_game_is_transparent() {
        let error = ClientError::from(GameError::DeckNotFound { deck_id: 4 });
        assert_eq!(error.to_string(), "deck 4 not found");
    }

    #[test]
    fn test_save_error_display_includes_source() {
        let error = SaveGameError {
            deck_id: 9,
            source: ClientError::Network("connection refused".to_string()),
        };
        assert_eq!(
            error.to_string(),
            "failed to save game for deck 9: Network error: connection refused"
        );
    }
}
