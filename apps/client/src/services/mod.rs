//! Collaborators the game needs from the host: a deck source and a result sink.

pub mod api;
pub mod memory;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use matching_core::{Flashcard, GameResult};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SaveGameError};

/// Supplies the flashcards of a deck.
#[async_trait]
pub trait DeckSource: Send + Sync {
    /// Fetch every flashcard of a deck.
    ///
    /// Fails with `GameError::DeckNotFound` for an unknown deck.
    async fn get_flashcards(&self, deck_id: i64) -> Result<Vec<Flashcard>>;
}

/// Records finished games.
#[async_trait]
pub trait GameResultSink: Send + Sync {
    async fn save_game(&self, result: &GameResult) -> std::result::Result<(), SaveGameError>;
}

/// A stored game as returned by the history endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameRecord {
    pub id: i64,
    pub deck_id: i64,
    #[serde(rename = "completionTimeInSeconds")]
    pub completion_time_seconds: Option<u64>,
    pub total_pairs: u32,
    pub total_attempts: u32,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
}
