//! In-process collaborators for offline play and tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use matching_core::{Flashcard, GameError, GameResult};

use super::{DeckSource, GameResultSink};
use crate::error::{ClientError, Result, SaveGameError};

/// Decks held in memory, keyed by id.
#[derive(Debug, Default)]
pub struct InMemoryDeckSource {
    decks: HashMap<i64, Vec<Flashcard>>,
}

impl InMemoryDeckSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_deck(mut self, deck_id: i64, cards: Vec<Flashcard>) -> Self {
        self.decks.insert(deck_id, cards);
        self
    }
}

#[async_trait]
impl DeckSource for InMemoryDeckSource {
    async fn get_flashcards(&self, deck_id: i64) -> Result<Vec<Flashcard>> {
        let cards = self
            .decks
            .get(&deck_id)
            .ok_or(GameError::DeckNotFound { deck_id })?;
        if cards.is_empty() {
            return Err(GameError::EmptyDeck.into());
        }
        Ok(cards.clone())
    }
}

/// Sink that keeps every saved result, optionally failing each save.
#[derive(Debug, Default)]
pub struct RecordingSink {
    saved: Mutex<Vec<GameResult>>,
    fail_with: Option<String>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// A sink whose saves always fail with a network error.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            saved: Mutex::new(Vec::new()),
            fail_with: Some(message.into()),
        }
    }

    pub fn saved(&self) -> Vec<GameResult> {
        self.saved.lock().expect("sink lock").clone()
    }
}

#[async_trait]
impl GameResultSink for RecordingSink {
    async fn save_game(&self, result: &GameResult) -> std::result::Result<(), SaveGameError> {
        if let Some(message) = &self.fail_with {
            return Err(SaveGameError {
                deck_id: result.deck_id,
                source: ClientError::Network(message.clone()),
            });
        }
        self.saved.lock().expect("sink lock").push(result.clone());
        Ok(())
    }
}
