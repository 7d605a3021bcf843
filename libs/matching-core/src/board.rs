//! Board construction: flashcards to tiles, then a uniform shuffle.

use std::collections::HashSet;

use rand::Rng;

use crate::error::{GameError, Result};
use crate::types::{Flashcard, Tile};

/// Check that a deck can be laid out as a board.
///
/// Rejects empty decks, blank questions or answers, and duplicate ids
/// (which would produce colliding tile ids).
pub fn validate_flashcards(flashcards: &[Flashcard]) -> Result<()> {
    if flashcards.is_empty() {
        return Err(GameError::EmptyDeck);
    }

    let mut seen_ids = HashSet::with_capacity(flashcards.len());
    for card in flashcards {
        if card.question.trim().is_empty() {
            return Err(GameError::InvalidDeckData(format!(
                "flashcard {} has an empty question",
                card.id
            )));
        }
        if card.answer.trim().is_empty() {
            return Err(GameError::InvalidDeckData(format!(
                "flashcard {} has an empty answer",
                card.id
            )));
        }
        if !seen_ids.insert(card.id) {
            return Err(GameError::InvalidDeckData(format!(
                "duplicate flashcard id {}",
                card.id
            )));
        }
    }

    Ok(())
}

/// Build one question tile and one answer tile per flashcard, in deck order.
pub fn build_tiles(flashcards: &[Flashcard]) -> Vec<Tile> {
    flashcards
        .iter()
        .flat_map(|card| [Tile::question(card), Tile::answer(card)])
        .collect()
}

/// Fisher-Yates shuffle: walk from the last index down to 1 and swap each
/// position with a uniformly chosen index in `0..=i`.
pub fn shuffle_tiles<R: Rng + ?Sized>(tiles: &mut [Tile], rng: &mut R) {
    for i in (1..tiles.len()).rev() {
        let j = rng.gen_range(0..=i);
        tiles.swap(i, j);
    }
}
