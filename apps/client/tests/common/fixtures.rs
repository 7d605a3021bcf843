//! Test fixtures and factory functions for creating test data.

use serde_json::{json, Value};

/// Deck JSON in the shape the API serves, with `num_cards` flashcards.
pub fn deck_json(deck_id: i64, num_cards: i64) -> Value {
    let cards: Vec<Value> = (1..=num_cards)
        .map(|i| {
            json!({
                "id": deck_id * 100 + i,
                "question": format!("Question {}?", i),
                "answer": format!("Answer {}.", i),
            })
        })
        .collect();

    json!({
        "id": deck_id,
        "name": format!("Deck {}", deck_id),
        "isPublic": false,
        "flashCards": cards,
    })
}

/// A stored game record as returned by the history endpoints.
pub fn game_record(id: i64, deck_id: i64, seconds: u64, pairs: u32, attempts: u32) -> Value {
    json!({
        "id": id,
        "deckId": deck_id,
        "completionTimeInSeconds": seconds,
        "totalPairs": pairs,
        "totalAttempts": attempts,
        "createdAt": "2024-05-01T10:15:30",
    })
}
