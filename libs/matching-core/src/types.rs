//! Core types for the matching game.

use serde::{Deserialize, Serialize};

use crate::stats::GameStats;

/// Placeholder shown on a face-down tile.
pub const HIDDEN_CONTENT: &str = "?";

/// A question/answer pair supplied by the deck source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flashcard {
    pub id: i64,
    pub question: String,
    pub answer: String,
}

impl Flashcard {
    pub fn new(id: i64, question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            id,
            question: question.into(),
            answer: answer.into(),
        }
    }
}

/// Which side of a flashcard a tile shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TileRole {
    Question,
    Answer,
}

impl TileRole {
    /// Prefix used when deriving tile ids.
    pub fn prefix(self) -> &'static str {
        match self {
            Self::Question => "q",
            Self::Answer => "a",
        }
    }

    /// Derive the tile id for a flashcard, e.g. `q_12` or `a_12`.
    pub fn tile_id(self, flashcard_id: i64) -> String {
        format!("{}_{}", self.prefix(), flashcard_id)
    }
}

/// One face of a flashcard laid out on the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tile {
    pub id: String,
    pub role: TileRole,
    pub content: String,
    pub flashcard_id: i64,
}

impl Tile {
    pub fn question(card: &Flashcard) -> Self {
        Self {
            id: TileRole::Question.tile_id(card.id),
            role: TileRole::Question,
            content: card.question.clone(),
            flashcard_id: card.id,
        }
    }

    pub fn answer(card: &Flashcard) -> Self {
        Self {
            id: TileRole::Answer.tile_id(card.id),
            role: TileRole::Answer,
            content: card.answer.clone(),
            flashcard_id: card.id,
        }
    }

    /// Id of the other face of this tile's flashcard.
    pub fn role_partner_id(&self) -> String {
        let role = match self.role {
            TileRole::Question => TileRole::Answer,
            TileRole::Answer => TileRole::Question,
        };
        role.tile_id(self.flashcard_id)
    }

    /// A question only pairs with the answer of its own flashcard.
    pub fn pairs_with(&self, other: &Tile) -> bool {
        self.flashcard_id == other.flashcard_id && self.role != other.role
    }
}

/// What a renderer needs to draw one tile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TileView {
    pub id: String,
    pub display_content: String,
    pub is_selected: bool,
    pub is_matched: bool,
}

/// Why a selection was ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    GameCompleted,
    AlreadyMatched,
    AlreadySelected,
    SelectionFull,
    UnknownTile,
}

/// Result of a single `select_tile` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SelectionOutcome {
    Rejected { reason: RejectReason },
    FirstPick,
    Matched,
    NotMatched,
    Completed { stats: GameStats },
}

impl SelectionOutcome {
    pub fn is_rejected(&self) -> bool {
        matches!(self, Self::Rejected { .. })
    }

    /// Whether this outcome consumed an attempt.
    pub fn is_evaluation(&self) -> bool {
        matches!(
            self,
            Self::Matched | Self::NotMatched | Self::Completed { .. }
        )
    }
}
