//! Matching game engine shared by every host of the flashcard client.
//!
//! Provides:
//! - Tile pair construction and Fisher-Yates shuffling
//! - The turn-based selection/match state machine (`GameSession`)
//! - Completion statistics and the save-game payload
//! - A render-agnostic view of each tile

pub mod board;
pub mod error;
pub mod session;
pub mod stats;
pub mod types;

pub use board::{build_tiles, shuffle_tiles, validate_flashcards};
pub use error::{GameError, Result};
pub use session::GameSession;
pub use stats::{format_clock, GameProgress, GameResult, GameStats};
pub use types::{Flashcard, RejectReason, SelectionOutcome, Tile, TileRole, TileView};
