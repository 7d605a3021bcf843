//! Host-side client for the matching game.
//!
//! Connects the pure engine in `matching-core` to the flashcard REST API:
//! fetches decks, drives a session's timed behaviour (reveal delay, elapsed
//! timer) and reports finished games without blocking play.

pub mod config;
pub mod controller;
pub mod error;
pub mod services;
pub mod telemetry;
pub mod timer;

pub use config::ClientConfig;
pub use controller::GameController;
pub use error::{ClientError, Result, SaveGameError};
pub use services::api::ApiClient;
pub use services::memory::{InMemoryDeckSource, RecordingSink};
pub use services::{DeckSource, GameRecord, GameResultSink};
pub use timer::ElapsedTimer;
