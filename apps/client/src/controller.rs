//! Drives one matching game on behalf of a host screen.

use std::sync::Arc;
use std::time::Duration;

use matching_core::{GameProgress, GameResult, GameSession, GameStats, SelectionOutcome, TileView};
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::config::ClientConfig;
use crate::error::Result;
use crate::services::{DeckSource, GameResultSink};
use crate::timer::ElapsedTimer;

/// Owns a session plus the timed side effects around it.
///
/// Selections are applied synchronously. Completing the game starts the
/// result upload in the background; its outcome is only logged and never
/// changes the session.
pub struct GameController {
    deck_id: i64,
    session: GameSession,
    sink: Arc<dyn GameResultSink>,
    reveal_delay: Duration,
    timer_interval: Duration,
    finished_tx: watch::Sender<Option<u64>>,
    pending_save: Option<JoinHandle<()>>,
}

impl GameController {
    /// Fetch a deck and open a fresh session on it.
    pub async fn start(
        deck_id: i64,
        source: &dyn DeckSource,
        sink: Arc<dyn GameResultSink>,
        config: &ClientConfig,
    ) -> Result<Self> {
        let flashcards = source.get_flashcards(deck_id).await.map_err(|e| {
            tracing::error!(deck_id, error = %e, "failed to load deck for matching game");
            e
        })?;

        let session = GameSession::new(&flashcards)?;
        tracing::info!(
            deck_id,
            session_id = %session.id(),
            pairs = session.total_pairs(),
            "matching game started"
        );

        Ok(Self::from_session(deck_id, session, sink, config))
    }

    /// Wrap an existing session, e.g. one restored from a snapshot.
    pub fn from_session(
        deck_id: i64,
        session: GameSession,
        sink: Arc<dyn GameResultSink>,
        config: &ClientConfig,
    ) -> Self {
        let frozen = session.stats().map(|s| s.completion_time_seconds);
        let (finished_tx, _) = watch::channel(frozen);

        Self {
            deck_id,
            session,
            sink,
            reveal_delay: config.reveal_delay,
            timer_interval: config.timer_interval,
            finished_tx,
            pending_save: None,
        }
    }

    /// Apply one tile click.
    pub fn select(&mut self, tile_id: &str) -> SelectionOutcome {
        let outcome = self.session.select_tile_now(tile_id);

        match &outcome {
            SelectionOutcome::Rejected { reason } => {
                tracing::debug!(tile_id, ?reason, "selection ignored");
            }
            SelectionOutcome::Completed { stats } => {
                tracing::info!(
                    deck_id = self.deck_id,
                    session_id = %self.session.id(),
                    seconds = stats.completion_time_seconds,
                    attempts = stats.total_attempts,
                    accuracy = stats.accuracy_percent,
                    "matching game completed"
                );
                self.finished_tx
                    .send_replace(Some(stats.completion_time_seconds));
                self.spawn_save(stats);
            }
            other => {
                tracing::debug!(tile_id, outcome = ?other, attempts = self.session.attempts());
            }
        }

        outcome
    }

    fn spawn_save(&mut self, stats: &GameStats) {
        let result = GameResult::from_stats(self.deck_id, stats);
        let sink = Arc::clone(&self.sink);

        let runtime = match Handle::try_current() {
            Ok(runtime) => runtime,
            Err(_) => {
                tracing::warn!(deck_id = self.deck_id, "no async runtime, game result not saved");
                return;
            }
        };

        self.pending_save = Some(runtime.spawn(async move {
            match sink.save_game(&result).await {
                Ok(()) => tracing::info!(deck_id = result.deck_id, "game result saved"),
                Err(e) => tracing::warn!(error = %e, "error saving completed game"),
            }
        }));
    }

    /// If a judged pair is face up, wait out the reveal delay and turn it
    /// back over. Returns whether anything was cleared.
    pub async fn settle(&mut self) -> bool {
        if !self.session.awaiting_clear() {
            return false;
        }
        tokio::time::sleep(self.reveal_delay).await;
        self.session.clear_selection();
        true
    }

    /// Turn the face-up tiles over immediately.
    pub fn clear_selection(&mut self) {
        self.session.clear_selection();
    }

    /// Start the on-screen clock; it freezes when the game completes.
    /// Returns `None` outside an async runtime.
    pub fn start_timer(&self) -> Option<ElapsedTimer> {
        let timer = ElapsedTimer::spawn(
            self.session.started_at(),
            self.timer_interval,
            self.finished_tx.subscribe(),
        );
        if timer.is_none() {
            tracing::warn!(deck_id = self.deck_id, "no async runtime, game clock not started");
        }
        timer
    }

    /// Wait for a background save to finish. Game state is unaffected
    /// whatever the save's outcome.
    pub async fn finish(&mut self) {
        if let Some(handle) = self.pending_save.take() {
            let _ = handle.await;
        }
    }

    pub fn deck_id(&self) -> i64 {
        self.deck_id
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn tiles(&self) -> Vec<TileView> {
        self.session.tile_views()
    }

    pub fn progress(&self) -> GameProgress {
        self.session.progress()
    }

    pub fn reveal_delay(&self) -> Duration {
        self.reveal_delay
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::memory::{InMemoryDeckSource, RecordingSink};
    use matching_core::{Flashcard, RejectReason, TileRole};

    fn config() -> ClientConfig {
        let mut config = ClientConfig::new("http://unused");
        config.reveal_delay = Duration::from_millis(5);
        config.timer_interval = Duration::from_millis(10);
        config
    }

    fn source() -> InMemoryDeckSource {
        InMemoryDeckSource::new().with_deck(
            1,
            vec![
                Flashcard::new(1, "cat", "gato"),
                Flashcard::new(2, "dog", "perro"),
            ],
        )
    }

    #[tokio::test]
    async fn test_settle_clears_after_pair() {
        let sink = Arc::new(RecordingSink::new());
        let mut game = GameController::start(1, &source(), sink, &config())
            .await
            .unwrap();

        assert!(!game.settle().await);
        game.select("q_1");
        assert_eq!(game.select("q_2"), SelectionOutcome::NotMatched);
        assert_eq!(
            game.select("a_1"),
            SelectionOutcome::Rejected {
                reason: RejectReason::SelectionFull
            }
        );

        assert!(game.settle().await);
        assert!(game.session().selected().is_empty());
        assert_eq!(game.progress().attempts, 1);
    }

    #[tokio::test]
    async fn test_completion_saves_in_background() {
        let sink = Arc::new(RecordingSink::new());
        let mut game = GameController::start(1, &source(), sink.clone(), &config())
            .await
            .unwrap();

        for id in [1, 2] {
            game.select(&TileRole::Question.tile_id(id));
            game.select(&TileRole::Answer.tile_id(id));
            game.clear_selection();
        }
        assert!(game.session().is_completed());

        game.finish().await;
        let saved = sink.saved();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].deck_id, 1);
        assert_eq!(saved[0].total_pairs, 2);
        assert_eq!(saved[0].total_attempts, 2);
    }

    #[tokio::test]
    async fn test_failed_save_keeps_win() {
        let sink = Arc::new(RecordingSink::failing("offline"));
        let mut game = GameController::start(1, &source(), sink, &config())
            .await
            .unwrap();

        for id in [1, 2] {
            game.select(&TileRole::Question.tile_id(id));
            game.select(&TileRole::Answer.tile_id(id));
            game.clear_selection();
        }
        let stats = *game.session().stats().unwrap();

        game.finish().await;
        assert!(game.session().is_completed());
        assert_eq!(game.session().stats(), Some(&stats));
        assert_eq!(stats.accuracy_percent, 100);
    }

    #[test]
    fn test_without_runtime_game_still_completes() {
        let cards = vec![Flashcard::new(1, "cat", "gato")];
        let session = GameSession::new(&cards).unwrap();
        let sink = Arc::new(RecordingSink::new());
        let mut game = GameController::from_session(1, session, sink.clone(), &config());

        assert!(game.start_timer().is_none());
        game.select("q_1");
        assert!(matches!(
            game.select("a_1"),
            SelectionOutcome::Completed { .. }
        ));
        assert!(sink.saved().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_deck_fails_to_start() {
        let sink = Arc::new(RecordingSink::new());
        let result = GameController::start(42, &source(), sink, &config()).await;
        assert!(matches!(
            result,
            Err(crate::error::ClientError::Game(
                matching_core::GameError::DeckNotFound { deck_id: 42 }
            ))
        ));
    }
}
