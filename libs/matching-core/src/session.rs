//! Matching game session state machine.
//!
//! A session is created from a deck, then driven one selection at a time:
//!
//! ```text
//! select(a)  -> FirstPick             selected = {a}
//! select(b)  -> Matched | NotMatched  selected = {a, b}, attempts += 1
//! clear()                             selected = {}
//! ```
//!
//! While two tiles are face up every further selection is rejected until the
//! host calls [`GameSession::clear_selection`]. Matching the last pair yields
//! `Completed` and freezes the session.

use std::collections::{BTreeSet, HashSet};

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::board::{build_tiles, shuffle_tiles, validate_flashcards};
use crate::error::{GameError, Result};
use crate::stats::{whole_seconds_between, GameProgress, GameStats};
use crate::types::{Flashcard, RejectReason, SelectionOutcome, Tile, TileView, HIDDEN_CONTENT};

/// One playthrough of the matching game.
///
/// Deserializing checks the snapshot for consistency, so a restored session
/// can always be played to completion.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "SessionSnapshot")]
pub struct GameSession {
    id: Uuid,
    tiles: Vec<Tile>,
    selected: Vec<String>,
    matched: BTreeSet<String>,
    attempts: u32,
    started_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
    stats: Option<GameStats>,
}

impl GameSession {
    /// Start a session using the thread RNG and the current time.
    pub fn new(flashcards: &[Flashcard]) -> Result<Self> {
        Self::with_rng(flashcards, &mut rand::thread_rng(), Utc::now())
    }

    /// Start a session with an explicit RNG and start time.
    pub fn with_rng<R: Rng + ?Sized>(
        flashcards: &[Flashcard],
        rng: &mut R,
        now: DateTime<Utc>,
    ) -> Result<Self> {
        validate_flashcards(flashcards)?;

        let mut tiles = build_tiles(flashcards);
        shuffle_tiles(&mut tiles, rng);

        Ok(Self {
            id: Uuid::new_v4(),
            tiles,
            selected: Vec::with_capacity(2),
            matched: BTreeSet::new(),
            attempts: 0,
            started_at: now,
            completed_at: None,
            stats: None,
        })
    }

    /// Select a tile, timestamping a completion with the current time.
    pub fn select_tile_now(&mut self, tile_id: &str) -> SelectionOutcome {
        self.select_tile(tile_id, Utc::now())
    }

    /// Process one tile selection.
    ///
    /// Rejected selections leave the session untouched.
    pub fn select_tile(&mut self, tile_id: &str, now: DateTime<Utc>) -> SelectionOutcome {
        if let Some(reason) = self.rejection(tile_id) {
            return SelectionOutcome::Rejected { reason };
        }

        self.selected.push(tile_id.to_string());
        if self.selected.len() == 1 {
            return SelectionOutcome::FirstPick;
        }

        self.attempts += 1;

        let is_match = match (self.tile(&self.selected[0]), self.tile(&self.selected[1])) {
            (Some(first), Some(second)) => first.pairs_with(second),
            _ => false,
        };
        if !is_match {
            return SelectionOutcome::NotMatched;
        }

        self.matched.extend(self.selected.iter().cloned());

        if self.matched.len() == self.tiles.len() {
            let stats = GameStats::compute(
                self.started_at,
                now,
                self.total_pairs(),
                self.attempts,
            );
            self.completed_at = Some(now);
            self.stats = Some(stats);
            return SelectionOutcome::Completed { stats };
        }

        SelectionOutcome::Matched
    }

    fn rejection(&self, tile_id: &str) -> Option<RejectReason> {
        if self.is_completed() {
            Some(RejectReason::GameCompleted)
        } else if self.tile(tile_id).is_none() {
            Some(RejectReason::UnknownTile)
        } else if self.matched.contains(tile_id) {
            Some(RejectReason::AlreadyMatched)
        } else if self.selected.iter().any(|id| id == tile_id) {
            Some(RejectReason::AlreadySelected)
        } else if self.selected.len() >= 2 {
            Some(RejectReason::SelectionFull)
        } else {
            None
        }
    }

    /// Turn the face-up tiles back over. Only affects the selection, so it is
    /// also valid after completion.
    pub fn clear_selection(&mut self) {
        self.selected.clear();
    }

    /// True while a judged pair is face up and waiting to be cleared.
    pub fn awaiting_clear(&self) -> bool {
        self.selected.len() == 2
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Tiles in display order.
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn tile(&self, tile_id: &str) -> Option<&Tile> {
        self.tiles.iter().find(|t| t.id == tile_id)
    }

    pub fn selected(&self) -> &[String] {
        &self.selected
    }

    pub fn matched(&self) -> &BTreeSet<String> {
        &self.matched
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    pub fn is_completed(&self) -> bool {
        self.completed_at.is_some()
    }

    /// Stats of a completed session.
    pub fn stats(&self) -> Option<&GameStats> {
        self.stats.as_ref()
    }

    pub fn total_pairs(&self) -> u32 {
        (self.tiles.len() / 2) as u32
    }

    pub fn progress(&self) -> GameProgress {
        GameProgress {
            matched_pairs: (self.matched.len() / 2) as u32,
            total_pairs: self.total_pairs(),
            attempts: self.attempts,
        }
    }

    /// Whole seconds since the start, frozen at the completion time.
    pub fn elapsed_seconds(&self, now: DateTime<Utc>) -> u64 {
        whole_seconds_between(self.started_at, self.completed_at.unwrap_or(now))
    }

    /// Render-ready state of every tile, in display order.
    pub fn tile_views(&self) -> Vec<TileView> {
        self.tiles
            .iter()
            .map(|tile| {
                let is_selected = self.selected.contains(&tile.id);
                let is_matched = self.matched.contains(&tile.id);
                let display_content = if is_selected || is_matched {
                    tile.content.clone()
                } else {
                    HIDDEN_CONTENT.to_string()
                };
                TileView {
                    id: tile.id.clone(),
                    display_content,
                    is_selected,
                    is_matched,
                }
            })
            .collect()
    }
}

/// Unchecked wire form of a [`GameSession`].
#[derive(Deserialize)]
struct SessionSnapshot {
    id: Uuid,
    tiles: Vec<Tile>,
    selected: Vec<String>,
    matched: BTreeSet<String>,
    attempts: u32,
    started_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
    stats: Option<GameStats>,
}

impl TryFrom<SessionSnapshot> for GameSession {
    type Error = GameError;

    fn try_from(snapshot: SessionSnapshot) -> Result<Self> {
        let session = Self {
            id: snapshot.id,
            tiles: snapshot.tiles,
            selected: snapshot.selected,
            matched: snapshot.matched,
            attempts: snapshot.attempts,
            started_at: snapshot.started_at,
            completed_at: snapshot.completed_at,
            stats: snapshot.stats,
        };
        session.check_consistency()?;
        Ok(session)
    }
}

impl GameSession {
    fn check_consistency(&self) -> Result<()> {
        let invalid = |msg: String| -> Result<()> { Err(GameError::InvalidSnapshot(msg)) };

        if self.tiles.is_empty() {
            return invalid("no tiles".into());
        }

        let mut ids = HashSet::new();
        for tile in &self.tiles {
            if tile.id != tile.role.tile_id(tile.flashcard_id) {
                return invalid(format!("tile id {} does not match its card", tile.id));
            }
            if !ids.insert(tile.id.as_str()) {
                return invalid(format!("duplicate tile {}", tile.id));
            }
        }
        for tile in &self.tiles {
            if !self.tiles.iter().any(|other| tile.pairs_with(other)) {
                return invalid(format!("tile {} has no partner", tile.id));
            }
        }

        if self.selected.len() > 2 {
            return invalid(format!("{} tiles selected", self.selected.len()));
        }
        if self.selected.len() == 2 && self.selected[0] == self.selected[1] {
            return invalid(format!("tile {} selected twice", self.selected[0]));
        }
        if let Some(id) = self.selected.iter().find(|id| !ids.contains(id.as_str())) {
            return invalid(format!("unknown selected tile {}", id));
        }

        for id in &self.matched {
            let Some(tile) = self.tile(id) else {
                return invalid(format!("unknown matched tile {}", id));
            };
            let partner = tile.role_partner_id();
            if !self.matched.contains(&partner) {
                return invalid(format!("tile {} matched without {}", id, partner));
            }
        }

        let matched_pairs = (self.matched.len() / 2) as u32;
        if self.attempts < matched_pairs {
            return invalid(format!(
                "{} attempts for {} matched pairs",
                self.attempts, matched_pairs
            ));
        }

        let all_matched = self.matched.len() == self.tiles.len();
        if all_matched != self.completed_at.is_some()
            || self.completed_at.is_some() != self.stats.is_some()
        {
            return invalid("completion state disagrees with matched tiles".into());
        }

        Ok(())
    }
}
