//! Common test utilities for client integration tests.
//!
//! Runs a small axum server that mimics the flashcard API endpoints the
//! client talks to, on an ephemeral local port.

pub mod fixtures;

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};

use matching_client::ClientConfig;

/// Shared state of the mock API.
#[derive(Clone, Default)]
pub struct MockState {
    pub decks: Arc<Mutex<HashMap<i64, Value>>>,
    pub saved_games: Arc<Mutex<Vec<Value>>>,
    pub history: Arc<Mutex<Vec<Value>>>,
    pub token: Option<String>,
    pub fail_saves: bool,
}

/// Handle to a running mock API.
pub struct MockApi {
    pub state: MockState,
    pub base_url: String,
}

impl MockApi {
    /// Start a mock API with the given state.
    pub async fn start(state: MockState) -> Self {
        let app = router(state.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind mock API");
        let addr = listener.local_addr().expect("Failed to read local addr");

        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("mock API crashed");
        });

        Self {
            state,
            base_url: format!("http://{}/api", addr),
        }
    }

    /// Client config pointing at this server.
    pub fn config(&self) -> ClientConfig {
        let config = ClientConfig::new(self.base_url.clone());
        match &self.state.token {
            Some(token) => config.with_token(token.clone()),
            None => config,
        }
    }

    pub fn saved_games(&self) -> Vec<Value> {
        self.state.saved_games.lock().unwrap().clone()
    }
}

fn router(state: MockState) -> Router {
    Router::new()
        .route("/api/decks/:deck_id", get(get_deck))
        .route("/api/matching-game", post(save_game))
        .route("/api/matching-game/best-times/:deck_id", get(best_times))
        .route("/api/matching-game/recent", get(recent))
        .with_state(state)
}

fn check_auth(state: &MockState, headers: &HeaderMap) -> Result<(), Response> {
    let Some(token) = &state.token else {
        return Ok(());
    };
    let expected = format!("Bearer {}", token);
    match headers.get(header::AUTHORIZATION) {
        Some(value) if value.as_bytes() == expected.as_bytes() => Ok(()),
        _ => Err(StatusCode::UNAUTHORIZED.into_response()),
    }
}

async fn get_deck(
    State(state): State<MockState>,
    headers: HeaderMap,
    Path(deck_id): Path<i64>,
) -> Response {
    if let Err(resp) = check_auth(&state, &headers) {
        return resp;
    }
    match state.decks.lock().unwrap().get(&deck_id) {
        Some(deck) => Json(deck.clone()).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({"error": "Deck not found"})),
        )
            .into_response(),
    }
}

async fn save_game(
    State(state): State<MockState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if let Err(resp) = check_auth(&state, &headers) {
        return resp;
    }
    if state.fail_saves {
        return (StatusCode::INTERNAL_SERVER_ERROR, "database unavailable").into_response();
    }
    state.saved_games.lock().unwrap().push(body.clone());
    Json(body).into_response()
}

async fn best_times(
    State(state): State<MockState>,
    headers: HeaderMap,
    Path(deck_id): Path<i64>,
) -> Response {
    if let Err(resp) = check_auth(&state, &headers) {
        return resp;
    }
    let records: Vec<Value> = state
        .history
        .lock()
        .unwrap()
        .iter()
        .filter(|r| r["deckId"] == deck_id)
        .cloned()
        .collect();
    Json(records).into_response()
}

async fn recent(State(state): State<MockState>, headers: HeaderMap) -> Response {
    if let Err(resp) = check_auth(&state, &headers) {
        return resp;
    }
    Json(state.history.lock().unwrap().clone()).into_response()
}
