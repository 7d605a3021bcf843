//! REST implementation of the deck source and result sink.

use async_trait::async_trait;
use matching_core::{validate_flashcards, Flashcard, GameError, GameResult};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use super::{DeckSource, GameRecord, GameResultSink};
use crate::config::ClientConfig;
use crate::error::{ClientError, Result, SaveGameError};

/// Deck body as served by `GET /decks/{id}`. Only the cards matter here.
#[derive(Debug, Deserialize)]
struct ApiDeck {
    #[serde(rename = "flashCards", default)]
    flash_cards: Option<serde_json::Value>,
}

/// HTTP client for the flashcard API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    api_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| ClientError::Network(e.to_string()))?;

        Ok(Self {
            client,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            token: config.api_token.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_url, path)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response> {
        let resp = self
            .authorized(request)
            .send()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;

        if resp.status() == StatusCode::UNAUTHORIZED {
            return Err(ClientError::NotAuthenticated);
        }
        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let message = resp.text().await.unwrap_or_default();
            return Err(ClientError::Backend { status, message });
        }

        Ok(resp)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let resp = self.send(self.client.get(self.url(path))).await?;
        resp.json()
            .await
            .map_err(|e| ClientError::Parse(e.to_string()))
    }

    /// Fastest completions of a deck by the current user.
    pub async fn best_times(&self, deck_id: i64) -> Result<Vec<GameRecord>> {
        self.get_json(&format!("/matching-game/best-times/{}", deck_id))
            .await
    }

    /// The current user's most recent games.
    pub async fn recent_games(&self) -> Result<Vec<GameRecord>> {
        self.get_json("/matching-game/recent").await
    }
}

/// Pull the card list out of a deck body.
fn flashcards_from_deck(deck: ApiDeck) -> Result<Vec<Flashcard>> {
    let raw = match deck.flash_cards {
        Some(value @ serde_json::Value::Array(_)) => value,
        _ => {
            return Err(GameError::InvalidDeckData(
                "no flashcards found in the deck or invalid format".to_string(),
            )
            .into())
        }
    };

    let cards: Vec<Flashcard> = serde_json::from_value(raw)
        .map_err(|e| GameError::InvalidDeckData(e.to_string()))?;
    validate_flashcards(&cards)?;
    Ok(cards)
}

#[async_trait]
impl DeckSource for ApiClient {
    async fn get_flashcards(&self, deck_id: i64) -> Result<Vec<Flashcard>> {
        let request = self.client.get(self.url(&format!("/decks/{}", deck_id)));
        let deck: ApiDeck = match self.send(request).await {
            Ok(resp) => resp
                .json()
                .await
                .map_err(|e| ClientError::Parse(e.to_string()))?,
            Err(ClientError::Backend { status: 404, .. }) => {
                return Err(GameError::DeckNotFound { deck_id }.into())
            }
            Err(e) => return Err(e),
        };

        flashcards_from_deck(deck)
    }
}

#[async_trait]
impl GameResultSink for ApiClient {
    /// Posts to `/matching-game`. The legacy server has no such route, so
    /// this needs a backend that provides it.
    async fn save_game(&self, result: &GameResult) -> std::result::Result<(), SaveGameError> {
        let request = self.client.post(self.url("/matching-game")).json(result);
        self.send(request)
            .await
            .map(|_| ())
            .map_err(|source| SaveGameError {
                deck_id: result.deck_id,
                source,
            })
    }
}
