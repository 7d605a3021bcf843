//! Client configuration loaded from the environment.

use std::time::Duration;

use anyhow::{bail, Context};

const DEFAULT_REVEAL_DELAY_MS: u64 = 1000;
const DEFAULT_TIMER_INTERVAL_MS: u64 = 1000;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

/// Settings for talking to the API and pacing a game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL of the REST API, without a trailing slash.
    pub api_url: String,
    /// Bearer token sent with every request.
    pub api_token: Option<String>,
    /// How long a judged pair stays face up.
    pub reveal_delay: Duration,
    /// How often the elapsed timer publishes.
    pub timer_interval: Duration,
    pub request_timeout: Duration,
}

impl ClientConfig {
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into().trim_end_matches('/').to_string(),
            api_token: None,
            reveal_delay: Duration::from_millis(DEFAULT_REVEAL_DELAY_MS),
            timer_interval: Duration::from_millis(DEFAULT_TIMER_INTERVAL_MS),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(token.into());
        self
    }

    /// Load from process environment, reading `.env` first if present.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_url = lookup("API_URL").context("API_URL must be set")?;
        if api_url.trim().is_empty() {
            bail!("API_URL must not be empty");
        }

        let mut config = Self::new(api_url.trim());
        config.api_token = lookup("API_TOKEN").filter(|t| !t.trim().is_empty());

        if let Some(ms) = parse_u64(&lookup, "REVEAL_DELAY_MS")? {
            config.reveal_delay = Duration::from_millis(ms);
        }
        if let Some(ms) = parse_u64(&lookup, "TIMER_INTERVAL_MS")? {
            if ms == 0 {
                bail!("TIMER_INTERVAL_MS must be greater than zero");
            }
            config.timer_interval = Duration::from_millis(ms);
        }
        if let Some(secs) = parse_u64(&lookup, "REQUEST_TIMEOUT_SECS")? {
            config.request_timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }
}

fn parse_u64<F>(lookup: &F, key: &str) -> anyhow::Result<Option<u64>>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|raw| {
            raw.trim()
                .parse::<u64>()
                .with_context(|| format!("{} must be a non-negative integer, got {:?}", key, raw))
        })
        .transpose()
}
