use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use crate::error::GameError;
use crate::metrics::track_feed_fetch;
use crate::models::GameData;
use crate::services::game_controller::RoundSource;
use crate::services::round_generator::{generate_round, RoundData};
use crate::utils::retry::{retry_async_with_config, RetryConfig};

const FEED_TIMEOUT: Duration = Duration::from_secs(10);

/// Client for the remote game-data feed (`{ "raw_data": [...] }`).
pub struct GameDataFeed {
    http_client: Client,
    data_url: Option<String>,
    decoys_per_category: usize,
    retry: RetryConfig,
}

impl GameDataFeed {
    pub fn new(http_client: Client, data_url: Option<String>, decoys_per_category: usize) -> Self {
        Self {
            http_client,
            data_url,
            decoys_per_category,
            retry: RetryConfig::default(),
        }
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Fetches the whole item pool. A mode without a feed yields an empty pool.
    pub async fn fetch_game_data(&self) -> Result<GameData, GameError> {
        let Some(url) = self.data_url.as_deref() else {
            tracing::warn!("No data URL configured for the active game mode");
            return Ok(GameData::default());
        };

        let data = track_feed_fetch(retry_async_with_config(
            "game data fetch",
            self.retry.clone(),
            || self.fetch_once(url),
        ))
        .await?;

        tracing::info!("Fetched {} items from game data feed", data.raw_data.len());
        Ok(data)
    }

    async fn fetch_once(&self, url: &str) -> Result<GameData, GameError> {
        tracing::debug!("Calling game data feed: {}", url);

        let response = self
            .http_client
            .get(url)
            .timeout(FEED_TIMEOUT)
            .send()
            .await
            .map_err(|e| GameError::DataUnavailable(format!("feed request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(GameError::DataUnavailable(format!(
                "feed returned status {}",
                response.status()
            )));
        }

        response
            .json::<GameData>()
            .await
            .map_err(|e| GameError::DataUnavailable(format!("failed to parse feed: {}", e)))
    }
}

#[async_trait]
impl RoundSource for GameDataFeed {
    async fn next_round(&self) -> Result<RoundData, GameError> {
        let data = self.fetch_game_data().await?;
        let mut rng = rand::rng();
        generate_round(&data, self.decoys_per_category, &mut rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_url_yields_empty_pool() {
        let feed = GameDataFeed::new(Client::new(), None, 4);
        let data = feed.fetch_game_data().await.unwrap();
        assert!(data.is_empty());
    }

    #[tokio::test]
    async fn test_template_mode_round_is_data_unavailable() {
        let feed = GameDataFeed::new(Client::new(), None, 4);
        let result = feed.next_round().await;
        assert!(matches!(result, Err(GameError::DataUnavailable(_))));
    }

    #[tokio::test]
    async fn test_unreachable_feed_is_data_unavailable() {
        let feed = GameDataFeed::new(Client::new(), Some("http://127.0.0.1:1/feed.json".to_string()), 4)
            .with_retry(RetryConfig {
                max_attempts: 2,
                base_backoff: Duration::from_millis(1),
                max_backoff: Duration::from_millis(1),
                jitter_max: None,
            });

        let result = feed.fetch_game_data().await;
        assert!(matches!(result, Err(GameError::DataUnavailable(_))));
    }
}
