use std::sync::Arc;

use crate::config::Config;
use api_client::ArtcadeApi;
use game_controller::{GameController, RoundSource, ScoreReporter};
use game_data::GameDataFeed;
use token_store::TokenStore;

pub struct AppState {
    pub config: Config,
    pub controller: GameController,
    pub api: Arc<ArtcadeApi>,
}

impl AppState {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let http_client = reqwest::Client::builder()
            .user_agent(concat!("artcade-game-api/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let feed_url = config.feed_url();
        match &feed_url {
            Some(url) => tracing::info!("Game data feed: {}", url),
            None => tracing::warn!(
                "Game mode {} has no data feed; rounds will be unavailable",
                config.game_mode.id()
            ),
        }

        let rounds = Arc::new(GameDataFeed::new(
            http_client.clone(),
            feed_url,
            config.game.decoys_per_category,
        ));
        let api = Arc::new(ArtcadeApi::new(
            http_client,
            config.api_base_url.clone(),
            TokenStore::new(&config.storage_dir, &config.auth_storage_key),
        ));

        tracing::info!("Artcade API: {}", config.api_base_url);
        Ok(Self::with_collaborators(config, api.clone(), rounds, api))
    }

    /// Wires the controller to explicit collaborators instead of the remote feed and API.
    pub fn with_collaborators(
        config: Config,
        api: Arc<ArtcadeApi>,
        rounds: Arc<dyn RoundSource>,
        reporter: Arc<dyn ScoreReporter>,
    ) -> Self {
        let controller = GameController::new(config.game.clone(), rounds, reporter);
        Self {
            config,
            controller,
            api,
        }
    }
}

pub mod api_client;
pub mod game_controller;
pub mod game_data;
pub mod game_session;
pub mod game_timer;
pub mod round_generator;
pub mod scoring;
pub mod selection;
pub mod token_store;
