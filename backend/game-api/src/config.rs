use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::models::registry::{GameMode, GameType};
use crate::services::scoring::ScoreFormula;

const TESTNET_API_URL: &str = "https://api-dev.0xartcade.xyz";
const MAINNET_API_URL: &str = "https://api.0xartcade.xyz";
const TESTNET_AUTH_KEY: &str = "artcade-pwa-auth-dev";
const MAINNET_AUTH_KEY: &str = "artcade-pwa-auth";

#[derive(Debug, Clone)]
pub struct Config {
    pub app_env: String,
    pub bind_addr: String,
    pub api_base_url: String,
    pub storage_dir: PathBuf,
    pub auth_storage_key: String,
    pub game_type: GameType,
    pub game_mode: GameMode,
    /// Overrides the mode's built-in feed location when set.
    pub data_url: Option<String>,
    pub game: GameSettings,
}

/// Tunables of the game core. `Default` matches the shipped game.
#[derive(Debug, Clone, PartialEq)]
pub struct GameSettings {
    pub rounds_per_game: u32,
    pub round_duration_seconds: u32,
    pub tick_interval: Duration,
    pub calculation_delay: Duration,
    pub points_per_correct: u64,
    pub max_tickets_per_game: u32,
    pub max_score: u64,
    pub decoys_per_category: usize,
    pub score_formula: ScoreFormula,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            rounds_per_game: 5,
            round_duration_seconds: 30,
            tick_interval: Duration::from_millis(1000),
            calculation_delay: Duration::from_millis(2000),
            points_per_correct: 50,
            max_tickets_per_game: 25,
            max_score: 1000, // 5 rounds * 4 correct answers * 50 points
            decoys_per_category: 4,
            score_formula: ScoreFormula::TimeWeighted,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenvy::dotenv().ok();

        // Determine environment (defaults to dev)
        let app_env = env::var("APP_ENV").unwrap_or_else(|_| "dev".to_string());

        // Build configuration from config/*.toml + ENV overrides
        let settings = config::Config::builder()
            .add_source(config::File::with_name(&format!("config/{}", app_env)).required(false))
            .add_source(config::Environment::with_prefix("APP").separator("__"))
            .build()?;

        Self::from_settings(app_env, &settings)
    }

    pub fn from_settings(
        app_env: String,
        settings: &config::Config,
    ) -> Result<Self, config::ConfigError> {
        let bind_addr = settings
            .get_string("server.bind_addr")
            .or_else(|_| env::var("BIND_ADDR"))
            .unwrap_or_else(|_| "0.0.0.0:8081".to_string());

        let testnet = settings
            .get_bool("api.testnet")
            .unwrap_or_else(|_| app_env != "prod");

        let api_base_url = settings
            .get_string("api.base_url")
            .or_else(|_| env::var("ARTCADE_API_URL"))
            .unwrap_or_else(|_| {
                if testnet {
                    TESTNET_API_URL.to_string()
                } else {
                    MAINNET_API_URL.to_string()
                }
            });

        url::Url::parse(&api_base_url).map_err(|e| {
            config::ConfigError::Message(format!("Invalid api.base_url {}: {}", api_base_url, e))
        })?;

        let storage_dir = settings
            .get_string("storage.dir")
            .unwrap_or_else(|_| ".artcade".to_string())
            .into();

        let auth_storage_key = settings.get_string("storage.auth_key").unwrap_or_else(|_| {
            if testnet {
                TESTNET_AUTH_KEY.to_string()
            } else {
                MAINNET_AUTH_KEY.to_string()
            }
        });

        let game_type = settings
            .get_string("game.type")
            .unwrap_or_else(|_| GameType::KnowYourMemes.id().to_string())
            .parse::<GameType>()
            .map_err(config::ConfigError::Message)?;

        let game_mode = settings
            .get_string("game.mode")
            .unwrap_or_else(|_| GameMode::Collection6529.id().to_string())
            .parse::<GameMode>()
            .map_err(config::ConfigError::Message)?;

        let data_url = settings
            .get_string("game.data_url")
            .ok()
            .filter(|url| !url.is_empty());

        let defaults = GameSettings::default();
        let score_formula = match settings.get_string("game.score_formula") {
            Ok(value) => value
                .parse::<ScoreFormula>()
                .map_err(config::ConfigError::Message)?,
            Err(_) => defaults.score_formula,
        };

        let game = GameSettings {
            rounds_per_game: get_positive(settings, "game.rounds_per_game")
                .unwrap_or(defaults.rounds_per_game as u64) as u32,
            round_duration_seconds: get_positive(settings, "game.round_duration_seconds")
                .unwrap_or(defaults.round_duration_seconds as u64)
                as u32,
            tick_interval: get_positive(settings, "game.tick_interval_ms")
                .map(Duration::from_millis)
                .unwrap_or(defaults.tick_interval),
            calculation_delay: settings
                .get_int("game.calculation_delay_ms")
                .ok()
                .filter(|v| *v >= 0)
                .map(|v| Duration::from_millis(v as u64))
                .unwrap_or(defaults.calculation_delay),
            points_per_correct: get_positive(settings, "game.points_per_correct")
                .unwrap_or(defaults.points_per_correct),
            max_tickets_per_game: get_positive(settings, "game.max_tickets_per_game")
                .unwrap_or(defaults.max_tickets_per_game as u64)
                as u32,
            max_score: get_positive(settings, "game.max_score").unwrap_or(defaults.max_score),
            decoys_per_category: settings
                .get_int("game.decoys_per_category")
                .ok()
                .filter(|v| *v >= 0)
                .map(|v| v as usize)
                .unwrap_or(defaults.decoys_per_category),
            score_formula,
        };

        Ok(Config {
            app_env,
            bind_addr,
            api_base_url,
            storage_dir,
            auth_storage_key,
            game_type,
            game_mode,
            data_url,
            game,
        })
    }

    /// Feed URL for the active mode, honouring the override.
    pub fn feed_url(&self) -> Option<String> {
        self.data_url
            .clone()
            .or_else(|| self.game_mode.data_url().map(str::to_string))
    }
}

fn get_positive(settings: &config::Config, key: &str) -> Option<u64> {
    settings
        .get_int(key)
        .ok()
        .filter(|v| *v > 0)
        .map(|v| v as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(overrides: &[(&str, &str)]) -> config::Config {
        let mut builder = config::Config::builder();
        for (key, value) in overrides {
            builder = builder.set_override(*key, *value).unwrap();
        }
        builder.build().unwrap()
    }

    #[test]
    fn test_defaults_for_dev() {
        let config = Config::from_settings("dev".to_string(), &settings(&[])).unwrap();

        assert_eq!(config.api_base_url, TESTNET_API_URL);
        assert_eq!(config.auth_storage_key, TESTNET_AUTH_KEY);
        assert_eq!(config.game_mode, GameMode::Collection6529);
        assert_eq!(config.game, GameSettings::default());
        assert!(config.feed_url().is_some());
    }

    #[test]
    fn test_prod_uses_mainnet_key() {
        let config = Config::from_settings(
            "prod".to_string(),
            &settings(&[("api.base_url", "http://localhost:9000")]),
        )
        .unwrap();

        assert_eq!(config.auth_storage_key, MAINNET_AUTH_KEY);
        assert_eq!(config.api_base_url, "http://localhost:9000");
    }

    #[test]
    fn test_game_overrides() {
        let config = Config::from_settings(
            "dev".to_string(),
            &settings(&[
                ("game.rounds_per_game", "3"),
                ("game.score_formula", "flat"),
                ("game.calculation_delay_ms", "0"),
                ("game.mode", "template-mode"),
            ]),
        )
        .unwrap();

        assert_eq!(config.game.rounds_per_game, 3);
        assert_eq!(config.game.score_formula, ScoreFormula::Flat);
        assert_eq!(config.game.calculation_delay, Duration::ZERO);
        assert!(config.feed_url().is_none());
    }

    #[test]
    fn test_malformed_api_url_is_rejected() {
        let result = Config::from_settings(
            "dev".to_string(),
            &settings(&[("api.base_url", "not a url")]),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_unknown_mode_is_rejected() {
        let result = Config::from_settings(
            "dev".to_string(),
            &settings(&[("game.mode", "floor-price")]),
        );
        assert!(result.is_err());
    }
}
