//! Static registry of playable games and their data modes.
//!
//! Identifiers coming from configuration are resolved once at startup; there is no
//! lookup by string after that.

use serde::Serialize;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum GameType {
    KnowYourMemes,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GameMode {
    #[serde(rename = "6529-collection")]
    Collection6529,
    #[serde(rename = "template-mode")]
    Template,
}

const MEMES_DATA_URL: &str = "https://noaskfrnx3lefz7r.public.blob.vercel-storage.com/6529-memes-1-302-ICCX18MmBs6NxwL2wMEwJr5xQfH5Bx.json";

impl GameType {
    pub const ALL: [GameType; 1] = [GameType::KnowYourMemes];

    pub fn id(&self) -> &'static str {
        match self {
            GameType::KnowYourMemes => "know-your-memes",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            GameType::KnowYourMemes => "Know Your Memes",
        }
    }
}

impl GameMode {
    pub const ALL: [GameMode; 2] = [GameMode::Collection6529, GameMode::Template];

    pub fn id(&self) -> &'static str {
        match self {
            GameMode::Collection6529 => "6529-collection",
            GameMode::Template => "template-mode",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            GameMode::Collection6529 => "Know Your Memes",
            GameMode::Template => "Template Mode",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            GameMode::Collection6529 => {
                "How well do you know \"The Memes\" by 6529 Collections? You'll be shown 5 random \
                 tokens from the collection and asked to guess their season, number of tokens and \
                 the artist"
            }
            GameMode::Template => {
                "Template for new game modes. Plays with an empty item pool until a data feed is \
                 configured"
            }
        }
    }

    /// Feed location. Template mode has none and always yields an empty pool.
    pub fn data_url(&self) -> Option<&'static str> {
        match self {
            GameMode::Collection6529 => Some(MEMES_DATA_URL),
            GameMode::Template => None,
        }
    }
}

impl FromStr for GameType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        GameType::ALL
            .into_iter()
            .find(|t| t.id() == s)
            .ok_or_else(|| format!("Unknown game type: {}", s))
    }
}

impl FromStr for GameMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        GameMode::ALL
            .into_iter()
            .find(|m| m.id() == s)
            .ok_or_else(|| format!("Unknown game mode: {}", s))
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct GameModeInfo {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub has_data_feed: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegistryListing {
    pub game_types: Vec<GameTypeInfo>,
    pub game_modes: Vec<GameModeInfo>,
    pub active_type: &'static str,
    pub active_mode: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct GameTypeInfo {
    pub id: &'static str,
    pub name: &'static str,
}

pub fn listing(active_type: GameType, active_mode: GameMode) -> RegistryListing {
    RegistryListing {
        game_types: GameType::ALL
            .iter()
            .map(|t| GameTypeInfo {
                id: t.id(),
                name: t.name(),
            })
            .collect(),
        game_modes: GameMode::ALL
            .iter()
            .map(|m| GameModeInfo {
                id: m.id(),
                name: m.name(),
                description: m.description(),
                has_data_feed: m.data_url().is_some(),
            })
            .collect(),
        active_type: active_type.id(),
        active_mode: active_mode.id(),
    }
}
