use serde::{Deserialize, Deserializer, Serialize};

pub mod api;
pub mod registry;
pub mod round;
pub mod tag;
pub mod timer;

pub use round::{GameSummary, RoundRecord, RoundScore, SessionSnapshot};
pub use tag::{Criteria, Tag};

/// One NFT from the game-data feed. Everything the player guesses lives in `questions`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateItem {
    #[serde(default)]
    pub collection: String,
    #[serde(default)]
    pub contract_address: String,
    #[serde(default)]
    pub token_id: u64,
    pub questions: ItemQuestions,
    pub image_url: String,
    #[serde(default)]
    pub blurhash: String,
    #[serde(default)]
    pub predominant_color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemQuestions {
    pub title: String,
    pub artist: String,
    pub supply: u64,
    #[serde(deserialize_with = "string_or_number")]
    pub season: String,
}

impl CandidateItem {
    /// Raw (unformatted) value of the item for a category.
    pub fn raw_value(&self, criteria: Criteria) -> String {
        match criteria {
            Criteria::TotalSupply => self.questions.supply.to_string(),
            Criteria::Season => self.questions.season.clone(),
            Criteria::ArtistName => self.questions.artist.clone(),
            Criteria::ArtName => self.questions.title.clone(),
        }
    }
}

/// Feed document: `{ "raw_data": [...] }`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameData {
    #[serde(default)]
    pub raw_data: Vec<CandidateItem>,
}

impl GameData {
    pub fn new(raw_data: Vec<CandidateItem>) -> Self {
        Self { raw_data }
    }

    pub fn is_empty(&self) -> bool {
        self.raw_data.is_empty()
    }

    /// Distinct raw values for a category, in first-seen order.
    pub fn distinct_values(&self, criteria: Criteria) -> Vec<String> {
        let mut values: Vec<String> = Vec::new();
        for item in &self.raw_data {
            let value = item.raw_value(criteria);
            if !values.contains(&value) {
                values.push(value);
            }
        }
        values
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GamePhase {
    Start,
    Playing,
    Calculating,
    Submitted,
    /// Wire-compatibility value: front ends may report it, and `next_round` accepts it as a
    /// source phase, but the session never enters it on its own.
    NextRound,
    GameSummary,
}

impl GamePhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            GamePhase::Start => "start",
            GamePhase::Playing => "playing",
            GamePhase::Calculating => "calculating",
            GamePhase::Submitted => "submitted",
            GamePhase::NextRound => "nextRound",
            GamePhase::GameSummary => "gameSummary",
        }
    }
}

// Seasons show up as `"3"` in some feed revisions and `3` in others.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Int(i64),
        Float(f64),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(value) => value,
        Raw::Int(value) => value.to_string(),
        Raw::Float(value) => value.to_string(),
    })
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn item(title: &str, artist: &str, supply: u64, season: &str) -> CandidateItem {
        CandidateItem {
            collection: "The Memes by 6529".to_string(),
            contract_address: "0x33fd426905f149f8376e227d0c9d3340aad17af1".to_string(),
            token_id: supply,
            questions: ItemQuestions {
                title: title.to_string(),
                artist: artist.to_string(),
                supply,
                season: season.to_string(),
            },
            image_url: format!("https://cdn.example/{}.png", title),
            blurhash: "LEHV6nWB2yk8pyo0adR*.7kCMdnj".to_string(),
            predominant_color: "#000000".to_string(),
        }
    }
}
