use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::GameError;

/// The four guessable attributes. Declaration order is the order of a round's answers vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Criteria {
    #[serde(rename = "TOTAL SUPPLY")]
    TotalSupply,
    #[serde(rename = "SEASON")]
    Season,
    #[serde(rename = "ARTIST NAME")]
    ArtistName,
    #[serde(rename = "ART NAME")]
    ArtName,
}

impl Criteria {
    pub const ALL: [Criteria; 4] = [
        Criteria::TotalSupply,
        Criteria::Season,
        Criteria::ArtistName,
        Criteria::ArtName,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            Criteria::TotalSupply => "TOTAL SUPPLY",
            Criteria::Season => "SEASON",
            Criteria::ArtistName => "ARTIST NAME",
            Criteria::ArtName => "ART NAME",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Criteria::TotalSupply => "Total Supply",
            Criteria::Season => "Season",
            Criteria::ArtistName => "Artist Name",
            Criteria::ArtName => "Art Name",
        }
    }

    /// Field of `ItemQuestions` the category reads from.
    pub fn data_field(&self) -> &'static str {
        match self {
            Criteria::TotalSupply => "supply",
            Criteria::Season => "season",
            Criteria::ArtistName => "artist",
            Criteria::ArtName => "title",
        }
    }

    /// Display form of a raw value. Seasons are shown as "Season N".
    pub fn format_value(&self, raw: &str) -> String {
        match self {
            Criteria::Season => format!("Season {}", raw),
            _ => raw.to_string(),
        }
    }
}

impl fmt::Display for Criteria {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Criteria {
    type Err = GameError;

    /// Accepts the wire id (`ART NAME`), the field name (`title`) or a slug (`art-name`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase().replace(['-', '_'], " ");
        Criteria::ALL
            .into_iter()
            .find(|c| c.id() == normalized || c.data_field().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| GameError::UnknownCriteria(s.to_string()))
    }
}

/// A selectable answer option for one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    pub id: String,
    pub value: String,
    pub criteria: Criteria,
    pub is_correct: bool,
    pub correct_answer: String,
}
