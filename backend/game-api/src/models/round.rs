use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{CandidateItem, Criteria, GamePhase, Tag};
use crate::services::selection::Selection;

/// Outcome of one round as seen at submission time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundScore {
    pub correct: u32,
    pub total: u32,
    /// Correctness per category, in `Criteria::ALL` order.
    pub answers: Vec<bool>,
    pub time_elapsed: u32,
}

impl RoundScore {
    pub fn from_selection(selection: &Selection, time_elapsed: u32) -> Self {
        let answers: Vec<bool> = Criteria::ALL
            .iter()
            .map(|criteria| selection.get(*criteria).is_some_and(|tag| tag.is_correct))
            .collect();

        Self {
            correct: answers.iter().filter(|correct| **correct).count() as u32,
            total: Criteria::ALL.len() as u32,
            answers,
            time_elapsed,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundRecord {
    pub round: u32,
    pub image_url: String,
    pub blurhash: String,
    pub guesses: Selection,
    pub score: RoundScore,
    pub points: u64,
    pub item: CandidateItem,
    pub recorded_at: DateTime<Utc>,
}

/// Read-only view of the session handed to the front end.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub phase: GamePhase,
    pub current_round: u32,
    pub rounds_per_game: u32,
    pub elapsed_time: u32,
    pub time_remaining: u32,
    pub show_results: bool,
    pub selected_tags: Selection,
    pub current_item: Option<CandidateItem>,
    pub available_tags: Vec<Tag>,
    pub rounds: Vec<RoundRecord>,
    pub total_score: u64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSummary {
    pub rounds: Vec<RoundRecord>,
    pub total_score: u64,
    pub current_round: u32,
    pub tickets: u32,
    pub max_tickets: u32,
}
