use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::config::GameSettings;
use crate::models::{RoundRecord, RoundScore};

/// How a round's points are derived from its score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreFormula {
    /// `correct * points_per_correct * (duration - elapsed)`
    TimeWeighted,
    /// `correct * points_per_correct`
    Flat,
}

impl FromStr for ScoreFormula {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "time_weighted" | "time-weighted" => Ok(ScoreFormula::TimeWeighted),
            "flat" => Ok(ScoreFormula::Flat),
            other => Err(format!("Unknown score formula: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBreakdown {
    pub base_points: u64,
    pub time_multiplier: u64,
    pub total_points: u64,
}

#[derive(Debug, Clone)]
pub struct ScoreCalculator {
    formula: ScoreFormula,
    points_per_correct: u64,
    round_duration: u32,
    max_score: u64,
    max_tickets: u32,
}

impl ScoreCalculator {
    pub fn new(settings: &GameSettings) -> Self {
        Self {
            formula: settings.score_formula,
            points_per_correct: settings.points_per_correct,
            round_duration: settings.round_duration_seconds,
            max_score: settings.max_score,
            max_tickets: settings.max_tickets_per_game,
        }
    }

    pub fn formula(&self) -> ScoreFormula {
        self.formula
    }

    pub fn calculate_score(&self, correct_answers: u32, time_left: u32) -> ScoreBreakdown {
        let base_points = correct_answers as u64 * self.points_per_correct;
        let time_multiplier = time_left as u64;

        ScoreBreakdown {
            base_points,
            time_multiplier,
            total_points: base_points * time_multiplier,
        }
    }

    pub fn round_points(&self, score: &RoundScore) -> u64 {
        match self.formula {
            ScoreFormula::TimeWeighted => {
                let time_left = self.round_duration.saturating_sub(score.time_elapsed);
                self.calculate_score(score.correct, time_left).total_points
            }
            ScoreFormula::Flat => score.correct as u64 * self.points_per_correct,
        }
    }

    pub fn total_score(&self, rounds: &[RoundRecord]) -> u64 {
        rounds.iter().map(|round| self.round_points(&round.score)).sum()
    }

    /// Ticket reward for a session score, rounded to nearest and capped.
    pub fn tickets_for(&self, score: u64) -> u32 {
        if self.max_score == 0 {
            return 0;
        }
        let tickets = (self.max_tickets as f64 * score as f64 / self.max_score as f64).round();
        (tickets as u32).min(self.max_tickets)
    }
}
