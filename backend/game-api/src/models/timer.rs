use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{GamePhase, RoundRecord};

/// Everything the controller publishes to the event stream.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum GameEvent {
    TimerTick(TimerTick),
    TimeExpired(TimeExpired),
    PhaseChanged(PhaseChanged),
    RoundRecorded(RoundRecorded),
    ScoreSubmissionFailed(ScoreSubmissionFailed),
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TimerTick {
    pub round: u32,
    pub remaining_seconds: u32,
    pub elapsed_seconds: u32,
    pub total_seconds: u32,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TimeExpired {
    pub round: u32,
    pub timestamp: DateTime<Utc>,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PhaseChanged {
    pub phase: GamePhase,
    pub round: u32,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RoundRecorded {
    pub record: RoundRecord,
    pub total_score: u64,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ScoreSubmissionFailed {
    pub total_score: u64,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl GameEvent {
    pub fn to_sse_data(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }

    pub fn event_name(&self) -> &'static str {
        match self {
            GameEvent::TimerTick(_) => "timer-tick",
            GameEvent::TimeExpired(_) => "time-expired",
            GameEvent::PhaseChanged(_) => "phase-changed",
            GameEvent::RoundRecorded(_) => "round-recorded",
            GameEvent::ScoreSubmissionFailed(_) => "score-submission-failed",
        }
    }

    pub fn phase_changed(phase: GamePhase, round: u32) -> Self {
        GameEvent::PhaseChanged(PhaseChanged {
            phase,
            round,
            timestamp: Utc::now(),
        })
    }
}
