//! Game session state machine.
//!
//! ```text
//! start ──start_new_game──▶ playing ──submit_round──▶ calculating ──reveal_results──▶ submitted
//!                              ▲                                          │
//!                              └──────────────next_round──────────────────┘
//!                                                 (round limit reached) ──▶ gameSummary
//! ```
//!
//! Everything here is synchronous and deterministic. Timing (the countdown, the reveal
//! delay) belongs to the controller that owns the session.

use chrono::Utc;

use crate::config::GameSettings;
use crate::models::{
    CandidateItem, Criteria, GamePhase, GameSummary, RoundRecord, RoundScore, SessionSnapshot,
    Tag,
};
use crate::services::scoring::ScoreCalculator;
use crate::services::selection::Selection;

/// Result of a successful submit.
#[derive(Debug, Clone)]
pub struct SubmitOutcome {
    pub record: RoundRecord,
    pub total_score: u64,
    /// True when this submit recorded the final round of the game.
    pub game_complete: bool,
}

#[derive(Debug, Clone)]
pub struct GameSession {
    settings: GameSettings,
    calculator: ScoreCalculator,
    phase: GamePhase,
    current_round: u32,
    elapsed_time: u32,
    selection: Selection,
    show_results: bool,
    rounds: Vec<RoundRecord>,
    total_score: u64,
    current_item: Option<CandidateItem>,
    available_tags: Vec<Tag>,
}

impl GameSession {
    pub fn new(settings: GameSettings) -> Self {
        Self {
            calculator: ScoreCalculator::new(&settings),
            settings,
            phase: GamePhase::Start,
            current_round: 0,
            elapsed_time: 0,
            selection: Selection::default(),
            show_results: false,
            rounds: Vec::new(),
            total_score: 0,
            current_item: None,
            available_tags: Vec::new(),
        }
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn current_round(&self) -> u32 {
        self.current_round
    }

    pub fn elapsed_time(&self) -> u32 {
        self.elapsed_time
    }

    pub fn rounds(&self) -> &[RoundRecord] {
        &self.rounds
    }

    pub fn total_score(&self) -> u64 {
        self.total_score
    }

    pub fn current_item(&self) -> Option<&CandidateItem> {
        self.current_item.as_ref()
    }

    pub fn available_tags(&self) -> &[Tag] {
        &self.available_tags
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn settings(&self) -> &GameSettings {
        &self.settings
    }

    pub fn calculator(&self) -> &ScoreCalculator {
        &self.calculator
    }

    /// A round is live once the phase is `playing` and its data is installed.
    pub fn is_round_active(&self) -> bool {
        self.phase == GamePhase::Playing && self.current_item.is_some()
    }

    pub fn is_game_complete(&self) -> bool {
        self.rounds.len() as u32 >= self.settings.rounds_per_game
    }

    /// Resets all per-game state and enters `playing`. Installed round data is kept so a
    /// preloaded round can be played immediately.
    pub fn start_new_game(&mut self) {
        self.phase = GamePhase::Playing;
        self.current_round = 0;
        self.elapsed_time = 0;
        self.selection.clear();
        self.show_results = false;
        self.rounds.clear();
        self.total_score = 0;
    }

    pub fn set_game_data(&mut self, item: CandidateItem, tags: Vec<Tag>) {
        self.current_item = Some(item);
        self.available_tags = tags;
    }

    pub fn update_time(&mut self, elapsed: u32) {
        if self.phase == GamePhase::Playing {
            self.elapsed_time = elapsed.min(self.settings.round_duration_seconds);
        }
    }

    pub fn select_tag(&mut self, tag: Tag) {
        self.selection.select(tag);
    }

    pub fn reset_tag(&mut self, criteria: Criteria) {
        self.selection.reset(criteria);
    }

    pub fn find_tag(&self, tag_id: &str) -> Option<&Tag> {
        self.available_tags.iter().find(|tag| tag.id == tag_id)
    }

    /// `playing → calculating`. Records the round from the current selection and elapsed
    /// time. Returns `None` (and changes nothing) outside a live round or once the game
    /// already holds every round.
    pub fn submit_round(&mut self) -> Option<SubmitOutcome> {
        if self.phase != GamePhase::Playing || self.is_game_complete() {
            return None;
        }
        let item = self.current_item.clone()?;

        self.phase = GamePhase::Calculating;
        self.show_results = false;

        let score = RoundScore::from_selection(&self.selection, self.elapsed_time);
        let record = RoundRecord {
            round: self.rounds.len() as u32 + 1,
            image_url: item.image_url.clone(),
            blurhash: item.blurhash.clone(),
            guesses: self.selection.clone(),
            points: self.calculator.round_points(&score),
            score,
            item,
            recorded_at: Utc::now(),
        };

        self.rounds.push(record.clone());
        self.total_score = self.calculator.total_score(&self.rounds);

        Some(SubmitOutcome {
            record,
            total_score: self.total_score,
            game_complete: self.is_game_complete(),
        })
    }

    /// `calculating → submitted | gameSummary`. No-op from any other phase.
    pub fn reveal_results(&mut self) -> Option<GamePhase> {
        if self.phase != GamePhase::Calculating {
            return None;
        }
        self.phase = if self.is_game_complete() {
            GamePhase::GameSummary
        } else {
            GamePhase::Submitted
        };
        self.show_results = true;
        Some(self.phase)
    }

    /// `submitted | nextRound → playing`. Clears the round so new data must be installed.
    pub fn next_round(&mut self) -> bool {
        if !matches!(self.phase, GamePhase::Submitted | GamePhase::NextRound) {
            return false;
        }
        self.phase = GamePhase::Playing;
        self.current_round += 1;
        self.elapsed_time = 0;
        self.selection.clear();
        self.show_results = false;
        self.current_item = None;
        self.available_tags.clear();
        true
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            phase: self.phase,
            current_round: self.current_round,
            rounds_per_game: self.settings.rounds_per_game,
            elapsed_time: self.elapsed_time,
            time_remaining: self
                .settings
                .round_duration_seconds
                .saturating_sub(self.elapsed_time),
            show_results: self.show_results,
            selected_tags: self.selection.clone(),
            current_item: self.current_item.clone(),
            available_tags: self.available_tags.clone(),
            rounds: self.rounds.clone(),
            total_score: self.total_score,
        }
    }

    pub fn summary(&self) -> GameSummary {
        GameSummary {
            rounds: self.rounds.clone(),
            total_score: self.total_score,
            current_round: self.rounds.len() as u32,
            tickets: self.calculator.tickets_for(self.total_score),
            max_tickets: self.settings.max_tickets_per_game,
        }
    }
}
