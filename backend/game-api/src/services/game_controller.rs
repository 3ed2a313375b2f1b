use async_trait::async_trait;
use chrono::Utc;
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::sync::{broadcast, mpsc, Mutex};
use tokio::task::JoinHandle;

use crate::config::GameSettings;
use crate::error::GameError;
use crate::metrics::{
    ANSWERS_TOTAL, GAMES_TOTAL, ROUNDS_SUBMITTED_TOTAL, SCORE_SUBMISSIONS_TOTAL,
};
use crate::models::timer::{
    GameEvent, RoundRecorded, ScoreSubmissionFailed, TimeExpired, TimerTick,
};
use crate::models::{Criteria, GamePhase, GameSummary, SessionSnapshot};
use crate::services::game_session::{GameSession, SubmitOutcome};
use crate::services::game_timer::{GameTimer, TimerHandle, TimerSignal};
use crate::services::round_generator::RoundData;

const EVENT_BUFFER: usize = 64;

/// Produces the data for the next round.
#[async_trait]
pub trait RoundSource: Send + Sync {
    async fn next_round(&self) -> Result<RoundData, GameError>;
}

/// Receives the final score of a completed game.
#[async_trait]
pub trait ScoreReporter: Send + Sync {
    async fn submit_score(&self, total_score: u64) -> Result<(), GameError>;
}

#[derive(Debug, Clone, Copy)]
enum SubmitTrigger {
    Manual,
    Timeout,
}

impl SubmitTrigger {
    fn as_str(&self) -> &'static str {
        match self {
            SubmitTrigger::Manual => "submit",
            SubmitTrigger::Timeout => "timeout",
        }
    }
}

/// Owns the single game session and everything scheduled on its behalf.
///
/// All mutations go through one mutex. Scheduled work (countdown ticks, the delayed result
/// reveal) is tagged with the round generation it was armed for and is dropped once a newer
/// game or round has started.
#[derive(Clone)]
pub struct GameController {
    inner: Arc<ControllerInner>,
}

struct ControllerInner {
    state: Mutex<ControllerState>,
    events: broadcast::Sender<GameEvent>,
    rounds: Arc<dyn RoundSource>,
    reporter: Arc<dyn ScoreReporter>,
    timer: GameTimer,
    calculation_delay: Duration,
}

struct ControllerState {
    session: GameSession,
    generation: u64,
    timer: Option<TimerHandle>,
    pending_reveal: Option<JoinHandle<()>>,
}

impl ControllerState {
    fn cancel_timer(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.cancel();
        }
    }

    fn cancel_scheduled(&mut self) {
        self.cancel_timer();
        if let Some(reveal) = self.pending_reveal.take() {
            reveal.abort();
        }
    }
}

impl GameController {
    pub fn new(
        settings: GameSettings,
        rounds: Arc<dyn RoundSource>,
        reporter: Arc<dyn ScoreReporter>,
    ) -> Self {
        let (events, _) = broadcast::channel(EVENT_BUFFER);
        Self {
            inner: Arc::new(ControllerInner {
                timer: GameTimer::from_settings(&settings),
                calculation_delay: settings.calculation_delay,
                state: Mutex::new(ControllerState {
                    session: GameSession::new(settings),
                    generation: 0,
                    timer: None,
                    pending_reveal: None,
                }),
                events,
                rounds,
                reporter,
            }),
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<GameEvent> {
        self.inner.events.subscribe()
    }

    pub async fn snapshot(&self) -> SessionSnapshot {
        self.inner.state.lock().await.session.snapshot()
    }

    pub async fn summary(&self) -> GameSummary {
        self.inner.state.lock().await.session.summary()
    }

    /// Loads a round and starts a fresh game with it. On load failure nothing changes.
    pub async fn start_new_game(&self) -> Result<SessionSnapshot, GameError> {
        let round = self.load_round().await?;

        let mut state = self.inner.state.lock().await;
        state.cancel_scheduled();
        state.session.set_game_data(round.item, round.tags);
        state.session.start_new_game();
        self.arm_round(&mut state);

        GAMES_TOTAL.with_label_values(&["started"]).inc();
        tracing::info!("New game started (generation {})", state.generation);
        self.emit(GameEvent::phase_changed(GamePhase::Playing, 0));

        Ok(state.session.snapshot())
    }

    /// Loads the next round and moves `submitted → playing`. Outside a result phase this
    /// is a no-op returning the current snapshot.
    pub async fn next_round(&self) -> Result<SessionSnapshot, GameError> {
        {
            let state = self.inner.state.lock().await;
            if !matches!(
                state.session.phase(),
                GamePhase::Submitted | GamePhase::NextRound
            ) {
                tracing::debug!(
                    "Ignoring next round request in phase {}",
                    state.session.phase().as_str()
                );
                return Ok(state.session.snapshot());
            }
        }

        let round = self.load_round().await?;

        let mut state = self.inner.state.lock().await;
        if !state.session.next_round() {
            return Ok(state.session.snapshot());
        }
        state.cancel_scheduled();
        state.session.set_game_data(round.item, round.tags);
        self.arm_round(&mut state);

        let current_round = state.session.current_round();
        tracing::info!("Round {} started", current_round + 1);
        self.emit(GameEvent::phase_changed(GamePhase::Playing, current_round));

        Ok(state.session.snapshot())
    }

    pub async fn select_tag(&self, tag_id: &str) -> Result<SessionSnapshot, GameError> {
        let mut state = self.inner.state.lock().await;
        let tag = state
            .session
            .find_tag(tag_id)
            .cloned()
            .ok_or_else(|| GameError::UnknownTag(tag_id.to_string()))?;

        tracing::debug!("Selected {} for {}", tag.value, tag.criteria);
        state.session.select_tag(tag);
        Ok(state.session.snapshot())
    }

    pub async fn reset_tag(&self, criteria: Criteria) -> SessionSnapshot {
        let mut state = self.inner.state.lock().await;
        state.session.reset_tag(criteria);
        state.session.snapshot()
    }

    /// Player-initiated submit. No-op outside a live round.
    pub async fn submit_round(&self) -> SessionSnapshot {
        let mut state = self.inner.state.lock().await;
        self.submit_locked(&mut state, SubmitTrigger::Manual);
        state.session.snapshot()
    }

    /// Cancels the countdown and any pending reveal.
    pub async fn shutdown(&self) {
        let mut state = self.inner.state.lock().await;
        state.cancel_scheduled();
        tracing::info!("Game controller stopped");
    }

    async fn load_round(&self) -> Result<RoundData, GameError> {
        self.inner.rounds.next_round().await.inspect_err(|e| {
            tracing::error!("Failed to load round data: {}", e);
        })
    }

    fn emit(&self, event: GameEvent) {
        // No subscribers is fine.
        let _ = self.inner.events.send(event);
    }

    /// Bumps the generation and, if a round is live, starts its countdown. Signals are
    /// queued and applied by one task per round so the final tick always lands before
    /// the expiry.
    fn arm_round(&self, state: &mut ControllerState) {
        state.generation += 1;
        if !state.session.is_round_active() {
            return;
        }

        let generation = state.generation;
        let (signals, mut queue) = mpsc::unbounded_channel::<TimerSignal>();
        state.timer = Some(self.inner.timer.start(move |signal| {
            // Closed once the round's drain task has gone.
            let _ = signals.send(signal);
        }));

        let weak: Weak<ControllerInner> = Arc::downgrade(&self.inner);
        tokio::spawn(async move {
            while let Some(signal) = queue.recv().await {
                let Some(inner) = weak.upgrade() else {
                    break;
                };
                GameController { inner }.on_timer(generation, signal).await;
            }
        });
    }

    async fn on_timer(&self, generation: u64, signal: TimerSignal) {
        let mut state = self.inner.state.lock().await;
        if state.generation != generation || !state.session.is_round_active() {
            return;
        }

        let round = state.session.current_round();
        match signal {
            TimerSignal::Tick { remaining, elapsed } => {
                state.session.update_time(elapsed);
                self.emit(GameEvent::TimerTick(TimerTick {
                    round,
                    remaining_seconds: remaining,
                    elapsed_seconds: elapsed,
                    total_seconds: self.inner.timer.duration_seconds(),
                    timestamp: Utc::now(),
                }));
            }
            TimerSignal::Expired => {
                tracing::info!("Round {} timed out", round + 1);
                state
                    .session
                    .update_time(self.inner.timer.duration_seconds());
                self.emit(GameEvent::TimeExpired(TimeExpired {
                    round,
                    timestamp: Utc::now(),
                    message: "Time's up".to_string(),
                }));
                self.submit_locked(&mut state, SubmitTrigger::Timeout);
            }
        }
    }

    fn submit_locked(&self, state: &mut ControllerState, trigger: SubmitTrigger) {
        let Some(outcome) = state.session.submit_round() else {
            tracing::debug!(
                "Ignoring {} in phase {}",
                trigger.as_str(),
                state.session.phase().as_str()
            );
            return;
        };
        state.cancel_timer();

        ROUNDS_SUBMITTED_TOTAL
            .with_label_values(&[trigger.as_str()])
            .inc();
        for correct in &outcome.record.score.answers {
            ANSWERS_TOTAL
                .with_label_values(&[if *correct { "true" } else { "false" }])
                .inc();
        }

        tracing::info!(
            "Round {} recorded via {}: correct={}/{}, elapsed={}s, points={}, total={}",
            outcome.record.round,
            trigger.as_str(),
            outcome.record.score.correct,
            outcome.record.score.total,
            outcome.record.score.time_elapsed,
            outcome.record.points,
            outcome.total_score
        );

        self.emit(GameEvent::phase_changed(
            GamePhase::Calculating,
            state.session.current_round(),
        ));
        self.emit(GameEvent::RoundRecorded(RoundRecorded {
            record: outcome.record.clone(),
            total_score: outcome.total_score,
        }));

        self.schedule_reveal(state);
        if outcome.game_complete {
            self.report_final_score(&outcome);
        }
    }

    fn schedule_reveal(&self, state: &mut ControllerState) {
        let generation = state.generation;
        let delay = self.inner.calculation_delay;
        let weak = Arc::downgrade(&self.inner);

        state.pending_reveal = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if let Some(inner) = weak.upgrade() {
                GameController { inner }.reveal(generation).await;
            }
        }));
    }

    async fn reveal(&self, generation: u64) {
        let mut state = self.inner.state.lock().await;
        if state.generation != generation {
            tracing::debug!("Dropping stale reveal for generation {}", generation);
            return;
        }
        // Detach rather than abort: this is the task holding the handle.
        state.pending_reveal.take();

        if let Some(phase) = state.session.reveal_results() {
            if phase == GamePhase::GameSummary {
                GAMES_TOTAL.with_label_values(&["completed"]).inc();
                tracing::info!(
                    "Game complete: total score {}",
                    state.session.total_score()
                );
            }
            self.emit(GameEvent::phase_changed(
                phase,
                state.session.current_round(),
            ));
        }
    }

    /// Fire-and-forget. A failure is surfaced as an event; the summary stands either way.
    fn report_final_score(&self, outcome: &SubmitOutcome) {
        let reporter = self.inner.reporter.clone();
        let events = self.inner.events.clone();
        let total_score = outcome.total_score;

        tokio::spawn(async move {
            match reporter.submit_score(total_score).await {
                Ok(()) => {
                    SCORE_SUBMISSIONS_TOTAL.with_label_values(&["success"]).inc();
                    tracing::info!("Final score {} submitted", total_score);
                }
                Err(e) => {
                    SCORE_SUBMISSIONS_TOTAL.with_label_values(&["error"]).inc();
                    tracing::warn!("Final score submission failed: {}", e);
                    let _ = events.send(GameEvent::ScoreSubmissionFailed(ScoreSubmissionFailed {
                        total_score,
                        message: e.user_message(),
                        timestamp: Utc::now(),
                    }));
                }
            }
        });
    }
}
