use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

use crate::config::GameSettings;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerSignal {
    Tick { remaining: u32, elapsed: u32 },
    Expired,
}

/// Round countdown. Each `start` spawns an independent task owned by the returned handle.
#[derive(Debug, Clone)]
pub struct GameTimer {
    duration_seconds: u32,
    tick_interval: Duration,
}

impl GameTimer {
    pub fn new(duration_seconds: u32, tick_interval: Duration) -> Self {
        Self {
            duration_seconds,
            tick_interval,
        }
    }

    pub fn from_settings(settings: &GameSettings) -> Self {
        Self::new(settings.round_duration_seconds, settings.tick_interval)
    }

    pub fn duration_seconds(&self) -> u32 {
        self.duration_seconds
    }

    /// Starts counting down from the full duration. `on_signal` receives one `Tick` per
    /// interval and a single `Expired` right after the tick that reaches zero.
    ///
    /// The callback runs on the timer task, so it must not block; hand real work off to
    /// another task.
    pub fn start<F>(&self, on_signal: F) -> TimerHandle
    where
        F: Fn(TimerSignal) + Send + 'static,
    {
        let duration = self.duration_seconds;
        let tick = self.tick_interval;

        let task = tokio::spawn(async move {
            let mut interval = interval_at(Instant::now() + tick, tick);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            let mut remaining = duration;
            while remaining > 0 {
                interval.tick().await;
                remaining -= 1;
                on_signal(TimerSignal::Tick {
                    remaining,
                    elapsed: duration - remaining,
                });
                if remaining == 0 {
                    on_signal(TimerSignal::Expired);
                }
            }
        });

        TimerHandle { task: Some(task) }
    }
}

/// Aborts the countdown when cancelled or dropped.
///
/// Abort takes effect at the task's next await point: a signal already being delivered
/// still arrives, so receivers must check that the signal belongs to the current round.
#[derive(Debug)]
pub struct TimerHandle {
    task: Option<JoinHandle<()>>,
}

impl TimerHandle {
    pub fn cancel(mut self) {
        self.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.task.as_ref().map_or(true, |task| task.is_finished())
    }

    fn abort(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl Drop for TimerHandle {
    fn drop(&mut self) {
        self.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn recorder() -> (Arc<Mutex<Vec<TimerSignal>>>, impl Fn(TimerSignal) + Send + 'static) {
        let signals = Arc::new(Mutex::new(Vec::new()));
        let sink = signals.clone();
        (signals, move |signal| sink.lock().unwrap().push(signal))
    }

    #[tokio::test(start_paused = true)]
    async fn test_counts_down_and_expires_once() {
        let (signals, on_signal) = recorder();
        let timer = GameTimer::new(30, Duration::from_secs(1));
        let handle = timer.start(on_signal);

        tokio::time::sleep(Duration::from_secs(45)).await;

        let signals = signals.lock().unwrap();
        let ticks: Vec<u32> = signals
            .iter()
            .filter_map(|s| match s {
                TimerSignal::Tick { elapsed, .. } => Some(*elapsed),
                TimerSignal::Expired => None,
            })
            .collect();
        assert_eq!(ticks, (1..=30).collect::<Vec<u32>>());
        assert_eq!(
            signals.iter().filter(|s| **s == TimerSignal::Expired).count(),
            1
        );
        assert_eq!(signals.last(), Some(&TimerSignal::Expired));
        assert!(handle.is_finished());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_stops_ticking() {
        let (signals, on_signal) = recorder();
        let timer = GameTimer::new(30, Duration::from_secs(1));
        let handle = timer.start(on_signal);

        tokio::time::sleep(Duration::from_millis(5_500)).await;
        handle.cancel();
        tokio::time::sleep(Duration::from_secs(60)).await;

        let signals = signals.lock().unwrap();
        assert_eq!(signals.len(), 5);
        assert!(!signals.contains(&TimerSignal::Expired));
        assert_eq!(
            signals.last(),
            Some(&TimerSignal::Tick {
                remaining: 25,
                elapsed: 5
            })
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropping_handle_cancels() {
        let (signals, on_signal) = recorder();
        let timer = GameTimer::new(3, Duration::from_secs(1));
        drop(timer.start(on_signal));

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert!(signals.lock().unwrap().is_empty());
    }
}
