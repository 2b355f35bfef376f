//! Cosmetic progress indicator shown while a generation request is in flight.
//!
//! The percentage is simulated. It climbs by small random steps on a fixed
//! interval, never passes [`MAX_SIMULATED`] on its own, and only reaches 100
//! when the request settles.

use rand::Rng;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;

use crate::events::AppEvent;
use crate::models::ProgressConfig;

pub const START_PERCENT: u8 = 5;
pub const MAX_SIMULATED: u8 = 95;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProgressState {
    pub percent: u8,
    pub label: String,
}

impl ProgressState {
    pub fn started() -> Self {
        Self {
            percent: START_PERCENT,
            label: "Analyzing prompt...".to_string(),
        }
    }

    pub fn advance(&mut self, increment: u8) {
        self.percent = self.percent.saturating_add(increment).min(MAX_SIMULATED);
    }

    pub fn complete(&mut self) {
        self.percent = 100;
        self.label = "Finalizing...".to_string();
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub const fn is_active(&self) -> bool {
        self.percent > 0
    }

    pub const fn is_complete(&self) -> bool {
        self.percent >= 100
    }
}

/// Ticking task tied to one generation request. Dropping it stops the ticks.
#[derive(Debug)]
pub struct ProgressTicker {
    handle: JoinHandle<()>,
    tx: UnboundedSender<AppEvent>,
    reset_delay: Duration,
}

impl ProgressTicker {
    pub fn start(tx: UnboundedSender<AppEvent>, config: ProgressConfig) -> Self {
        let interval = Duration::from_millis(config.tick_interval_ms.max(1));
        let mut state = ProgressState::started();
        let _ = tx.send(AppEvent::Progress(state.clone()));

        let tick_tx = tx.clone();
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // The first tick of a tokio interval fires immediately
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let increment = rand::thread_rng().gen_range(1..=6);
                state.advance(increment);
                if tick_tx.send(AppEvent::Progress(state.clone())).is_err() {
                    break;
                }
            }
        });

        Self {
            handle,
            tx,
            reset_delay: Duration::from_millis(config.reset_delay_ms),
        }
    }

    /// Stops ticking, reports completion and schedules the reset.
    pub fn finish(self) -> JoinHandle<()> {
        self.handle.abort();

        let mut state = ProgressState::default();
        state.complete();
        let _ = self.tx.send(AppEvent::Progress(state));

        let tx = self.tx.clone();
        let delay = self.reset_delay;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tx.send(AppEvent::ProgressReset);
        })
    }
}

impl Drop for ProgressTicker {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    fn fast_config() -> ProgressConfig {
        ProgressConfig {
            tick_interval_ms: 500,
            reset_delay_ms: 1000,
        }
    }

    fn drain(rx: &mut mpsc::UnboundedReceiver<AppEvent>) -> Vec<AppEvent> {
        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        events
    }

    #[test]
    fn test_advance_caps_below_completion() {
        let mut state = ProgressState::started();
        for _ in 0..100 {
            state.advance(6);
        }
        assert_eq!(state.percent, MAX_SIMULATED);
    }

    #[test]
    fn test_complete_and_reset() {
        let mut state = ProgressState::started();
        state.advance(3);
        state.complete();
        assert_eq!(state.percent, 100);
        assert_eq!(state.label, "Finalizing...");
        assert!(state.is_complete());

        state.reset();
        assert_eq!(state, ProgressState::default());
        assert!(!state.is_active());
        assert!(!state.is_complete());
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticker_reports_increasing_progress() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let ticker = ProgressTicker::start(tx, fast_config());

        tokio::time::sleep(Duration::from_millis(2600)).await;
        let events = drain(&mut rx);

        let percents: Vec<u8> = events
            .iter()
            .filter_map(|event| match event {
                AppEvent::Progress(state) => Some(state.percent),
                _ => None,
            })
            .collect();
        assert_eq!(percents[0], START_PERCENT);
        assert!(percents.len() >= 5, "expected ticks, got {percents:?}");
        assert!(percents.windows(2).all(|w| w[0] <= w[1]));
        assert!(percents.iter().all(|p| *p <= MAX_SIMULATED));

        drop(ticker);
    }

    #[tokio::test(start_paused = true)]
    async fn test_finish_stops_ticks_and_resets_later() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let ticker = ProgressTicker::start(tx, fast_config());
        tokio::time::sleep(Duration::from_millis(1100)).await;
        drain(&mut rx);

        let reset = ticker.finish();
        let events = drain(&mut rx);
        assert!(matches!(
            events.last(),
            Some(AppEvent::Progress(state)) if state.percent == 100
        ));

        // No ticks after completion, only the delayed reset
        tokio::time::sleep(Duration::from_millis(900)).await;
        assert!(drain(&mut rx).is_empty());

        reset.await.unwrap();
        assert!(matches!(drain(&mut rx).as_slice(), [AppEvent::ProgressReset]));
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_cancels_ticker() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let ticker = ProgressTicker::start(tx, fast_config());
        drop(ticker);
        drain(&mut rx);

        tokio::time::sleep(Duration::from_millis(3000)).await;
        assert!(drain(&mut rx).is_empty());
    }
}
