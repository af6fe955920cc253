//! One-second tick source for a [`TimerCycle`].
//!
//! The driver owns the cycle behind a mutex and spawns a repeating tokio task
//! while the cycle is running. The task is aborted on pause, reset and drop,
//! and ends on its own once the cycle stops (an interval completed).
//!
//! Missed ticks are skipped rather than replayed: if the process is suspended
//! the countdown resumes where it left off.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

use super::cycle::TimerCycle;
use super::mode::TimerMode;
use crate::events::Event;

/// Interval between ticks.
pub const TICK: Duration = Duration::from_secs(1);

pub struct TimerDriver {
    cycle: Arc<Mutex<TimerCycle>>,
    events: mpsc::UnboundedSender<Event>,
    ticker: Option<JoinHandle<()>>,
}

impl TimerDriver {
    /// Wrap a cycle. Events produced by ticks (interval completions) arrive
    /// on the returned receiver; command results are returned directly.
    pub fn new(cycle: TimerCycle) -> (Self, mpsc::UnboundedReceiver<Event>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let driver = Self {
            cycle: Arc::new(Mutex::new(cycle)),
            events: tx,
            ticker: None,
        };
        (driver, rx)
    }

    /// Copy of the current cycle state.
    pub fn cycle(&self) -> TimerCycle {
        lock(&self.cycle).clone()
    }

    pub fn snapshot(&self) -> Event {
        lock(&self.cycle).snapshot()
    }

    /// Whether a tick task is alive.
    pub fn is_ticking(&self) -> bool {
        self.ticker.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Start the cycle and spawn the tick task.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(&mut self) -> Option<Event> {
        let event = lock(&self.cycle).start()?;
        self.cancel_ticker();
        self.ticker = Some(tokio::spawn(run_ticks(
            Arc::clone(&self.cycle),
            self.events.clone(),
        )));
        Some(event)
    }

    pub fn pause(&mut self) -> Option<Event> {
        self.cancel_ticker();
        lock(&self.cycle).pause()
    }

    pub fn reset(&mut self) -> Option<Event> {
        self.cancel_ticker();
        lock(&self.cycle).reset()
    }

    pub fn select_mode(&mut self, mode: TimerMode) -> Option<Event> {
        lock(&self.cycle).select_mode(mode)
    }

    pub fn set_duration(&mut self, mode: TimerMode, minutes: u32) -> Option<Event> {
        lock(&self.cycle).set_duration(mode, minutes)
    }

    fn cancel_ticker(&mut self) {
        if let Some(handle) = self.ticker.take() {
            handle.abort();
        }
    }
}

impl Drop for TimerDriver {
    fn drop(&mut self) {
        self.cancel_ticker();
    }
}

async fn run_ticks(cycle: Arc<Mutex<TimerCycle>>, events: mpsc::UnboundedSender<Event>) {
    let mut interval = tokio::time::interval_at(Instant::now() + TICK, TICK);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        interval.tick().await;
        let (event, running) = {
            let mut cycle = lock(&cycle);
            (cycle.tick(), cycle.is_running())
        };
        if let Some(event) = event {
            // Receiver gone means nobody is listening; keep the cycle consistent anyway.
            let _ = events.send(event);
        }
        if !running {
            tracing::debug!("tick task finished");
            break;
        }
    }
}

fn lock(cycle: &Mutex<TimerCycle>) -> MutexGuard<'_, TimerCycle> {
    cycle.lock().unwrap_or_else(PoisonError::into_inner)
}
