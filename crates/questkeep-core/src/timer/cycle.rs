//! Interval timer state machine.
//!
//! The cycle counts whole seconds and has no clock of its own. Something
//! else (the [`TimerDriver`](super::TimerDriver) or a test) calls `tick()`
//! once per elapsed second while the cycle is running.
//!
//! ## Transitions
//!
//! ```text
//! work --(0)--> shortBreak --(0)--> work
//! longBreak --(0)--> work
//! any (stopped) --select--> any
//! ```

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::mode::{Durations, TimerMode};
use crate::events::Event;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimerCycle {
    mode: TimerMode,
    remaining_secs: u64,
    total_secs: u64,
    running: bool,
    durations: Durations,
    #[serde(default)]
    completed_work_intervals: u64,
}

impl Default for TimerCycle {
    fn default() -> Self {
        Self::new(Durations::default())
    }
}

impl TimerCycle {
    /// Create a stopped cycle in work mode with a full countdown.
    pub fn new(durations: Durations) -> Self {
        let total_secs = durations.secs(TimerMode::Work);
        Self {
            mode: TimerMode::Work,
            remaining_secs: total_secs,
            total_secs,
            running: false,
            durations,
            completed_work_intervals: 0,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn mode(&self) -> TimerMode {
        self.mode
    }

    pub fn remaining_secs(&self) -> u64 {
        self.remaining_secs
    }

    pub fn total_secs(&self) -> u64 {
        self.total_secs
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn durations(&self) -> Durations {
        self.durations
    }

    pub fn completed_work_intervals(&self) -> u64 {
        self.completed_work_intervals
    }

    /// 0.0 .. 1.0 progress within the current interval.
    pub fn progress(&self) -> f64 {
        if self.total_secs == 0 {
            return 0.0;
        }
        1.0 - (self.remaining_secs as f64 / self.total_secs as f64)
    }

    pub fn snapshot(&self) -> Event {
        Event::StateSnapshot {
            mode: self.mode,
            running: self.running,
            remaining_secs: self.remaining_secs,
            total_secs: self.total_secs,
            progress: self.progress(),
            completed_work_intervals: self.completed_work_intervals,
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn start(&mut self) -> Option<Event> {
        if self.running {
            return None;
        }
        self.running = true;
        tracing::debug!(mode = %self.mode, remaining = self.remaining_secs, "timer started");
        Some(Event::TimerStarted {
            mode: self.mode,
            remaining_secs: self.remaining_secs,
            at: Utc::now(),
        })
    }

    pub fn pause(&mut self) -> Option<Event> {
        if !self.running {
            return None;
        }
        self.running = false;
        tracing::debug!(mode = %self.mode, remaining = self.remaining_secs, "timer paused");
        Some(Event::TimerPaused {
            mode: self.mode,
            remaining_secs: self.remaining_secs,
            at: Utc::now(),
        })
    }

    /// Stop and rewind the current mode to its full duration.
    pub fn reset(&mut self) -> Option<Event> {
        self.running = false;
        self.remaining_secs = self.total_secs;
        Some(Event::TimerReset {
            mode: self.mode,
            total_secs: self.total_secs,
            at: Utc::now(),
        })
    }

    /// Switch mode. Rejected while running.
    pub fn select_mode(&mut self, mode: TimerMode) -> Option<Event> {
        if self.running {
            tracing::warn!(requested = %mode, "mode change rejected while running");
            return None;
        }
        let from = self.mode;
        self.enter(mode);
        Some(Event::ModeSelected {
            from,
            to: mode,
            total_secs: self.total_secs,
            at: Utc::now(),
        })
    }

    /// Change a mode's duration. Rejected while running or out of range.
    ///
    /// Editing the active mode rewinds the countdown to the new duration;
    /// other modes pick it up the next time they are entered.
    pub fn set_duration(&mut self, mode: TimerMode, minutes: u32) -> Option<Event> {
        if self.running || !Durations::in_range(minutes) {
            tracing::warn!(%mode, minutes, running = self.running, "duration change rejected");
            return None;
        }
        self.durations.set(mode, minutes);
        let applied = mode == self.mode;
        if applied {
            self.enter(mode);
        }
        Some(Event::DurationChanged {
            mode,
            minutes,
            applied,
            at: Utc::now(),
        })
    }

    /// Adopt durations owned elsewhere (the config file).
    ///
    /// Only modes whose minutes differ are changed, so a paused interval
    /// keeps its remaining time when nothing was edited. Ignored while
    /// running; out-of-range entries are skipped like any `set_duration`.
    pub fn apply_durations(&mut self, durations: Durations) -> Vec<Event> {
        if self.running {
            return Vec::new();
        }
        TimerMode::ALL
            .into_iter()
            .filter_map(|mode| {
                if durations.minutes(mode) != self.durations.minutes(mode) {
                    self.set_duration(mode, durations.minutes(mode))
                } else {
                    None
                }
            })
            .collect()
    }

    /// Advance by one elapsed second.
    ///
    /// Returns `Some(Event::IntervalCompleted)` when the countdown hits zero.
    /// Completion stops the cycle; the next interval waits for `start()`.
    pub fn tick(&mut self) -> Option<Event> {
        if !self.running || self.remaining_secs == 0 {
            return None;
        }
        self.remaining_secs -= 1;
        if self.remaining_secs > 0 {
            return None;
        }

        let completed = self.mode;
        let next = completed.next_on_completion();
        if completed == TimerMode::Work {
            self.completed_work_intervals += 1;
        }
        self.running = false;
        self.enter(next);
        tracing::info!(%completed, %next, "interval completed");
        Some(Event::IntervalCompleted {
            completed,
            next,
            duration_min: self.durations.minutes(completed),
            at: Utc::now(),
        })
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn enter(&mut self, mode: TimerMode) {
        self.mode = mode;
        self.total_secs = self.durations.secs(mode);
        self.remaining_secs = self.total_secs;
    }
}
