use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::TimerMode;

/// Every state change in the system produces an Event.
/// The CLI prints them; the driver forwards them over a channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    TimerStarted {
        mode: TimerMode,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    TimerPaused {
        mode: TimerMode,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    TimerReset {
        mode: TimerMode,
        total_secs: u64,
        at: DateTime<Utc>,
    },
    ModeSelected {
        from: TimerMode,
        to: TimerMode,
        total_secs: u64,
        at: DateTime<Utc>,
    },
    /// A duration setting changed. `applied` is true when it hit the
    /// active mode and reset the countdown immediately.
    DurationChanged {
        mode: TimerMode,
        minutes: u32,
        applied: bool,
        at: DateTime<Utc>,
    },
    /// The countdown reached zero and the cycle moved on.
    IntervalCompleted {
        completed: TimerMode,
        next: TimerMode,
        duration_min: u32,
        at: DateTime<Utc>,
    },
    QuestCompleted {
        quest_id: String,
        points: u64,
        level: u64,
        levels_gained: u64,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        mode: TimerMode,
        running: bool,
        remaining_secs: u64,
        total_secs: u64,
        progress: f64,
        completed_work_intervals: u64,
        at: DateTime<Utc>,
    },
}

impl Event {
    /// True for the completion of a work interval, the one that counts as a
    /// finished pomodoro session.
    pub fn is_work_completion(&self) -> bool {
        matches!(
            self,
            Event::IntervalCompleted {
                completed: TimerMode::Work,
                ..
            }
        )
    }
}
