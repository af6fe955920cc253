use serde::{Deserialize, Serialize};

/// Shortest duration a mode may be set to, in minutes.
pub const MIN_DURATION_MIN: u32 = 1;
/// Longest duration a mode may be set to, in minutes.
pub const MAX_DURATION_MIN: u32 = 180;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TimerMode {
    Work,
    ShortBreak,
    LongBreak,
}

impl TimerMode {
    pub const ALL: [TimerMode; 3] = [TimerMode::Work, TimerMode::ShortBreak, TimerMode::LongBreak];

    pub fn as_str(&self) -> &'static str {
        match self {
            TimerMode::Work => "work",
            TimerMode::ShortBreak => "shortBreak",
            TimerMode::LongBreak => "longBreak",
        }
    }

    pub fn is_break(&self) -> bool {
        !matches!(self, TimerMode::Work)
    }

    /// Mode entered automatically when an interval of this mode runs out.
    ///
    /// Work always falls through to a short break; long breaks are only
    /// ever entered by explicit selection.
    pub fn next_on_completion(&self) -> TimerMode {
        match self {
            TimerMode::Work => TimerMode::ShortBreak,
            TimerMode::ShortBreak | TimerMode::LongBreak => TimerMode::Work,
        }
    }
}

impl std::fmt::Display for TimerMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TimerMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace(['-', '_'], "").as_str() {
            "work" | "focus" => Ok(TimerMode::Work),
            "shortbreak" | "short" => Ok(TimerMode::ShortBreak),
            "longbreak" | "long" => Ok(TimerMode::LongBreak),
            other => Err(format!("unknown timer mode: {other}")),
        }
    }
}

/// Per-mode durations in minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Durations {
    pub work_min: u32,
    pub short_break_min: u32,
    pub long_break_min: u32,
}

impl Default for Durations {
    fn default() -> Self {
        Self {
            work_min: 25,
            short_break_min: 5,
            long_break_min: 15,
        }
    }
}

impl Durations {
    pub fn minutes(&self, mode: TimerMode) -> u32 {
        match mode {
            TimerMode::Work => self.work_min,
            TimerMode::ShortBreak => self.short_break_min,
            TimerMode::LongBreak => self.long_break_min,
        }
    }

    pub fn secs(&self, mode: TimerMode) -> u64 {
        u64::from(self.minutes(mode)) * 60
    }

    pub(crate) fn set(&mut self, mode: TimerMode, minutes: u32) {
        match mode {
            TimerMode::Work => self.work_min = minutes,
            TimerMode::ShortBreak => self.short_break_min = minutes,
            TimerMode::LongBreak => self.long_break_min = minutes,
        }
    }

    pub fn in_range(minutes: u32) -> bool {
        (MIN_DURATION_MIN..=MAX_DURATION_MIN).contains(&minutes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn completion_never_enters_long_break() {
        for mode in TimerMode::ALL {
            assert_ne!(mode.next_on_completion(), TimerMode::LongBreak);
        }
        assert_eq!(TimerMode::Work.next_on_completion(), TimerMode::ShortBreak);
        assert_eq!(TimerMode::LongBreak.next_on_completion(), TimerMode::Work);
    }

    #[test]
    fn parse_accepts_common_spellings() {
        assert_eq!("work".parse::<TimerMode>().unwrap(), TimerMode::Work);
        assert_eq!("shortBreak".parse::<TimerMode>().unwrap(), TimerMode::ShortBreak);
        assert_eq!("long-break".parse::<TimerMode>().unwrap(), TimerMode::LongBreak);
        assert!("nap".parse::<TimerMode>().is_err());
    }

    #[test]
    fn default_durations() {
        let d = Durations::default();
        assert_eq!(d.secs(TimerMode::Work), 1500);
        assert_eq!(d.secs(TimerMode::ShortBreak), 300);
        assert_eq!(d.secs(TimerMode::LongBreak), 900);
    }

    #[test]
    fn serde_uses_camel_case() {
        let json = serde_json::to_string(&TimerMode::ShortBreak).unwrap();
        assert_eq!(json, "\"shortBreak\"");
    }
}
