//! Experience and level resolution.
//!
//! Points accumulate from completed quests and roll over into levels. Each
//! level `n` needs `floor(1000 * 1.5^(n - 1))` points; whatever is left after
//! paying off every reachable threshold stays as progress within the level.
//!
//! This is the only place the threshold formula lives. The profile view,
//! quest completion and the CLI all go through [`resolve_experience`].

use serde::Serialize;

use crate::error::ValidationError;

/// Points needed to clear level 1.
pub const BASE_THRESHOLD: u64 = 1000;

/// Growth factor applied per level.
pub const GROWTH_FACTOR: f64 = 1.5;

/// Points required to complete `level` and roll into the next.
///
/// Level 0 is treated as level 1. The result saturates at `u64::MAX` for
/// levels whose threshold no longer fits in 64 bits.
pub fn threshold(level: u64) -> u64 {
    let exponent = level.saturating_sub(1) as f64;
    // `as` saturates on overflow and maps +inf to u64::MAX.
    (BASE_THRESHOLD as f64 * GROWTH_FACTOR.powf(exponent)).floor() as u64
}

/// A normalized `(level, points)` pair.
///
/// Invariant: `level >= 1` and `points < threshold(level)`. Only
/// [`resolve_experience`] and [`ExperienceState::award`] produce values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ExperienceState {
    level: u64,
    points: u64,
}

impl Default for ExperienceState {
    fn default() -> Self {
        Self {
            level: 1,
            points: 0,
        }
    }
}

impl ExperienceState {
    pub fn level(&self) -> u64 {
        self.level
    }

    /// Points earned within the current level.
    pub fn points(&self) -> u64 {
        self.points
    }

    /// Threshold of the current level.
    pub fn threshold(&self) -> u64 {
        threshold(self.level)
    }

    /// Points still missing before the next level-up.
    pub fn points_to_next_level(&self) -> u64 {
        self.threshold().saturating_sub(self.points)
    }

    /// 0.0 .. 100.0 progress within the current level.
    pub fn progress_pct(&self) -> f64 {
        let total = self.threshold();
        if total == 0 {
            return 0.0;
        }
        (self.points as f64 / total as f64 * 100.0).min(100.0)
    }

    /// Add earned points and roll over into new levels.
    ///
    /// Returns the number of levels gained. Each level is paid for out of
    /// `earned` before anything is added to `points`, so no sum can overflow.
    pub fn award(&mut self, mut earned: u64) -> u64 {
        let before = self.level;
        loop {
            let missing = self.points_to_next_level();
            if earned < missing {
                self.points += earned;
                break;
            }
            earned -= missing;
            self.points = 0;
            self.level += 1;
        }
        let gained = self.level - before;
        if gained > 0 {
            tracing::info!(level = self.level, gained, "level up");
        }
        gained
    }
}

/// Normalize a raw `(points, level)` pair.
///
/// Rejects negative points and levels below 1 instead of clamping them, so a
/// bad profile record from the backend never turns into a plausible-looking
/// level.
pub fn resolve_experience(points: i64, level: i64) -> Result<ExperienceState, ValidationError> {
    if level < 1 {
        return Err(ValidationError::InvalidValue {
            field: "level".into(),
            message: format!("must be at least 1, got {level}"),
        });
    }
    if points < 0 {
        return Err(ValidationError::InvalidValue {
            field: "points".into(),
            message: format!("must not be negative, got {points}"),
        });
    }
    Ok(normalize(points as u64, level as u64))
}

fn normalize(mut points: u64, mut level: u64) -> ExperienceState {
    loop {
        let needed = threshold(level);
        if points < needed {
            break;
        }
        points -= needed;
        level += 1;
    }
    ExperienceState { level, points }
}
