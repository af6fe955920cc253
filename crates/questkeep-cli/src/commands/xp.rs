use clap::Subcommand;
use questkeep_core::{resolve_experience, threshold, ExperienceState};
use serde::Serialize;

use super::{print_json, CliResult};

#[derive(Subcommand)]
pub enum XpAction {
    /// Points needed to clear a level
    Threshold {
        level: u64,
    },
    /// Roll raw points over into levels
    Resolve {
        #[arg(allow_negative_numbers = true)]
        points: i64,
        #[arg(allow_negative_numbers = true)]
        level: i64,
    },
    /// Add earned points to a (points, level) pair
    Award {
        #[arg(allow_negative_numbers = true)]
        points: i64,
        #[arg(allow_negative_numbers = true)]
        level: i64,
        /// Points earned
        gain: u64,
    },
}

#[derive(Serialize)]
struct Progress {
    level: u64,
    points: u64,
    threshold: u64,
    points_to_next_level: u64,
    progress_pct: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    levels_gained: Option<u64>,
}

impl Progress {
    fn new(state: &ExperienceState, levels_gained: Option<u64>) -> Self {
        Self {
            level: state.level(),
            points: state.points(),
            threshold: state.threshold(),
            points_to_next_level: state.points_to_next_level(),
            progress_pct: state.progress_pct(),
            levels_gained,
        }
    }
}

pub fn run(action: XpAction) -> CliResult {
    match action {
        XpAction::Threshold { level } => {
            if level == 0 {
                return Err("level must be at least 1".into());
            }
            print_json(&serde_json::json!({
                "level": level,
                "threshold": threshold(level),
            }))
        }
        XpAction::Resolve { points, level } => {
            let state = resolve_experience(points, level)?;
            print_json(&Progress::new(&state, None))
        }
        XpAction::Award { points, level, gain } => {
            let mut state = resolve_experience(points, level)?;
            let gained = state.award(gain);
            print_json(&Progress::new(&state, Some(gained)))
        }
    }
}
