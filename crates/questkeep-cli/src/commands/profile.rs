use questkeep_core::Config;
use serde_json::json;

use super::{authenticated_client, print_json, runtime, CliResult};

pub fn run() -> CliResult {
    let config = Config::load()?;
    let client = authenticated_client(&config)?;
    let profile = runtime()?.block_on(client.profile())?;
    let experience = profile.experience()?;

    print_json(&json!({
        "username": profile.username,
        "level": experience.level(),
        "points": experience.points(),
        "threshold": experience.threshold(),
        "points_to_next_level": experience.points_to_next_level(),
        "progress_pct": experience.progress_pct(),
    }))
}
