use chrono::Utc;
use clap::Subcommand;
use questkeep_core::{Config, Difficulty, QuestFilter, StatusFilter};
use serde_json::json;

use super::{authenticated_client, print_json, runtime, CliResult};

#[derive(Subcommand)]
pub enum QuestAction {
    /// List quests, filtered locally
    List {
        /// all, active, completed or overdue
        #[arg(long, default_value = "all")]
        status: StatusFilter,
        /// easy, medium or hard
        #[arg(long)]
        difficulty: Option<Difficulty>,
        /// Match title or description
        #[arg(long)]
        search: Option<String>,
    },
    /// Complete a quest and show the resulting level
    Complete {
        id: String,
    },
}

pub fn run(action: QuestAction) -> CliResult {
    let config = Config::load()?;
    let client = authenticated_client(&config)?;
    let rt = runtime()?;

    match action {
        QuestAction::List {
            status,
            difficulty,
            search,
        } => {
            let quests = rt.block_on(client.quests())?;
            let filter = QuestFilter {
                status,
                difficulty,
                search,
            };
            print_json(&filter.apply(&quests, Utc::now()))
        }
        QuestAction::Complete { id } => {
            let profile = rt.block_on(client.complete_quest(&id))?;
            let experience = profile.experience()?;
            print_json(&json!({
                "quest_id": id,
                "username": profile.username,
                "level": experience.level(),
                "points": experience.points(),
                "threshold": experience.threshold(),
                "progress_pct": experience.progress_pct(),
            }))
        }
    }
}
