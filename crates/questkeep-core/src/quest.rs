//! Quest and profile records plus the client-side work done on them.
//!
//! The backend owns these records. The client only filters lists it already
//! fetched and rolls experience forward locally so progress can render
//! before the completion round-trip settles.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::events::Event;
use crate::experience::{resolve_experience, ExperienceState};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl std::str::FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(format!("unknown difficulty: {other}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quest {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub difficulty: Difficulty,
    #[serde(default)]
    pub deadline: Option<DateTime<Utc>>,
    /// EXP awarded on completion.
    pub points: u64,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
}

impl Quest {
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        !self.completed && self.deadline.is_some_and(|d| d < now)
    }
}

/// A user profile as the backend reports it. `level` and `points` may not be
/// normalized yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub username: String,
    pub level: i64,
    pub points: i64,
}

impl Profile {
    pub fn experience(&self) -> Result<ExperienceState, ValidationError> {
        resolve_experience(self.points, self.level)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    #[default]
    All,
    Active,
    Completed,
    Overdue,
}

impl std::str::FromStr for StatusFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "all" => Ok(StatusFilter::All),
            "active" => Ok(StatusFilter::Active),
            "completed" | "done" => Ok(StatusFilter::Completed),
            "overdue" => Ok(StatusFilter::Overdue),
            other => Err(format!("unknown status filter: {other}")),
        }
    }
}

/// Filter over an already-fetched quest list.
#[derive(Debug, Clone, Default)]
pub struct QuestFilter {
    pub status: StatusFilter,
    pub difficulty: Option<Difficulty>,
    /// Case-insensitive substring over title and description.
    pub search: Option<String>,
}

impl QuestFilter {
    pub fn matches(&self, quest: &Quest, now: DateTime<Utc>) -> bool {
        let status_ok = match self.status {
            StatusFilter::All => true,
            StatusFilter::Active => !quest.completed,
            StatusFilter::Completed => quest.completed,
            StatusFilter::Overdue => quest.is_overdue(now),
        };
        if !status_ok {
            return false;
        }
        if self.difficulty.is_some_and(|d| d != quest.difficulty) {
            return false;
        }
        match self.search.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(needle) => {
                let needle = needle.to_lowercase();
                quest.title.to_lowercase().contains(&needle)
                    || quest.description.to_lowercase().contains(&needle)
            }
        }
    }

    pub fn apply<'a>(&self, quests: &'a [Quest], now: DateTime<Utc>) -> Vec<&'a Quest> {
        quests.iter().filter(|q| self.matches(q, now)).collect()
    }
}

/// Mark a quest completed and award its points to `experience`.
///
/// Completing a quest twice is rejected so its reward is never counted again.
pub fn complete_quest(
    experience: &mut ExperienceState,
    quest: &mut Quest,
    now: DateTime<Utc>,
) -> Result<Event, ValidationError> {
    if quest.completed {
        return Err(ValidationError::InvalidState(format!(
            "quest '{}' is already completed",
            quest.id
        )));
    }
    quest.completed = true;
    quest.completed_at = Some(now);
    let levels_gained = experience.award(quest.points);
    Ok(Event::QuestCompleted {
        quest_id: quest.id.clone(),
        points: quest.points,
        level: experience.level(),
        levels_gained,
        at: now,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn quest(id: &str, title: &str, difficulty: Difficulty, points: u64) -> Quest {
        Quest {
            id: id.into(),
            title: title.into(),
            description: String::new(),
            difficulty,
            deadline: None,
            points,
            completed: false,
            completed_at: None,
        }
    }

    fn sample(now: DateTime<Utc>) -> Vec<Quest> {
        let mut late = quest("1", "File taxes", Difficulty::Hard, 500);
        late.deadline = Some(now - Duration::days(1));
        let mut done = quest("2", "Morning run", Difficulty::Easy, 100);
        done.completed = true;
        done.deadline = Some(now - Duration::days(2));
        let mut read = quest("3", "Read chapter", Difficulty::Medium, 200);
        read.description = "Rust book, ownership".into();
        read.deadline = Some(now + Duration::days(3));
        vec![late, done, read]
    }

    fn ids(quests: Vec<&Quest>) -> Vec<&str> {
        quests.iter().map(|q| q.id.as_str()).collect()
    }

    #[test]
    fn status_filters() {
        let now = Utc::now();
        let quests = sample(now);
        let mut filter = QuestFilter::default();
        assert_eq!(filter.apply(&quests, now).len(), 3);

        filter.status = StatusFilter::Active;
        assert_eq!(ids(filter.apply(&quests, now)), vec!["1", "3"]);

        filter.status = StatusFilter::Completed;
        assert_eq!(ids(filter.apply(&quests, now)), vec!["2"]);

        // completed quests are never overdue
        filter.status = StatusFilter::Overdue;
        assert_eq!(ids(filter.apply(&quests, now)), vec!["1"]);
    }

    #[test]
    fn difficulty_and_search_filters() {
        let now = Utc::now();
        let quests = sample(now);
        let filter = QuestFilter {
            difficulty: Some(Difficulty::Medium),
            ..Default::default()
        };
        assert_eq!(ids(filter.apply(&quests, now)), vec!["3"]);

        let filter = QuestFilter {
            search: Some("OWNERSHIP".into()),
            ..Default::default()
        };
        assert_eq!(ids(filter.apply(&quests, now)), vec!["3"]);

        let filter = QuestFilter {
            search: Some("  ".into()),
            ..Default::default()
        };
        assert_eq!(filter.apply(&quests, now).len(), 3);
    }

    #[test]
    fn completing_awards_points_once() {
        let now = Utc::now();
        let mut exp = resolve_experience(900, 1).unwrap();
        let mut q = quest("9", "Ship release", Difficulty::Hard, 250);

        let event = complete_quest(&mut exp, &mut q, now).unwrap();
        match event {
            Event::QuestCompleted { level, levels_gained, points, .. } => {
                assert_eq!(points, 250);
                assert_eq!(level, 2);
                assert_eq!(levels_gained, 1);
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!((exp.level(), exp.points()), (2, 150));
        assert!(q.completed);
        assert_eq!(q.completed_at, Some(now));

        assert!(complete_quest(&mut exp, &mut q, now).is_err());
        assert_eq!(exp.points(), 150);
    }

    #[test]
    fn profile_resolves_through_shared_formula() {
        let profile = Profile {
            username: "ada".into(),
            level: 1,
            points: 3400,
        };
        let exp = profile.experience().unwrap();
        assert_eq!((exp.level(), exp.points()), (3, 900));

        let broken = Profile { level: 0, ..profile };
        assert!(broken.experience().is_err());
    }

    #[test]
    fn quest_deserializes_backend_shape() {
        let json = r#"{
            "id": "q1",
            "title": "Stretch",
            "difficulty": "easy",
            "deadline": "2026-01-02T03:04:05Z",
            "points": 50
        }"#;
        let q: Quest = serde_json::from_str(json).unwrap();
        assert_eq!(q.difficulty, Difficulty::Easy);
        assert!(!q.completed);
        assert!(q.deadline.is_some());
    }
}
