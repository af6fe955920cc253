//! # Questkeep Core Library
//!
//! Client-side core of a gamified productivity app: quests earn experience,
//! experience rolls over into levels, and a pomodoro-style interval timer
//! structures work. The remote backend owns quests, profiles and session
//! history; this crate renders and forwards.
//!
//! ## Architecture
//!
//! - **Experience**: one pure threshold formula and the resolver that rolls
//!   points over into levels
//! - **Timer**: a seconds-based state machine plus a tokio tick driver that
//!   calls `tick()` once per second while running
//! - **Quests**: client-side filtering and local reward application
//! - **API**: async REST wrapper and bearer-token storage
//! - **Storage**: TOML configuration and a SQLite log of completed intervals
//!
//! ## Key Components
//!
//! - [`resolve_experience`]: normalize a `(points, level)` pair
//! - [`TimerCycle`]: interval state machine
//! - [`TimerDriver`]: cancellable one-second tick source
//! - [`ApiClient`]: backend fetch wrapper
//! - [`Config`] / [`Database`]: local persistence

pub mod api;
pub mod error;
pub mod events;
pub mod experience;
pub mod quest;
pub mod storage;
pub mod timer;

pub use api::{ApiClient, KeyringTokenStore, MemoryTokenStore, PomodoroSession, TokenStore};
pub use error::{ApiError, ConfigError, CoreError, DatabaseError, TokenStoreError, ValidationError};
pub use events::Event;
pub use experience::{resolve_experience, threshold, ExperienceState};
pub use quest::{complete_quest, Difficulty, Profile, Quest, QuestFilter, StatusFilter};
pub use storage::{Config, Database, SessionRecord, Stats};
pub use timer::{Durations, TimerCycle, TimerDriver, TimerMode};
