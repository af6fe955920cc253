mod client;
mod token;

pub use client::{ApiClient, PomodoroSession, SessionStatus};
pub use token::{KeyringTokenStore, MemoryTokenStore, TokenStore};
