//! Thin async wrapper over the backend REST API.
//!
//! Every call is a single request: no retries, no queueing. Failures come
//! back as [`ApiError`] for the caller to surface.

use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use url::Url;

use super::token::TokenStore;
use crate::error::{ApiError, CoreError};
use crate::quest::{Profile, Quest};
use crate::storage::ApiConfig;
use crate::timer::TimerMode;

/// Longest error body kept in [`ApiError::Status`].
const MAX_ERROR_BODY: usize = 512;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Running,
    Paused,
    Completed,
}

/// A pomodoro session in the backend history log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PomodoroSession {
    pub id: String,
    pub mode: TimerMode,
    pub duration_minutes: u32,
    pub started_at: DateTime<Utc>,
    #[serde(default)]
    pub paused_at: Option<DateTime<Utc>>,
    pub status: SessionStatus,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct NewSession {
    mode: TimerMode,
    duration_minutes: u32,
}

pub struct ApiClient {
    http: Client,
    base_url: Url,
    token: Option<String>,
}

impl ApiClient {
    /// Build a client for `base_url` without credentials.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let base_url = Url::parse(base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl(
                url::ParseError::RelativeUrlWithCannotBeABaseBase,
            ));
        }
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url,
            token: None,
        })
    }

    /// Build from config, picking up the stored token if there is one.
    pub fn from_config(config: &ApiConfig, tokens: &dyn TokenStore) -> Result<Self, CoreError> {
        let client = Self::new(&config.base_url, Duration::from_secs(config.timeout_secs))?;
        Ok(match tokens.get()? {
            Some(token) => client.with_token(token),
            None => client,
        })
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    // ── Quests & profile ─────────────────────────────────────────────

    pub async fn quests(&self) -> Result<Vec<Quest>, ApiError> {
        self.get(&["api", "quests"]).await
    }

    /// Returns the profile after the backend applied the reward.
    pub async fn complete_quest(&self, quest_id: &str) -> Result<Profile, ApiError> {
        self.post::<(), _>(&["api", "quests", quest_id, "complete"], None)
            .await
    }

    pub async fn profile(&self) -> Result<Profile, ApiError> {
        self.get(&["api", "profile"]).await
    }

    // ── Pomodoro sessions ────────────────────────────────────────────

    pub async fn sessions(&self) -> Result<Vec<PomodoroSession>, ApiError> {
        self.get(&["api", "pomodoro", "sessions"]).await
    }

    pub async fn start_session(
        &self,
        mode: TimerMode,
        duration_minutes: u32,
    ) -> Result<PomodoroSession, ApiError> {
        let body = NewSession {
            mode,
            duration_minutes,
        };
        self.post(&["api", "pomodoro", "sessions"], Some(&body)).await
    }

    pub async fn pause_session(&self, session_id: &str) -> Result<PomodoroSession, ApiError> {
        self.post::<(), _>(&["api", "pomodoro", "sessions", session_id, "pause"], None)
            .await
    }

    pub async fn complete_session(&self, session_id: &str) -> Result<PomodoroSession, ApiError> {
        self.post::<(), _>(
            &["api", "pomodoro", "sessions", session_id, "complete"],
            None,
        )
        .await
    }

    pub async fn delete_session(&self, session_id: &str) -> Result<(), ApiError> {
        let url = self.endpoint(&["api", "pomodoro", "sessions", session_id])?;
        self.send(self.request(Method::DELETE, url)).await?;
        Ok(())
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ApiError::InvalidUrl(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let builder = self.http.request(method, url);
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn get<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T, ApiError> {
        let url = self.endpoint(segments)?;
        let resp = self.send(self.request(Method::GET, url)).await?;
        Ok(resp.json().await?)
    }

    async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        segments: &[&str],
        body: Option<&B>,
    ) -> Result<T, ApiError> {
        let url = self.endpoint(segments)?;
        let mut builder = self.request(Method::POST, url);
        if let Some(body) = body {
            builder = builder.json(body);
        }
        let resp = self.send(builder).await?;
        Ok(resp.json().await?)
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Response, ApiError> {
        let resp = builder.send().await?;
        let status = resp.status();
        tracing::debug!(url = %resp.url(), %status, "backend response");

        if status == StatusCode::UNAUTHORIZED {
            return Err(ApiError::Unauthorized);
        }
        if !status.is_success() {
            let mut message = match resp.text().await {
                Ok(body) => body,
                Err(e) => {
                    tracing::debug!(%status, error = %e, "could not read error body");
                    String::new()
                }
            };
            if message.len() > MAX_ERROR_BODY {
                let cut = (0..=MAX_ERROR_BODY)
                    .rev()
                    .find(|&i| message.is_char_boundary(i))
                    .unwrap_or(0);
                message.truncate(cut);
            }
            tracing::warn!(%status, "backend request failed");
            return Err(ApiError::Status {
                status: status.as_u16(),
                message,
            });
        }
        Ok(resp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> ApiClient {
        ApiClient::new(base, Duration::from_secs(1)).unwrap()
    }

    #[test]
    fn endpoint_appends_segments() {
        let c = client("http://localhost:3000");
        assert_eq!(
            c.endpoint(&["api", "quests"]).unwrap().as_str(),
            "http://localhost:3000/api/quests"
        );

        let c = client("https://example.com/v1/");
        assert_eq!(
            c.endpoint(&["api", "profile"]).unwrap().as_str(),
            "https://example.com/v1/api/profile"
        );
    }

    #[test]
    fn endpoint_escapes_ids() {
        let c = client("http://localhost:3000");
        let url = c.endpoint(&["api", "quests", "a/b c", "complete"]).unwrap();
        assert_eq!(url.path(), "/api/quests/a%2Fb%20c/complete");
    }

    #[test]
    fn rejects_unusable_base_url() {
        assert!(ApiClient::new("not a url", Duration::from_secs(1)).is_err());
        assert!(ApiClient::new("mailto:someone@example.com", Duration::from_secs(1)).is_err());
    }

    #[test]
    fn session_deserializes_backend_shape() {
        let json = r#"{
            "id": "s1",
            "mode": "work",
            "durationMinutes": 25,
            "startedAt": "2026-03-01T09:00:00Z",
            "status": "running"
        }"#;
        let s: PomodoroSession = serde_json::from_str(json).unwrap();
        assert_eq!(s.mode, TimerMode::Work);
        assert_eq!(s.status, SessionStatus::Running);
        assert!(s.paused_at.is_none());
    }
}
