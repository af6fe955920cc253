//! Backend client against a local mock server.

use std::time::Duration;

use questkeep_core::api::SessionStatus;
use questkeep_core::storage::ApiConfig;
use questkeep_core::{ApiClient, ApiError, MemoryTokenStore, TimerMode, TokenStore};

fn client_for(server: &mockito::Server) -> ApiClient {
    ApiClient::new(&server.url(), Duration::from_secs(5))
        .unwrap()
        .with_token("secret-token")
}

#[tokio::test]
async fn fetches_quests_with_bearer_token() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/api/quests")
        .match_header("authorization", "Bearer secret-token")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"[
                {"id": "q1", "title": "Write report", "difficulty": "hard", "points": 300},
                {"id": "q2", "title": "Water plants", "difficulty": "easy", "points": 20,
                 "completed": true, "completedAt": "2026-05-01T10:00:00Z"}
            ]"#,
        )
        .create_async()
        .await;

    let quests = client_for(&server).quests().await.unwrap();
    mock.assert_async().await;

    assert_eq!(quests.len(), 2);
    assert_eq!(quests[0].points, 300);
    assert!(quests[1].completed);
}

#[tokio::test]
async fn complete_quest_returns_updated_profile() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/api/quests/q1/complete")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"username": "ada", "level": 1, "points": 3400}"#)
        .create_async()
        .await;

    let profile = client_for(&server).complete_quest("q1").await.unwrap();
    mock.assert_async().await;

    let exp = profile.experience().unwrap();
    assert_eq!((exp.level(), exp.points()), (3, 900));
}

#[tokio::test]
async fn unauthorized_maps_to_distinct_error() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/api/profile")
        .with_status(401)
        .create_async()
        .await;

    let err = client_for(&server).profile().await.unwrap_err();
    assert!(matches!(err, ApiError::Unauthorized));
}

#[tokio::test]
async fn server_error_keeps_status_and_body() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/api/pomodoro/sessions")
        .with_status(503)
        .with_body("maintenance")
        .create_async()
        .await;

    match client_for(&server).sessions().await {
        Err(ApiError::Status { status, message }) => {
            assert_eq!(status, 503);
            assert_eq!(message, "maintenance");
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[tokio::test]
async fn server_error_without_body_still_reports_status() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/api/quests")
        .with_status(502)
        .create_async()
        .await;

    match client_for(&server).quests().await {
        Err(ApiError::Status { status, message }) => {
            assert_eq!(status, 502);
            assert!(message.is_empty());
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[tokio::test]
async fn session_lifecycle_calls() {
    let mut server = mockito::Server::new_async().await;
    let session = |status: &str| {
        format!(
            r#"{{"id": "s1", "mode": "work", "durationMinutes": 25,
                 "startedAt": "2026-05-01T09:00:00Z", "status": "{status}"}}"#
        )
    };

    let start = server
        .mock("POST", "/api/pomodoro/sessions")
        .match_body(mockito::Matcher::Json(serde_json::json!({
            "mode": "work",
            "durationMinutes": 25
        })))
        .with_status(201)
        .with_header("content-type", "application/json")
        .with_body(session("running"))
        .create_async()
        .await;
    let pause = server
        .mock("POST", "/api/pomodoro/sessions/s1/pause")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(session("paused"))
        .create_async()
        .await;
    let delete = server
        .mock("DELETE", "/api/pomodoro/sessions/s1")
        .with_status(204)
        .create_async()
        .await;

    let client = client_for(&server);
    let created = client.start_session(TimerMode::Work, 25).await.unwrap();
    assert_eq!(created.status, SessionStatus::Running);
    let paused = client.pause_session(&created.id).await.unwrap();
    assert_eq!(paused.status, SessionStatus::Paused);
    client.delete_session(&created.id).await.unwrap();

    start.assert_async().await;
    pause.assert_async().await;
    delete.assert_async().await;
}

#[tokio::test]
async fn from_config_reads_token_store() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/api/profile")
        .match_header("authorization", "Bearer stored")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"username": "ada", "level": 2, "points": 10}"#)
        .create_async()
        .await;

    let config = ApiConfig {
        base_url: server.url(),
        timeout_secs: 5,
    };
    let store = MemoryTokenStore::default();
    assert!(!ApiClient::from_config(&config, &store).unwrap().has_token());

    store.set("stored").unwrap();
    let client = ApiClient::from_config(&config, &store).unwrap();
    assert!(client.has_token());
    let profile = client.profile().await.unwrap();
    mock.assert_async().await;
    assert_eq!(profile.level, 2);
}
