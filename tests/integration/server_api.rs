//! HTTP handlers over an orchestrator with the reference agents.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde_json::json;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use switchboard::decomposer::{Decomposer, Decomposition};
use switchboard::orchestration::RunStatus;
use switchboard::server::{build_router, handle_chat, handle_health, ChatMessage};
use switchboard::{Error, Orchestrator, Result};

use crate::fixtures::{fast_agents, Harness};

struct Unavailable;

impl Decomposer for Unavailable {
    fn decompose(&self, _instruction: &str) -> Result<Decomposition> {
        Err(Error::Decomposition("planner unavailable".to_string()))
    }
}

fn chat(message: &str) -> std::result::Result<Json<ChatMessage>, JsonRejection> {
    Ok(Json(ChatMessage {
        message: message.to_string(),
    }))
}

/// Serve the router on an ephemeral port and send one raw HTTP/1.1 request.
async fn raw_request(request: String) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let router = build_router(Arc::new(Harness::new().orchestrator));
    let server = tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream.write_all(request.as_bytes()).await.unwrap();
    let mut raw = String::new();
    stream.read_to_string(&mut raw).await.unwrap();

    server.abort();
    raw
}

fn post_chat(origin: &str, body: &str) -> String {
    format!(
        "POST /api/chat HTTP/1.1\r\nHost: localhost\r\nOrigin: {}\r\n\
         Content-Type: application/json\r\nContent-Length: {}\r\n\
         Connection: close\r\n\r\n{}",
        origin,
        body.len(),
        body
    )
}

#[tokio::test]
async fn test_chat_returns_full_response() {
    let orchestrator = Arc::new(Harness::new().orchestrator);

    let Json(response) = handle_chat(State(orchestrator), chat("Get leads and send follow-up email"))
        .await
        .unwrap();

    assert_eq!(response.status, RunStatus::Completed);
    assert_eq!(response.subtasks.len(), 2);
    assert!(response.results.get("hubspot").unwrap().is_success());
    assert!(response.chat_response.contains("• Gmail: Sent 2 follow-up emails via Gmail"));
}

#[tokio::test]
async fn test_chat_runs_are_isolated() {
    let orchestrator = Arc::new(Harness::new().orchestrator);

    let Json(first) = handle_chat(State(orchestrator.clone()), chat("get leads"))
        .await
        .unwrap();
    let Json(second) = handle_chat(State(orchestrator), chat("send email"))
        .await
        .unwrap();

    assert_ne!(first.task_id, second.task_id);
    assert_eq!(
        second.results.get("gmail").unwrap().message,
        "No leads found to email"
    );
}

#[tokio::test]
async fn test_chat_failure_is_500_with_detail() {
    let registry = switchboard::agents::default_registry(&fast_agents()).unwrap();
    let orchestrator = Arc::new(Orchestrator::new(Unavailable, registry));

    let (status, Json(body)) = handle_chat(State(orchestrator), chat("send email"))
        .await
        .unwrap_err();

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body,
        json!({"detail": "Decomposition failed: planner unavailable"})
    );
}

#[tokio::test]
async fn test_health_reports_healthy() {
    let Json(health) = handle_health().await;
    let value = serde_json::to_value(&health).unwrap();

    assert_eq!(value["status"], "healthy");
    assert!(value["timestamp"].as_str().is_some());
}

#[tokio::test]
async fn test_router_serves_over_tcp() {
    let raw = raw_request(
        "GET /api/health HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n".to_string(),
    )
    .await;

    assert!(raw.starts_with("HTTP/1.1 200"), "unexpected response: {}", raw);
    assert!(raw.contains("\"status\":\"healthy\""));
}

/// Test: browser preflight
/// Given a frontend on another origin
/// When it sends an OPTIONS preflight for POST /api/chat
/// Then the response allows the cross-origin request
#[tokio::test]
async fn test_chat_preflight_allows_any_origin() {
    let raw = raw_request(
        "OPTIONS /api/chat HTTP/1.1\r\nHost: localhost\r\n\
         Origin: http://localhost:3000\r\n\
         Access-Control-Request-Method: POST\r\n\
         Access-Control-Request-Headers: content-type\r\n\
         Connection: close\r\n\r\n"
            .to_string(),
    )
    .await;
    let lowered = raw.to_lowercase();

    assert!(raw.starts_with("HTTP/1.1 200"), "unexpected response: {}", raw);
    assert!(lowered.contains("access-control-allow-origin: *"), "{}", raw);
    assert!(lowered.contains("access-control-allow-methods"), "{}", raw);
}

#[tokio::test]
async fn test_cross_origin_chat_carries_cors_header() {
    let raw = raw_request(post_chat(
        "http://localhost:3000",
        r#"{"message":"meeting notes"}"#,
    ))
    .await;

    assert!(raw.starts_with("HTTP/1.1 200"), "unexpected response: {}", raw);
    assert!(raw.to_lowercase().contains("access-control-allow-origin: *"));
    assert!(raw.contains("Retrieved meeting notes from Notion"));
}

#[tokio::test]
async fn test_chat_missing_message_uses_detail_shape() {
    let raw = raw_request(post_chat("http://localhost:3000", r#"{"text":"hi"}"#)).await;
    let lowered = raw.to_lowercase();

    assert!(raw.starts_with("HTTP/1.1 422"), "unexpected response: {}", raw);
    assert!(lowered.contains("content-type: application/json"), "{}", raw);
    assert!(raw.contains("\"detail\":"), "{}", raw);
    assert!(raw.contains("missing field `message`"), "{}", raw);
}

#[tokio::test]
async fn test_chat_invalid_json_uses_detail_shape() {
    let raw = raw_request(post_chat("http://localhost:3000", "{not json")).await;

    assert!(raw.starts_with("HTTP/1.1 400"), "unexpected response: {}", raw);
    assert!(raw.contains("\"detail\":"), "{}", raw);
}
