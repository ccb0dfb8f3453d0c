//! HTTP surface: submit an instruction, probe health.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;

use crate::error::{Error, Result};
use crate::orchestration::{Orchestrator, TaskResponse};
use crate::{sblog, sblog_error};

#[derive(Debug, Deserialize)]
pub struct ChatMessage {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: String,
}

pub type ApiError = (StatusCode, Json<Value>);
pub type ApiResult<T> = std::result::Result<Json<T>, ApiError>;

pub fn api_error(status: StatusCode, detail: impl Into<String>) -> ApiError {
    (status, Json(json!({ "detail": detail.into() })))
}

pub async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        timestamp: chrono::Local::now().to_rfc3339(),
    })
}

/// Malformed bodies keep axum's status code but use the `detail` shape.
pub async fn handle_chat(
    State(orchestrator): State<Arc<Orchestrator>>,
    payload: std::result::Result<Json<ChatMessage>, JsonRejection>,
) -> ApiResult<TaskResponse> {
    let Json(request) = payload.map_err(|rejection| {
        sblog_error!("rejected chat request: {}", rejection.body_text());
        api_error(rejection.status(), rejection.body_text())
    })?;
    let response = orchestrator
        .execute_instruction(&request.message)
        .await
        .map_err(|err| {
            sblog_error!("chat request failed: {}", err);
            api_error(StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
        })?;
    Ok(Json(response))
}

pub fn build_router(orchestrator: Arc<Orchestrator>) -> Router {
    Router::new()
        .route("/api/health", get(handle_health))
        .route("/api/chat", post(handle_chat))
        .layer(CorsLayer::permissive())
        .with_state(orchestrator)
}

pub async fn run_server(orchestrator: Arc<Orchestrator>, addr: &str) -> Result<()> {
    let addr: SocketAddr = addr
        .parse()
        .map_err(|e| Error::Validation(format!("invalid bind address '{}': {}", addr, e)))?;

    let listener = tokio::net::TcpListener::bind(addr).await?;
    sblog!("server listening on {}", addr);
    println!(
        "Listening on http://{} (chat: POST /api/chat, health: GET /api/health)",
        addr
    );

    axum::serve(listener, build_router(orchestrator))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| Error::Server(e.to_string()))?;

    sblog!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            sblog_error!("failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                sblog_error!("failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => { println!("\nReceived Ctrl+C, shutting down..."); }
        _ = terminate => { println!("\nReceived SIGTERM, shutting down..."); }
    }
}
