//! HTTP front end for the retrieval engine.
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `POST` | `/api/chat` | `{"message": "..."}` in, `{"response": "..."}` out |
//! | `GET`  | `/health` | Engine status and record count |
//!
//! When the knowledge base failed to load the server still starts, and every
//! chat request gets the configured "unavailable" reply.

use anyhow::Result;
use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

use crate::config::ServerConfig;
use crate::retriever::RetrievalEngine;

#[derive(Clone)]
struct AppState {
    engine: Option<Arc<RetrievalEngine>>,
    config: Arc<ServerConfig>,
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub records: usize,
}

pub fn router(engine: Option<Arc<RetrievalEngine>>, config: &ServerConfig) -> Router {
    let state = AppState {
        engine,
        config: Arc::new(config.clone()),
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/chat", post(handle_chat))
        .route("/health", get(handle_health))
        .layer(cors)
        .with_state(state)
}

/// Binds `config.bind` and serves until the process is terminated.
pub async fn run_server(engine: Option<Arc<RetrievalEngine>>, config: &ServerConfig) -> Result<()> {
    let listener = TcpListener::bind(&config.bind).await?;
    serve(listener, engine, config).await
}

pub async fn serve(
    listener: TcpListener,
    engine: Option<Arc<RetrievalEngine>>,
    config: &ServerConfig,
) -> Result<()> {
    if engine.is_none() {
        warn!("serving without a knowledge base; chat requests will get the unavailable reply");
    }
    info!(addr = %listener.local_addr()?, "listening");

    axum::serve(listener, router(engine, config)).await?;
    Ok(())
}

async fn handle_chat(
    State(state): State<AppState>,
    Json(req): Json<ChatRequest>,
) -> Json<ChatResponse> {
    let Some(engine) = state.engine.as_ref() else {
        return reply(&state.config.unavailable_reply);
    };

    let message = req.message.unwrap_or_default();
    if message.is_empty() {
        return reply(&state.config.empty_message_reply);
    }

    reply(&engine.get_response(&message))
}

async fn handle_health(State(state): State<AppState>) -> Json<HealthResponse> {
    let (status, records) = match state.engine.as_ref() {
        Some(engine) => ("ok", engine.len()),
        None => ("unavailable", 0),
    };
    Json(HealthResponse {
        status: status.to_string(),
        records,
    })
}

fn reply(text: &str) -> Json<ChatResponse> {
    Json(ChatResponse {
        response: text.to_string(),
    })
}
