//! Control API server
//!
//! The surface external collaborators use: fetch the latest summary,
//! clean the current target in place, or forward arbitrary text to the
//! remote scoring endpoint. A message arriving before the session exists
//! initializes it on demand and retries once.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Deserialize;
use snip_config::Config;
use snip_core::Error;
use snip_remote::ScoringClient;
use tokio::net::TcpListener;
use tokio::sync::RwLock;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use crate::session::Session;

pub struct ControlServer {
    pub session: Arc<RwLock<Option<Session>>>,
    pub config: Config,
}

#[derive(Clone)]
struct AppState {
    server: Arc<ControlServer>,
}

#[derive(Deserialize)]
struct AnalyzeRequest {
    text: String,
}

/// Bind the control API and serve until shutdown.
pub async fn serve(config: Config) -> anyhow::Result<()> {
    let addr = format!("{}:{}", config.server.host, config.server.port);

    let server = Arc::new(ControlServer {
        session: Arc::new(RwLock::new(None)),
        config,
    });
    let state = AppState { server };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/", get(handle_info))
        .route("/api/summary", get(api_summary))
        .route("/api/clean", post(api_clean))
        .route("/api/analyze", post(api_analyze))
        .layer(cors)
        .with_state(state);

    let listener = TcpListener::bind(&addr).await?;
    info!("control server listening on {}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}

/// GET handler for server info/health check
async fn handle_info() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "name": "snip",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Initialize the session on demand. This is the retry-once recovery for
/// control messages that arrive before the core is active.
async fn ensure_session(server: &ControlServer) {
    let mut guard = server.session.write().await;
    if guard.is_none() {
        info!("session not active, initializing on demand");
        let mut session = Session::new(server.config.clone());
        session.init_rules().await;
        *guard = Some(session);
    }
}

/// GET /api/summary - latest summary for the current target, or null
async fn api_summary(State(state): State<AppState>) -> Response {
    ensure_session(&state.server).await;
    let guard = state.server.session.read().await;
    match guard.as_ref() {
        Some(session) => Json(session.summary().cloned()).into_response(),
        None => (StatusCode::INTERNAL_SERVER_ERROR, Error::NotInjected.to_string()).into_response(),
    }
}

/// POST /api/clean - apply the rule engine to the current target in place
async fn api_clean(State(state): State<AppState>) -> Response {
    ensure_session(&state.server).await;
    let mut guard = state.server.session.write().await;
    let Some(session) = guard.as_mut() else {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Error::NotInjected.to_string(),
        )
            .into_response();
    };

    match session.clean_current() {
        Ok(summary) => Json(serde_json::json!({
            "status": "cleaned",
            "summary": summary,
        }))
        .into_response(),
        // Having nothing to clean is a no-op status, not an error.
        Err(Error::NoActiveTarget) => Json(serde_json::json!({
            "status": "noop",
            "reason": "no active editable target",
        }))
        .into_response(),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response(),
    }
}

/// POST /api/analyze - forward text to the remote scoring endpoint
async fn api_analyze(
    State(state): State<AppState>,
    Json(req): Json<AnalyzeRequest>,
) -> Response {
    let Some(endpoint) = state.server.config.remote.endpoint.clone() else {
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(serde_json::json!({"error": "no remote endpoint configured"})),
        )
            .into_response();
    };

    let client =
        ScoringClient::new(endpoint).with_block_above(state.server.config.remote.block_above);
    match client.score(&req.text).await {
        Ok(scored) => Json(serde_json::json!({
            "maxSimilarity": scored.max_similarity,
            "cleaned": scored.cleaned,
        }))
        .into_response(),
        Err(Error::RemoteAnalysis { status, body }) => (
            StatusCode::BAD_GATEWAY,
            Json(serde_json::json!({
                "error": "remote analysis failed",
                "status": status,
                "body": body,
            })),
        )
            .into_response(),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response(),
    }
}
