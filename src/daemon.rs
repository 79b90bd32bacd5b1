//! HTTP daemon exposing the analyzer behind bearer-token auth.
//!
//! A single `POST /analyze` endpoint reuses the prompt/exec/llm modules for
//! remote callers, returning JSON instead of console text. The token guard is
//! a middleware composed in front of the route, so authentication runs before
//! any body processing or side effect.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context as AnyhowContext, Result};
use axum::extract::{Request, State};
use axum::http::{header, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info, warn};

use crate::config::Settings;
use crate::exec;
use crate::llm::LlmClient;
use crate::prompt::build_prompt;

/// Local execution timeout for daemon requests.
const EXEC_TIMEOUT: Duration = Duration::from_secs(30);

/// Timeout for the outbound LLM call.
const WEB_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Clone)]
struct AppState {
    settings: Arc<Settings>,
}

/// Request body for `POST /analyze`.
#[derive(Debug, Deserialize)]
struct AnalyzeRequest {
    cmd: Option<String>,
    script: Option<String>,
    #[serde(default)]
    exec: bool,
    #[serde(default)]
    docker: bool,
    model: Option<String>,
}

/// Build the daemon router.
pub fn router(settings: Settings) -> Router {
    let state = AppState {
        settings: Arc::new(settings),
    };
    Router::new()
        .route("/analyze", post(analyze))
        .layer(middleware::from_fn_with_state(state.clone(), require_token))
        .with_state(state)
}

/// Run the daemon until the listener fails.
pub async fn serve(settings: Settings, listen: &str) -> Result<()> {
    if settings.daemon_token.is_none() {
        warn!("CMDLENS_DAEMON_TOKEN is not set; every request will be rejected with 401");
    }

    let listener = tokio::net::TcpListener::bind(listen)
        .await
        .with_context(|| format!("Failed to bind to {}", listen))?;
    info!("Daemon listening on {}", listen);

    axum::serve(listener, router(settings))
        .await
        .context("Daemon server failed")
}

/// Bearer-token guard. A missing or mismatched token, or a server with no
/// token configured, short-circuits with 401 and an empty body.
async fn require_token(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let presented = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));

    let authorized = match (&state.settings.daemon_token, presented) {
        (Some(expected), Some(token)) => constant_time_eq(expected.as_bytes(), token.as_bytes()),
        _ => false,
    };

    if !authorized {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    next.run(request).await
}

/// Constant-time comparison for the shared secret.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }
    diff == 0
}

async fn analyze(State(state): State<AppState>, Json(request): Json<AnalyzeRequest>) -> Response {
    let text = request
        .cmd
        .filter(|t| !t.is_empty())
        .or(request.script.filter(|t| !t.is_empty()));
    let Some(text) = text else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "missing cmd/script"})),
        )
            .into_response();
    };

    let mut exec_output = None;
    if request.exec {
        if request.docker {
            // Unlike the CLI, there is no interactive confirmation channel
            // here, so an unavailable sandbox is a rejection, not a fallback.
            if !exec::docker_available() {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(json!({"error": "docker not available on host"})),
                )
                    .into_response();
            }
            exec_output = Some(exec::run_in_docker(&text, EXEC_TIMEOUT).await);
        } else {
            exec_output = Some(exec::run_local(&text, EXEC_TIMEOUT, true).await);
        }
    }

    let prompt = build_prompt(&text, exec_output.as_deref(), None);

    let (Some(api_key), Some(api_url)) = (
        state.settings.api_key.clone(),
        state.settings.api_url.clone(),
    ) else {
        return Json(json!({"prompt": prompt, "exec_output": exec_output})).into_response();
    };

    let model = request
        .model
        .unwrap_or_else(|| state.settings.default_model.clone());
    let client = LlmClient::new(api_url, api_key);

    match client.analyze(&model, &prompt, WEB_TIMEOUT, 0.0).await {
        Ok(analysis) => {
            Json(json!({"analysis": analysis, "exec_output": exec_output})).into_response()
        }
        Err(e) => {
            error!("LLM call failed: {:#}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": "api error", "detail": e.to_string()})),
            )
                .into_response()
        }
    }
}
