//! HTTP routes.
//!
//! - `POST /api/training/generate` — authenticated content generation.
//!   Always answers 200 once authenticated and configured, including when
//!   the content is a fallback (see `meta.source` / `meta.status`).
//! - `GET /health` — liveness plus cache and queue gauges. No authentication.

use std::sync::Arc;
use std::time::Instant;

use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::HeaderMap;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::auth::{TokenVerifier, authenticate};
use super::error::ApiError;
use crate::TrainingContentService;
use crate::types::{
    Domain, GeneratedContent, GenerationRequest, Level, SessionMetadata, TrainingType,
};

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    service: Arc<TrainingContentService>,
    verifier: Arc<dyn TokenVerifier>,
    started_at: Instant,
}

impl AppState {
    pub fn new(service: Arc<TrainingContentService>, verifier: Arc<dyn TokenVerifier>) -> Self {
        Self {
            service,
            verifier,
            started_at: Instant::now(),
        }
    }
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/training/generate", post(generate))
        .route("/health", get(health))
        .with_state(state)
}

/// Body of a generation request.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateBody {
    pub training_type: TrainingType,
    pub level: Level,
    pub domain: Domain,
    #[serde(default)]
    pub session_id: Option<String>,
}

impl GenerateBody {
    fn into_request(self) -> GenerationRequest {
        let request = GenerationRequest::new(self.training_type, self.level, self.domain);
        match self.session_id.filter(|id| !id.trim().is_empty()) {
            Some(id) => request.with_session_id(id),
            None => request,
        }
    }
}

/// Successful generation response.
#[derive(Debug, Clone, Serialize)]
pub struct GenerateResponse {
    pub success: bool,
    pub content: GeneratedContent,
    pub meta: SessionMetadata,
}

/// POST /api/training/generate
async fn generate(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<GenerateBody>, JsonRejection>,
) -> Result<Json<GenerateResponse>, ApiError> {
    authenticate(&headers, state.verifier.as_ref())?;
    let Json(body) = body.map_err(|e| ApiError::invalid_input(e.body_text()))?;

    let request = body.into_request();
    debug!(
        session_id = request.session_id(),
        key = request.cache_key(),
        "generation requested"
    );

    let outcome = state.service.generate_content(&request).await?;
    Ok(Json(GenerateResponse {
        success: true,
        content: outcome.content,
        meta: outcome.meta,
    }))
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub uptime_seconds: u64,
    pub cache: CacheHealth,
    pub queue: QueueHealth,
}

#[derive(Debug, Clone, Serialize)]
pub struct CacheHealth {
    pub entries: u64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueHealth {
    pub active: usize,
    pub pending: usize,
    pub max_concurrent: usize,
}

/// GET /health
async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let queue = state.service.queue();
    Json(HealthResponse {
        status: "healthy",
        version: crate::PKG_VERSION,
        uptime_seconds: state.started_at.elapsed().as_secs(),
        cache: CacheHealth {
            entries: state.service.cache().len().await,
        },
        queue: QueueHealth {
            active: queue.active(),
            pending: queue.pending(),
            max_concurrent: queue.max_concurrent(),
        },
    })
}
