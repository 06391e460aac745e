//! HTTP route handlers for the engine host.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use crate::engine::{EngineError, InvidiousEngine, SearchRequest, TimeRange, VideoResult};

use super::state::AppState;

/// Create the API router with all routes.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/search", get(video_search))
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> impl IntoResponse {
    let about = InvidiousEngine::about();
    Json(serde_json::json!({
        "status": "ok",
        "service": "invidious-engine",
        "engine": about.name,
        "categories": about.categories,
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Search query string parameters.
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    /// The search query.
    pub q: String,
    /// Page number, 1-based.
    pub pageno: Option<u32>,
    /// Time range ("day", "week", "month", "year").
    pub time_range: Option<String>,
    /// Language tag such as "en-US".
    pub language: Option<String>,
}

impl From<SearchParams> for SearchRequest {
    fn from(params: SearchParams) -> Self {
        let mut request = Self::new(params.q).with_page(params.pageno.unwrap_or(1));
        if let Some(range) = params.time_range {
            request = request.with_time_range(TimeRange::from(range));
        }
        if let Some(language) = params.language {
            request = request.with_language(language);
        }
        request
    }
}

/// Video search response.
#[derive(Debug, Serialize)]
pub struct SearchResponse {
    /// Normalized results.
    pub results: Vec<VideoResult>,
    /// Number of results.
    pub count: usize,
    /// Items that were dropped because they were malformed.
    pub failures: Vec<String>,
}

/// Map an engine error to an HTTP status.
fn status_for(error: &EngineError) -> StatusCode {
    match error {
        EngineError::HttpRequest(_) | EngineError::Upstream(_) | EngineError::InvalidPayload(_) => {
            StatusCode::BAD_GATEWAY
        }
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Handle video search requests.
async fn video_search(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>, (StatusCode, String)> {
    let request = SearchRequest::from(params);
    let resolved = state.engine.request(&request);

    let body = state
        .fetch(&resolved)
        .await
        .map_err(|e| (status_for(&e), format!("Search error: {e}")))?;

    let normalized = state
        .engine
        .response(&body, &resolved)
        .map_err(|e| (status_for(&e), format!("Search error: {e}")))?;

    let failures: Vec<String> = normalized.failures.iter().map(ToString::to_string).collect();
    let count = normalized.results.len();

    Ok(Json(SearchResponse {
        results: normalized.results,
        count,
        failures,
    }))
}
