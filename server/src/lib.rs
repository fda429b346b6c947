use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    routing::get,
    Json, Router,
};
use search_core::{Engine, EngineError, EngineStatus, SearchHit};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

type ApiError = (StatusCode, String);

/// Upper bound on hits returned by `/search`, with or without `k`.
pub const MAX_RESULTS: usize = 100;

#[derive(Deserialize)]
pub struct SearchParams {
    pub q: String,
    /// Result limit, capped at [`MAX_RESULTS`]. Falls back to the engine's
    /// configured `top_k`, then to the cap. `k=0` returns no hits.
    pub k: Option<usize>,
}

#[derive(Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub took_s: f64,
    pub total_hits: usize,
    pub results: Vec<SearchHit>,
}

#[derive(Serialize)]
pub struct DocSummary {
    pub id: String,
    pub terms: usize,
    pub bytes: usize,
}

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<Engine>,
    pub admin_token: Option<String>,
}

impl AppState {
    pub fn new(engine: Arc<Engine>) -> Self {
        Self { engine, admin_token: None }
    }

    /// Takes the admin token from `ADMIN_TOKEN` when set.
    pub fn from_env(engine: Arc<Engine>) -> Self {
        Self { engine, admin_token: std::env::var("ADMIN_TOKEN").ok() }
    }
}

pub fn build_app(state: AppState) -> Router {
    // CORS: read CORS_ALLOW_ORIGIN (comma-separated) or allow Any by default
    let cors = match std::env::var("CORS_ALLOW_ORIGIN") {
        Ok(val) => {
            let origins: Vec<_> = val
                .split(',')
                .filter_map(|s| s.trim().parse().ok())
                .collect();
            if origins.is_empty() {
                CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any)
            } else {
                CorsLayer::new().allow_origin(AllowOrigin::list(origins)).allow_methods(Any).allow_headers(Any)
            }
        }
        Err(_) => CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any),
    };

    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/status", get(status_handler))
        .route("/search", get(search_handler))
        .route("/documents", get(list_handler).delete(clear_handler))
        .route("/documents/*id", get(doc_handler).post(upload_handler).delete(delete_handler))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

pub async fn search_handler(State(state): State<AppState>, Query(params): Query<SearchParams>) -> Json<SearchResponse> {
    let start = std::time::Instant::now();
    let k = params
        .k
        .or(state.engine.config().top_k)
        .map_or(MAX_RESULTS, |k| k.min(MAX_RESULTS));
    let results = state.engine.search(&params.q, Some(k));
    let elapsed = start.elapsed();
    Json(SearchResponse { query: params.q, took_s: elapsed.as_secs_f64(), total_hits: results.len(), results })
}

pub async fn status_handler(State(state): State<AppState>) -> Json<EngineStatus> {
    Json(state.engine.status())
}

async fn list_handler(State(state): State<AppState>) -> Json<Vec<DocSummary>> {
    let docs = state
        .engine
        .list_documents()
        .iter()
        .map(|d| DocSummary { id: d.id.clone(), terms: d.terms.len(), bytes: d.text.len() })
        .collect();
    Json(docs)
}

async fn doc_handler(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<serde_json::Value>, ApiError> {
    let doc = state.engine.document(&id).map_err(engine_error)?;
    Ok(Json(serde_json::json!({
        "id": doc.id,
        "text": doc.text,
        "terms": doc.terms.len(),
    })))
}

async fn upload_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(StatusCode, Json<DocSummary>), ApiError> {
    authorize(&state, &headers)?;
    let doc = state.engine.upload(id, &body).map_err(engine_error)?;
    let summary = DocSummary { id: doc.id.clone(), terms: doc.terms.len(), bytes: doc.text.len() };
    Ok((StatusCode::CREATED, Json(summary)))
}

async fn delete_handler(State(state): State<AppState>, Path(id): Path<String>, headers: HeaderMap) -> Result<StatusCode, ApiError> {
    authorize(&state, &headers)?;
    state.engine.delete_document(&id).map_err(engine_error)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn clear_handler(State(state): State<AppState>, headers: HeaderMap) -> Result<StatusCode, ApiError> {
    authorize(&state, &headers)?;
    state.engine.clear_history();
    Ok(StatusCode::NO_CONTENT)
}

fn engine_error(err: EngineError) -> ApiError {
    let status = match err {
        EngineError::Encoding(_) => StatusCode::UNPROCESSABLE_ENTITY,
        EngineError::DuplicateId(_) => StatusCode::CONFLICT,
        EngineError::NotFound(_) => StatusCode::NOT_FOUND,
        EngineError::NotReady => StatusCode::SERVICE_UNAVAILABLE,
    };
    (status, err.to_string())
}

// Without ADMIN_TOKEN the mutating routes are open.
fn authorize(state: &AppState, headers: &HeaderMap) -> Result<(), ApiError> {
    let Some(required) = &state.admin_token else {
        return Ok(());
    };
    let provided = headers.get("X-ADMIN-TOKEN").and_then(|v| v.to_str().ok()).unwrap_or("");
    if provided == required {
        Ok(())
    } else {
        Err((StatusCode::UNAUTHORIZED, "invalid admin token".into()))
    }
}
