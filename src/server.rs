//! JSON HTTP API for the presentation layer.
//!
//! The server loads every configured source once at startup into an
//! [`ArticleCatalog`] and answers searches from snapshots of it. `POST
//! /refresh` reloads the sources and swaps the collection in wholesale.
//! Requests already in flight finish against the snapshot they started
//! with.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET`  | `/health` | Health check (version, article count, categories) |
//! | `GET`  | `/search?q=&profile=&sort=&category=&limit=` | Ranked search results |
//! | `GET`  | `/articles/{id}` | A single article |
//! | `POST` | `/refresh` | Reload all sources |
//!
//! # Error Contract
//!
//! ```json
//! { "error": { "code": "bad_request", "message": "unknown sort order: 'x'. Use relevance or date." } }
//! ```
//!
//! Error codes: `bad_request` (400), `not_found` (404), `internal` (500).

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use newsroom_core::catalog::ArticleCatalog;
use newsroom_core::models::Article;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::config::Config;
use crate::content::{self, ArticleSource};
use crate::search::{search_articles, SearchOptions};

/// Shared application state passed to all route handlers via Axum's `State` extractor.
#[derive(Clone)]
struct AppState {
    config: Arc<Config>,
    catalog: Arc<ArticleCatalog>,
    sources: Arc<Vec<Box<dyn ArticleSource>>>,
}

/// Starts the server with the sources named in config.
pub async fn run_server(config: &Config) -> anyhow::Result<()> {
    run_server_with_sources(config, content::build_sources(config)).await
}

/// Starts the server with an explicit source list.
///
/// Lets callers serve custom [`ArticleSource`] implementations alongside
/// or instead of the configured ones.
pub async fn run_server_with_sources(
    config: &Config,
    sources: Vec<Box<dyn ArticleSource>>,
) -> anyhow::Result<()> {
    let articles = content::load_from(&sources).await?;
    let count = articles.len();

    let state = AppState {
        config: Arc::new(config.clone()),
        catalog: Arc::new(ArticleCatalog::new(articles)),
        sources: Arc::new(sources),
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/health", get(handle_health))
        .route("/search", get(handle_search))
        .route("/articles/{id}", get(handle_get_article))
        .route("/refresh", post(handle_refresh))
        .layer(cors)
        .with_state(state);

    let bind_addr = &config.server.bind;
    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    tracing::info!(bind = %bind_addr, articles = count, "server listening");
    println!("Newsroom search listening on http://{}", bind_addr);

    axum::serve(listener, app).await?;
    Ok(())
}

// ============ Error response ============

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    code: String,
    message: String,
}

struct AppError {
    status: StatusCode,
    code: &'static str,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: ErrorDetail {
                code: self.code.to_string(),
                message: self.message,
            },
        };
        (self.status, Json(body)).into_response()
    }
}

fn bad_request(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::BAD_REQUEST,
        code: "bad_request",
        message: message.into(),
    }
}

fn not_found(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::NOT_FOUND,
        code: "not_found",
        message: message.into(),
    }
}

fn internal(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        code: "internal",
        message: message.into(),
    }
}

// ============ GET /health ============

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
    articles: usize,
    categories: Vec<String>,
}

async fn handle_health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        articles: state.catalog.len(),
        categories: state.catalog.categories(),
    })
}

// ============ GET /search ============

#[derive(Debug, Deserialize)]
struct SearchParams {
    #[serde(default)]
    q: String,
    profile: Option<String>,
    sort: Option<String>,
    category: Option<String>,
    limit: Option<usize>,
}

async fn handle_search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<serde_json::Value>, AppError> {
    let snapshot = state.catalog.snapshot();
    let opts = SearchOptions {
        profile: params.profile,
        sort: params.sort,
        category: params.category,
        limit: params.limit,
    };

    // The response borrows from the snapshot, so serialize before it drops.
    let response = search_articles(&state.config, &snapshot, &params.q, &opts)
        .map_err(|e| bad_request(format!("{:#}", e)))?;
    let body = serde_json::to_value(&response).map_err(|e| internal(e.to_string()))?;
    Ok(Json(body))
}

// ============ GET /articles/{id} ============

async fn handle_get_article(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Article>, AppError> {
    state
        .catalog
        .get(&id)
        .map(Json)
        .ok_or_else(|| not_found(format!("article not found: {}", id)))
}

// ============ POST /refresh ============

#[derive(Serialize)]
struct RefreshResponse {
    articles: usize,
}

async fn handle_refresh(State(state): State<AppState>) -> Result<Json<RefreshResponse>, AppError> {
    let articles = content::load_from(&state.sources).await.map_err(|e| {
        tracing::error!(error = %format!("{:#}", e), "refresh failed; keeping current articles");
        internal(format!("{:#}", e))
    })?;
    let count = state.catalog.replace(articles);
    tracing::info!(articles = count, "catalog refreshed");
    Ok(Json(RefreshResponse { articles: count }))
}
