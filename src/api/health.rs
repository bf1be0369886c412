use crate::AppState;
use axum::{routing::get, Json, Router};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    timestamp: String,
    version: &'static str,
}

/// Service index listing the public endpoints.
#[derive(Serialize)]
struct IndexResponse {
    status: &'static str,
    version: &'static str,
    endpoints: [&'static str; 3],
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true),
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn index() -> Json<IndexResponse> {
    Json(IndexResponse {
        status: "running",
        version: env!("CARGO_PKG_VERSION"),
        endpoints: ["/health", "/predict/:symbol", "/features/:symbol"],
    })
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
}
