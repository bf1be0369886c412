//! tickercast - next-day stock close prediction server

pub mod api;
pub mod config;
pub mod error;
pub mod services;
pub mod sources;
pub mod types;

use axum::response::{IntoResponse, Response};
use axum::Router;
use config::Config;
use services::{ForestConfig, PredictionService};
use sources::AlphaVantageClient;
use std::any::Any;
use std::sync::Arc;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub predictor: Arc<PredictionService>,
}

impl AppState {
    /// Build the process-wide state: provider client plus an empty cache.
    pub fn new(config: Config) -> reqwest::Result<Self> {
        let client = AlphaVantageClient::new(config.provider.clone())?;
        let predictor = PredictionService::new(client, config.cache.ttl, ForestConfig::default());

        Ok(Self {
            config: Arc::new(config),
            predictor,
        })
    }
}

/// Build the full HTTP application.
pub fn app(state: AppState) -> Router {
    api::router(&state.config.frontend_origin)
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");

    error::AppError::Internal(detail.to_string()).into_response()
}

// Re-export commonly used types
pub use error::{AppError, PredictError};
pub use types::*;
