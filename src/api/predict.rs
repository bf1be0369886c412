//! Prediction and feature table endpoints.

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};

use crate::error::{AppError, Result};
use crate::types::{FeatureTable, PredictionResult, Symbol};
use crate::AppState;

/// Create the prediction router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/predict/", get(missing_symbol))
        .route("/predict/:symbol", get(predict))
        .route("/features/", get(missing_symbol))
        .route("/features/:symbol", get(features))
}

fn validate(raw: &str) -> Result<Symbol> {
    Symbol::parse(raw).ok_or_else(|| AppError::BadRequest("Invalid stock symbol".to_string()))
}

async fn missing_symbol() -> AppError {
    AppError::BadRequest("Invalid stock symbol".to_string())
}

/// GET /predict/:symbol
async fn predict(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
) -> Result<Json<PredictionResult>> {
    let symbol = validate(&symbol)?;
    let result = state.predictor.predict(&symbol).await?;
    Ok(Json(result))
}

/// GET /features/:symbol
async fn features(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
) -> Result<Json<FeatureTable>> {
    let symbol = validate(&symbol)?;
    let rows = state.predictor.features(&symbol).await?;
    Ok(Json(FeatureTable {
        symbol: symbol.to_string(),
        rows: rows.as_ref().clone(),
    }))
}
