//! Next-day close prediction.
//!
//! [`PredictionService`] owns the provider client and the per-symbol feature
//! cache. Every prediction refits the model from scratch on the cached table.

use chrono::Duration as ChronoDuration;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info};

use super::cache::Cache;
use super::features::build_features;
use super::model::{ForestConfig, ScaledForest};
use crate::error::PredictError;
use crate::sources::AlphaVantageClient;
use crate::types::{round2, FeatureRow, PredictionResult, Symbol, FEATURE_NAMES, MODEL_NAME};

/// What the cache holds per symbol: the feature table, or why there is none.
pub type FeatureOutcome = Result<Arc<Vec<FeatureRow>>, PredictError>;

/// Regression inputs for one row, in [`FEATURE_NAMES`] order.
fn feature_vector(row: &FeatureRow, days: f64) -> Vec<f64> {
    vec![days, row.daily_return, row.sma_5, row.sma_20, row.macd]
}

/// Build the design matrix and close-price targets for a feature table.
pub fn design_matrix(rows: &[FeatureRow]) -> (Vec<Vec<f64>>, Vec<f64>) {
    let first = match rows.first() {
        Some(row) => row.date,
        None => return (Vec::new(), Vec::new()),
    };

    rows.iter()
        .map(|row| {
            let days = (row.date - first).num_days() as f64;
            (feature_vector(row, days), row.close)
        })
        .unzip()
}

/// Fit a model on the whole table and predict the close after the last row.
///
/// The day counter is advanced by one; the other inputs are carried forward
/// from the last observed row unchanged.
pub fn predict_next(
    symbol: &Symbol,
    rows: &[FeatureRow],
    config: &ForestConfig,
) -> Result<PredictionResult, PredictError> {
    let (first, last) = match (rows.first(), rows.last()) {
        (Some(first), Some(last)) => (first, last),
        _ => return Err(PredictError::InsufficientData),
    };

    let (x, y) = design_matrix(rows);

    let mut model = ScaledForest::new(config.clone());
    let predicted = model
        .fit(&x, &y)
        .and_then(|_| {
            let next_day = (last.date - first.date).num_days() as f64 + 1.0;
            model.predict_one(&feature_vector(last, next_day))
        })
        .map_err(|e| {
            error!("Prediction error: {}", e);
            PredictError::PredictionFailed(e.to_string())
        })?;

    Ok(PredictionResult {
        symbol: symbol.to_string(),
        predicted_price: round2(predicted),
        last_close: round2(last.close),
        prediction_date: (last.date + ChronoDuration::days(1))
            .format("%Y-%m-%d")
            .to_string(),
        model: MODEL_NAME.to_string(),
        features_used: FEATURE_NAMES.iter().map(|s| s.to_string()).collect(),
    })
}

/// Fetch, feature and predict pipeline shared by all request handlers.
pub struct PredictionService {
    client: AlphaVantageClient,
    cache: Cache<FeatureOutcome>,
    forest: ForestConfig,
}

impl PredictionService {
    pub fn new(client: AlphaVantageClient, cache_ttl: Duration, forest: ForestConfig) -> Arc<Self> {
        Arc::new(Self {
            client,
            cache: Cache::new(cache_ttl),
            forest,
        })
    }

    /// Feature table for a symbol, served from cache within the TTL.
    ///
    /// Failures are cached as well, so a rate-limited symbol is not retried
    /// against the provider until its entry expires.
    pub async fn features(&self, symbol: &Symbol) -> FeatureOutcome {
        self.cache
            .get_or_compute(symbol.as_str(), || async {
                let series = self.client.fetch_daily(symbol).await?;
                let rows = build_features(&series)?;
                Ok::<_, PredictError>(Arc::new(rows))
            })
            .await
    }

    /// Predict the next close for a symbol.
    pub async fn predict(&self, symbol: &Symbol) -> Result<PredictionResult, PredictError> {
        let rows = self.features(symbol).await?;
        if rows.is_empty() {
            return Err(PredictError::InsufficientData);
        }

        debug!("Fitting model for {} on {} rows", symbol, rows.len());
        let forest = self.forest.clone();
        let target = symbol.clone();
        let result = tokio::task::spawn_blocking(move || predict_next(&target, &rows, &forest))
            .await
            .map_err(|e| {
                error!("Prediction error: {}", e);
                PredictError::PredictionFailed(e.to_string())
            })??;

        info!(
            "Predicted {} for {}: {} (last close {})",
            result.prediction_date, symbol, result.predicted_price, result.last_close
        );
        Ok(result)
    }

    /// Drop expired cache entries.
    pub fn sweep_cache(&self) -> usize {
        self.cache.cleanup()
    }

    pub fn cached_symbols(&self) -> usize {
        self.cache.len()
    }
}
