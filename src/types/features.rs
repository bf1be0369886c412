use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A trading day with every derived indicator defined.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureRow {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
    /// Percentage change from the previous close, as a fraction.
    pub daily_return: f64,
    pub sma_5: f64,
    pub sma_20: f64,
    pub ema_12: f64,
    pub ema_26: f64,
    pub macd: f64,
}

/// Feature table response for the history endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureTable {
    pub symbol: String,
    pub rows: Vec<FeatureRow>,
}
