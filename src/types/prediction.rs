use serde::{Deserialize, Serialize};

/// Model name reported alongside every prediction.
pub const MODEL_NAME: &str = "Enhanced RandomForestRegressor";

/// Column names of the regression inputs, in vector order.
pub const FEATURE_NAMES: [&str; 5] = ["Days", "Daily_Return", "SMA_5", "SMA_20", "MACD"];

/// One-step-ahead close estimate for a symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub symbol: String,
    pub predicted_price: f64,
    pub last_close: f64,
    /// Last observed date plus one calendar day, `YYYY-MM-DD`.
    pub prediction_date: String,
    pub model: String,
    pub features_used: Vec<String>,
}

/// Round to cents.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
