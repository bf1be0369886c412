use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Key holding the daily bars in a `TIME_SERIES_DAILY` payload.
pub const TIME_SERIES_DAILY_KEY: &str = "Time Series (Daily)";

/// Raw daily series as delivered by the provider, keyed by `YYYY-MM-DD`.
///
/// Order is whatever the provider sent; the feature pipeline sorts it.
pub type RawSeries = HashMap<String, RawBar>;

/// One unparsed daily bar. Alpha Vantage encodes every number as a string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawBar {
    #[serde(rename = "1. open")]
    pub open: String,
    #[serde(rename = "2. high")]
    pub high: String,
    #[serde(rename = "3. low")]
    pub low: String,
    #[serde(rename = "4. close")]
    pub close: String,
    #[serde(rename = "5. volume")]
    pub volume: String,
}

/// Expected shape of a `TIME_SERIES_DAILY` response.
///
/// Every field is optional because the provider answers errors and rate
/// limits with a 200 and a different body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TimeSeriesDailyResponse {
    #[serde(rename = "Meta Data")]
    pub meta_data: Option<TimeSeriesMetaData>,
    #[serde(rename = "Time Series (Daily)")]
    pub time_series: Option<RawSeries>,
    #[serde(rename = "Note")]
    pub note: Option<String>,
    #[serde(rename = "Information")]
    pub information: Option<String>,
    #[serde(rename = "Error Message")]
    pub error_message: Option<String>,
}

/// Time series meta data.
#[derive(Debug, Clone, Deserialize)]
pub struct TimeSeriesMetaData {
    #[serde(rename = "1. Information")]
    pub information: Option<String>,
    #[serde(rename = "2. Symbol")]
    pub symbol: Option<String>,
    #[serde(rename = "3. Last Refreshed")]
    pub last_refreshed: Option<String>,
}
