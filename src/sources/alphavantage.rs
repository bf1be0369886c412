//! Alpha Vantage API client for daily stock history.
//!
//! Free tier keys are heavily throttled (5 requests/minute, 25/day). A
//! throttled call still answers 200, with a `Note` instead of data, so every
//! response body is classified before it is used.

use reqwest::Client;
use serde_json::Value;
use tracing::{debug, error, warn};

use crate::config::ProviderConfig;
use crate::error::PredictError;
use crate::types::{RawSeries, Symbol, TimeSeriesDailyResponse, TIME_SERIES_DAILY_KEY};

/// Phrases the provider uses when it refuses a call for quota reasons.
const RATE_LIMIT_MARKERS: [&str; 2] = ["API call frequency", "rate limit"];

/// Classified result of a single provider call.
///
/// Only `Transient` is retried.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    Success(RawSeries),
    /// Network, timeout, HTTP status or body read failure.
    Transient(String),
    RateLimited,
    InvalidSymbol,
    /// Series present but not in the expected shape.
    Malformed(String),
}

/// Alpha Vantage API client.
pub struct AlphaVantageClient {
    client: Client,
    config: ProviderConfig,
}

impl AlphaVantageClient {
    /// Create a new client. The configured timeout bounds each attempt.
    pub fn new(config: ProviderConfig) -> reqwest::Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("tickercast/", env!("CARGO_PKG_VERSION")))
            .timeout(config.timeout)
            .build()?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    /// Fetch the full daily history for a symbol, retrying transport failures.
    pub async fn fetch_daily(&self, symbol: &Symbol) -> Result<RawSeries, PredictError> {
        let max_attempts = self.config.max_retries.max(1);
        let mut attempt = 0;

        loop {
            attempt += 1;

            match self.fetch_once(symbol).await {
                FetchOutcome::Success(series) => {
                    debug!("Fetched {} daily bars for {}", series.len(), symbol);
                    return Ok(series);
                }
                FetchOutcome::RateLimited => {
                    warn!("API rate limit approached");
                    return Err(PredictError::RateLimited);
                }
                FetchOutcome::InvalidSymbol => {
                    debug!("Provider returned no series for {}", symbol);
                    return Err(PredictError::InvalidSymbol);
                }
                FetchOutcome::Malformed(detail) => {
                    error!("Data processing error for {}: {}", symbol, detail);
                    return Err(PredictError::DataProcessing);
                }
                FetchOutcome::Transient(message) => {
                    warn!("Attempt {} failed: {}", attempt, message);
                    if attempt >= max_attempts {
                        error!(
                            "Failed to fetch data after {} attempts: {}",
                            max_attempts, message
                        );
                        return Err(PredictError::Transport(message));
                    }
                    tokio::time::sleep(self.config.retry_delay).await;
                }
            }
        }
    }

    /// Perform one provider call and classify it.
    pub async fn fetch_once(&self, symbol: &Symbol) -> FetchOutcome {
        let response = self
            .client
            .get(&self.config.base_url)
            .query(&[
                ("function", "TIME_SERIES_DAILY"),
                ("symbol", symbol.as_str()),
                ("apikey", self.config.api_key.as_str()),
                ("outputsize", "full"),
            ])
            .send()
            .await
            .and_then(|r| r.error_for_status());

        let response = match response {
            Ok(r) => r,
            Err(e) => return FetchOutcome::Transient(describe(e)),
        };

        match response.json::<Value>().await {
            Ok(body) => classify(body),
            Err(e) => FetchOutcome::Transient(describe(e)),
        }
    }
}

/// Classify a decoded response body.
pub fn classify(body: Value) -> FetchOutcome {
    if body.get(TIME_SERIES_DAILY_KEY).is_none() {
        let response: TimeSeriesDailyResponse =
            serde_json::from_value(body).unwrap_or_default();
        let notices = [response.note, response.information];
        let throttled = notices.iter().flatten().any(|notice| {
            RATE_LIMIT_MARKERS
                .iter()
                .any(|marker| notice.contains(marker))
        });

        return if throttled {
            FetchOutcome::RateLimited
        } else {
            FetchOutcome::InvalidSymbol
        };
    }

    match serde_json::from_value::<TimeSeriesDailyResponse>(body) {
        Ok(TimeSeriesDailyResponse {
            time_series: Some(series),
            ..
        }) => FetchOutcome::Success(series),
        Ok(_) => FetchOutcome::Malformed("time series is null".to_string()),
        Err(e) => FetchOutcome::Malformed(e.to_string()),
    }
}

/// Error text safe to hand back to clients: the request URL carries the key.
fn describe(e: reqwest::Error) -> String {
    if e.is_timeout() {
        format!("Request timed out: {}", e.without_url())
    } else {
        e.without_url().to_string()
    }
}
