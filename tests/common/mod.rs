//! Shared helpers: a local stand-in for the market data provider.

#![allow(dead_code)]

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::{Duration as ChronoDuration, NaiveDate};
use serde_json::{json, Map, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tickercast::config::{Config, ProviderConfig};

/// How the mock provider answers.
#[derive(Clone)]
pub enum Behavior {
    /// Always answer 200 with this body.
    Json(Value),
    /// Sleep before answering, to trip the client timeout.
    Hang(Duration),
    /// Answer with this status and an empty object.
    Status(StatusCode),
    /// Answer 503 for the first `failures` calls, then this body.
    FailThen { failures: usize, body: Value },
}

pub struct MockProvider {
    pub url: String,
    hits: Arc<AtomicUsize>,
    hit_times: Arc<Mutex<Vec<Instant>>>,
    last_query: Arc<Mutex<HashMap<String, String>>>,
}

impl MockProvider {
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    pub fn hit_times(&self) -> Vec<Instant> {
        self.hit_times.lock().unwrap().clone()
    }

    pub fn last_query(&self) -> HashMap<String, String> {
        self.last_query.lock().unwrap().clone()
    }
}

#[derive(Clone)]
struct MockState {
    behavior: Behavior,
    hits: Arc<AtomicUsize>,
    hit_times: Arc<Mutex<Vec<Instant>>>,
    last_query: Arc<Mutex<HashMap<String, String>>>,
}

async fn query(
    State(state): State<MockState>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let call = state.hits.fetch_add(1, Ordering::SeqCst);
    state.hit_times.lock().unwrap().push(Instant::now());
    *state.last_query.lock().unwrap() = params;

    match state.behavior {
        Behavior::Json(body) => Json(body).into_response(),
        Behavior::Hang(delay) => {
            tokio::time::sleep(delay).await;
            Json(json!({})).into_response()
        }
        Behavior::Status(status) => (status, Json(json!({}))).into_response(),
        Behavior::FailThen { failures, body } => {
            if call < failures {
                (StatusCode::SERVICE_UNAVAILABLE, Json(json!({}))).into_response()
            } else {
                Json(body).into_response()
            }
        }
    }
}

/// Start a mock provider on an ephemeral local port.
pub async fn spawn_provider(behavior: Behavior) -> MockProvider {
    let hits = Arc::new(AtomicUsize::new(0));
    let hit_times = Arc::new(Mutex::new(Vec::new()));
    let last_query = Arc::new(Mutex::new(HashMap::new()));

    let state = MockState {
        behavior,
        hits: hits.clone(),
        hit_times: hit_times.clone(),
        last_query: last_query.clone(),
    };

    let app = Router::new().route("/query", get(query)).with_state(state);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    MockProvider {
        url: format!("http://{}/query", addr),
        hits,
        hit_times,
        last_query,
    }
}

/// A `TIME_SERIES_DAILY` body with one bar per calendar day from 2024-01-01.
pub fn daily_series(closes: &[f64]) -> Value {
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let mut series = Map::new();

    for (i, close) in closes.iter().enumerate() {
        let date = start + ChronoDuration::days(i as i64);
        series.insert(
            date.format("%Y-%m-%d").to_string(),
            json!({
                "1. open": format!("{:.4}", close - 0.25),
                "2. high": format!("{:.4}", close + 0.75),
                "3. low": format!("{:.4}", close - 0.75),
                "4. close": format!("{:.4}", close),
                "5. volume": "1250000"
            }),
        );
    }

    json!({
        "Meta Data": {
            "1. Information": "Daily Prices (open, high, low, close) and Volumes",
            "2. Symbol": "ABC",
            "3. Last Refreshed": (start + ChronoDuration::days(closes.len() as i64 - 1))
                .format("%Y-%m-%d")
                .to_string()
        },
        "Time Series (Daily)": series
    })
}

/// `n` strictly increasing closes starting at 100.
pub fn rising_closes(n: usize) -> Vec<f64> {
    (0..n).map(|i| 100.0 + i as f64).collect()
}

pub fn rate_limit_body() -> Value {
    json!({
        "Note": "Thank you for using Alpha Vantage! Our standard API call frequency is 5 calls per minute and 500 calls per day."
    })
}

/// Config pointing at the mock, with the given per-attempt timeout and delay.
pub fn config_for(mock: &MockProvider, timeout: Duration, retry_delay: Duration) -> Config {
    Config {
        provider: ProviderConfig {
            api_key: "test-key".to_string(),
            base_url: mock.url.clone(),
            timeout,
            max_retries: 3,
            retry_delay,
        },
        ..Config::default()
    }
}

/// Config pointing at the mock with fast retries.
pub fn fast_config(mock: &MockProvider) -> Config {
    config_for(mock, Duration::from_secs(5), Duration::from_millis(20))
}
