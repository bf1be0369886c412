use std::env;
use std::time::Duration;

/// Default Alpha Vantage query endpoint.
pub const ALPHA_VANTAGE_URL: &str = "https://www.alphavantage.co/query";

/// Market data provider settings.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// Alpha Vantage API key.
    pub api_key: String,
    /// Query endpoint, overridable so tests can point at a local mock.
    pub base_url: String,
    /// Per-attempt HTTP timeout.
    pub timeout: Duration,
    /// Total attempts on transport failure (not additional retries).
    pub max_retries: u32,
    /// Fixed pause between attempts.
    pub retry_delay: Duration,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: "demo".to_string(),
            base_url: ALPHA_VANTAGE_URL.to_string(),
            timeout: Duration::from_secs(10),
            max_retries: 3,
            retry_delay: Duration::from_secs(1),
        }
    }
}

/// Result cache settings.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Lifetime of a cached feature table (default: 1 hour).
    pub ttl: Duration,
    /// Interval of the background sweep that drops expired entries.
    pub sweep_interval: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(3600),
            sweep_interval: Duration::from_secs(300),
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server host.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// Origin allowed to call the prediction endpoints from a browser.
    pub frontend_origin: String,
    pub provider: ProviderConfig,
    pub cache: CacheConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5001,
            frontend_origin: "http://localhost:3000".to_string(),
            provider: ProviderConfig::default(),
            cache: CacheConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let defaults = Config::default();

        let provider = ProviderConfig {
            api_key: env::var("ALPHA_VANTAGE_API_KEY").unwrap_or(defaults.provider.api_key),
            base_url: env::var("ALPHA_VANTAGE_URL").unwrap_or(defaults.provider.base_url),
            timeout: env::var("FETCH_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.provider.timeout),
            max_retries: env::var("FETCH_MAX_RETRIES")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|&n: &u32| n > 0)
                .unwrap_or(defaults.provider.max_retries),
            retry_delay: env::var("FETCH_RETRY_DELAY_MS")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(Duration::from_millis)
                .unwrap_or(defaults.provider.retry_delay),
        };

        let cache = CacheConfig {
            ttl: env::var("CACHE_TTL_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.cache.ttl),
            sweep_interval: env::var("CACHE_SWEEP_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|&n: &u64| n > 0)
                .map(Duration::from_secs)
                .unwrap_or(defaults.cache.sweep_interval),
        };

        Self {
            host: env::var("HOST").unwrap_or(defaults.host),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            frontend_origin: env::var("FRONTEND_ORIGIN").unwrap_or(defaults.frontend_origin),
            provider,
            cache,
        }
    }
}
