use tickercast::config::Config;
use tickercast::{app, AppState};
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tickercast=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env();
    info!("Starting tickercast server on {}:{}", config.host, config.port);
    info!(
        "Provider timeout {:?}, {} attempts, {:?} between attempts; cache TTL {:?}",
        config.provider.timeout,
        config.provider.max_retries,
        config.provider.retry_delay,
        config.cache.ttl
    );

    let addr = format!("{}:{}", config.host, config.port);
    let sweep_interval = config.cache.sweep_interval;
    let state = AppState::new(config)?;

    // Periodically drop expired cache entries
    {
        let predictor = state.predictor.clone();
        tokio::spawn(async move {
            loop {
                tokio::time::sleep(sweep_interval).await;
                let removed = predictor.sweep_cache();
                if removed > 0 {
                    debug!(
                        "Swept {} expired cache entries, {} remain",
                        removed,
                        predictor.cached_symbols()
                    );
                }
            }
        });
    }

    // Start the server
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("tickercast server listening on {}", addr);

    axum::serve(listener, app(state)).await?;

    Ok(())
}
