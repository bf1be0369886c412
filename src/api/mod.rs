pub mod health;
pub mod predict;

use crate::AppState;
use axum::{
    extract::Request,
    http::{HeaderValue, Method},
    middleware::{self, Next},
    response::Response,
    Router,
};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing::{info, warn};

const DEFAULT_FRONTEND_ORIGIN: &str = "http://localhost:3000";

/// Create the API router.
///
/// Prediction routes only answer the configured frontend origin; the health
/// and index routes are open to any origin.
pub fn router(frontend_origin: &str) -> Router<AppState> {
    let origin = frontend_origin.parse::<HeaderValue>().unwrap_or_else(|_| {
        warn!(
            "Invalid FRONTEND_ORIGIN {:?}, falling back to {}",
            frontend_origin, DEFAULT_FRONTEND_ORIGIN
        );
        HeaderValue::from_static(DEFAULT_FRONTEND_ORIGIN)
    });

    let frontend_cors = CorsLayer::new()
        .allow_origin(AllowOrigin::exact(origin))
        .allow_methods([Method::GET]);

    let public_cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET]);

    Router::new()
        .merge(predict::router().layer(frontend_cors))
        .merge(health::router().layer(public_cors))
        .layer(middleware::from_fn(log_request))
}

/// Log every inbound request before it is routed.
async fn log_request(request: Request, next: Next) -> Response {
    info!(
        "Incoming request: {} {}",
        request.method(),
        request.uri().path()
    );
    next.run(request).await
}
