use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Handled failures of the fetch, feature and prediction pipeline.
///
/// These are per-request outcomes, reported to the client with a 400.
/// `Clone` so that a failed computation can sit in the result cache.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PredictError {
    /// Transport failure that survived every retry. Carries the last error.
    #[error("{0}")]
    Transport(String),

    #[error("API rate limit exceeded")]
    RateLimited,

    #[error("Invalid stock symbol")]
    InvalidSymbol,

    #[error("Data processing error")]
    DataProcessing,

    #[error("Insufficient data for prediction")]
    InsufficientData,

    #[error("Prediction failed: {0}")]
    PredictionFailed(String),
}

/// Application error types.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error(transparent)]
    Predict(#[from] PredictError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Predict(e) => (StatusCode::BAD_REQUEST, e.to_string()),
            AppError::Internal(msg) => {
                tracing::error!("Endpoint error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(json!({ "error": message }));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_predict_error_messages() {
        assert_eq!(PredictError::RateLimited.to_string(), "API rate limit exceeded");
        assert_eq!(PredictError::InvalidSymbol.to_string(), "Invalid stock symbol");
        assert_eq!(PredictError::DataProcessing.to_string(), "Data processing error");
        assert_eq!(
            PredictError::Transport("operation timed out".into()).to_string(),
            "operation timed out"
        );
        assert_eq!(
            PredictError::PredictionFailed("empty design matrix".into()).to_string(),
            "Prediction failed: empty design matrix"
        );
    }

    #[test]
    fn test_predict_error_maps_to_bad_request() {
        let response = AppError::from(PredictError::RateLimited).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_bad_request_status() {
        let response = AppError::BadRequest("Invalid stock symbol".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_internal_status() {
        let response = AppError::Internal("boom".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
