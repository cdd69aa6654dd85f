use thiserror::Error;

/// Invalid configuration values
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{name}: medium boundary {medium} must be below high boundary {high}")]
    InvertedThresholds {
        name: &'static str,
        medium: i64,
        high: i64,
    },

    #[error("cards_medium must be at least 1, got {0}")]
    CardThresholdTooLow(usize),
}

#[cfg(feature = "server")]
pub use api_error::ApiError;

#[cfg(feature = "server")]
mod api_error {
    use axum::{
        http::StatusCode,
        response::{IntoResponse, Response},
        Json,
    };
    use serde_json::json;
    use thiserror::Error;

    /// Errors surfaced by the HTTP adapter. The assessment core itself never fails.
    #[derive(Debug, Error)]
    pub enum ApiError {
        #[error("Bad request: {0}")]
        BadRequest(String),

        #[error("Internal server error")]
        Internal(#[from] anyhow::Error),
    }

    impl IntoResponse for ApiError {
        fn into_response(self) -> Response {
            let (status, message, code) = match self {
                ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg, "BAD_REQUEST"),
                ApiError::Internal(err) => {
                    tracing::error!(error = %err, "Internal error while handling request");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "Internal server error".to_string(),
                        "INTERNAL_ERROR",
                    )
                }
            };

            let body = Json(json!({
                "error": code,
                "message": message
            }));

            (status, body).into_response()
        }
    }
}
