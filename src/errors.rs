use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

// --- GIF Service Errors ---

/// Failure to obtain a result set from the GIF service.
///
/// The variants only record where it broke; callers treat them all as the same
/// "fetch/decode failure".
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Request to GIF service failed: {0}")]
    Network(#[source] reqwest::Error),

    #[error("GIF service responded with status {0}")]
    Status(reqwest::StatusCode),

    #[error("Could not decode GIF service response: {0}")]
    Decode(#[source] serde_json::Error),
}

// --- Web Layer Error ---

#[derive(Error, Debug)]
pub enum AppError {
    // Input validation / request parsing errors
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    // Upstream GIF service failures, surfaced by the JSON API only
    #[error("Could not fetch GIFs")]
    Upstream(#[source] FetchError),

    // Page rendering
    #[error("Could not render template: {0}")]
    Template(#[from] minijinja::Error),
}

// --- Conversions from Domain Errors to AppError ---

impl From<FetchError> for AppError {
    fn from(err: FetchError) -> Self {
        AppError::Upstream(err)
    }
}

// --- Axum Response Implementation ---

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            // 4xx Client Errors
            AppError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg.clone()),

            // 5xx Server Errors
            AppError::Upstream(e) => {
                tracing::error!(error.source = ?e, "GIF service error occurred");
                (StatusCode::BAD_GATEWAY, "GIF service request failed".to_string())
            }
            AppError::Template(e) => {
                tracing::error!(error.source = ?e, "Template error occurred");
                (StatusCode::INTERNAL_SERVER_ERROR, "Page rendering failed".to_string())
            }
        };

        tracing::debug!(error.message = %error_message, error.detail = %self, "Responding with error");

        let body = Json(serde_json::json!({ "error": error_message }));
        (status, body).into_response()
    }
}
