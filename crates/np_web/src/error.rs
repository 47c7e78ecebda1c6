use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Core(#[from] np_core::Error),

    #[error("no store is configured to keep gallery posts")]
    NoStore,
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Core(np_core::Error::EmptySpeechText) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Core(np_core::Error::SpeechUnavailable(_)) | ApiError::NoStore => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Core(np_core::Error::UnknownCategory(_)) => StatusCode::NOT_FOUND,
            ApiError::Core(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::warn!("Request failed with {}: {}", status, self);
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
