use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use medqa_common::{ApiResponse, MedqaError};
use serde_json::json;

/// Error surfaced to HTTP callers as `{"apiResponse": {"code", "message"}}`.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Input(#[from] MedqaError),

    #[error("Malformed request body: {0}")]
    MalformedBody(String),

    #[error("{0} is not enabled on this server")]
    Disabled(&'static str),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Input(MedqaError::MissingRequiredInput(_)) => StatusCode::BAD_REQUEST,
            ApiError::Input(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::MalformedBody(_) => StatusCode::BAD_REQUEST,
            ApiError::Disabled(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = json!({ "apiResponse": ApiResponse::error(status.as_u16(), self.to_string()) });
        (status, Json(body)).into_response()
    }
}
