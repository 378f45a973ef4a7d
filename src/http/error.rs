use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::error::Error;

/// Error surface of the API: every failure renders as HTTP 400 with the
/// underlying message in an `{"error": ...}` body.
#[derive(Debug)]
pub struct ApiError(String);

impl ApiError {
    pub fn missing_param(name: &str) -> Self {
        Self(format!("{name} is required"))
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        Self(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (StatusCode::BAD_REQUEST, Json(json!({ "error": self.0 }))).into_response()
    }
}
