use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use groupdrop_common::api::{ErrorBody, StoreError};

/// Maps store failures onto HTTP responses with a JSON error body.
pub struct ApiError(pub StoreError);

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self.0 {
            StoreError::NotFound(_) => StatusCode::NOT_FOUND,
            StoreError::Read(_) | StoreError::Write(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(ErrorBody { error: self.0.to_string() })).into_response()
    }
}
