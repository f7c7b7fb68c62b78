use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::OnboardError;
use crate::api::ErrorResponse;

/// converts `OnboardError` into appropriate HTTP responses
#[derive(Debug)]
pub struct AppError(pub OnboardError);

impl From<OnboardError> for AppError {
    fn from(err: OnboardError) -> Self {
        Self(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if status.is_server_error() {
            log::error!(target: "onboard", "msg=\"request failed\", error=\"{:?}\"", self.0);
        }

        (status, Json(ErrorResponse::from(&self.0))).into_response()
    }
}
