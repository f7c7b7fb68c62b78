use axum::Json;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};

use super::error::AppError;
use super::routes::AppState;
use crate::api::ErrorResponse;
use crate::session::{SessionData, SessionRepository};

/// The live session behind an `Authorization: Bearer <session_key>` header.
#[derive(Debug, Clone)]
pub struct Caller(pub SessionData);

impl Caller {
    pub fn into_inner(self) -> SessionData {
        self.0
    }
}

pub fn extract_bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()
        .and_then(|auth| auth.strip_prefix("Bearer "))
        .map(ToOwned::to_owned)
}

/// Rejection for requests without a usable session.
#[derive(Debug)]
pub enum CallerRejection {
    Missing,
    Failed(AppError),
}

impl IntoResponse for CallerRejection {
    fn into_response(self) -> Response {
        match self {
            Self::Missing => (
                StatusCode::UNAUTHORIZED,
                Json(ErrorResponse::message("missing or invalid session")),
            )
                .into_response(),
            Self::Failed(err) => err.into_response(),
        }
    }
}

impl<U, W, I, S, N> FromRequestParts<AppState<U, W, I, S, N>> for Caller
where
    U: Clone + Send + Sync + 'static,
    W: Clone + Send + Sync + 'static,
    I: Clone + Send + Sync + 'static,
    S: SessionRepository + Clone + Send + Sync + 'static,
    N: Clone + Send + Sync + 'static,
{
    type Rejection = CallerRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState<U, W, I, S, N>,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_bearer_token(&parts.headers).ok_or(CallerRejection::Missing)?;

        state
            .sessions
            .resolve(&token)
            .await
            .map_err(|e| CallerRejection::Failed(AppError(e)))?
            .map(Caller)
            .ok_or(CallerRejection::Missing)
    }
}
