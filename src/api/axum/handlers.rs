//! HTTP handlers for the invitation endpoints.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use super::error::AppError;
use super::middleware::Caller;
use super::routes::AppState;
use crate::actions::{AcceptInvitationAction, ExtendInvitationAction, InviteUsersAction};
use crate::notification::Notifier;
use crate::repository::{InvitationStore, UserRepository, WorkspaceRepository};
use crate::session::SessionRepository;
use crate::validators::{InviteRequest, RegistrationRequest};

/// Invite a batch of users into the caller's workspace.
///
/// POST /invitations
pub async fn invite_users<U, W, I, S, N>(
    State(state): State<AppState<U, W, I, S, N>>,
    caller: Caller,
    Json(body): Json<Vec<InviteRequest>>,
) -> Result<impl IntoResponse, AppError>
where
    U: UserRepository + Clone + Send + Sync + 'static,
    W: Clone + Send + Sync + 'static,
    I: InvitationStore + Clone + Send + Sync + 'static,
    S: SessionRepository + Clone + Send + Sync + 'static,
    N: Notifier + Clone + Send + Sync + 'static,
{
    let action = InviteUsersAction::with_config(
        state.user_repo,
        state.invitation_store,
        state.notifier,
        state.invitations,
    );
    let invitations = action.execute(&caller.into_inner(), body).await?;

    Ok((StatusCode::CREATED, Json(invitations)))
}

/// Restart an invitation's time-to-live.
///
/// PATCH /invitations/{token}/extend
pub async fn extend_invitation<U, W, I, S, N>(
    State(state): State<AppState<U, W, I, S, N>>,
    Path(token): Path<String>,
) -> Result<impl IntoResponse, AppError>
where
    U: Clone + Send + Sync + 'static,
    W: Clone + Send + Sync + 'static,
    I: InvitationStore + Clone + Send + Sync + 'static,
    S: Clone + Send + Sync + 'static,
    N: Clone + Send + Sync + 'static,
{
    let action = ExtendInvitationAction::new(state.invitation_store);
    let invitation = action.execute(&token).await?;

    Ok(Json(invitation))
}

/// Register through an invitation and receive a session.
///
/// PATCH /invitations/{token}/accept
pub async fn accept_invitation<U, W, I, S, N>(
    State(state): State<AppState<U, W, I, S, N>>,
    Path(token): Path<String>,
    Json(body): Json<RegistrationRequest>,
) -> Result<impl IntoResponse, AppError>
where
    U: UserRepository + Clone + Send + Sync + 'static,
    W: WorkspaceRepository + Clone + Send + Sync + 'static,
    I: InvitationStore + Clone + Send + Sync + 'static,
    S: SessionRepository + Clone + Send + Sync + 'static,
    N: Clone + Send + Sync + 'static,
{
    let action = AcceptInvitationAction::new(
        state.user_repo,
        state.workspace_repo,
        state.invitation_store,
        state.sessions,
    );
    let session = action.execute(&token, body).await?;

    Ok(Json(session))
}
