use axum::Router;
use axum::routing::{patch, post};

use super::handlers;
use crate::config::InvitationConfig;
use crate::notification::Notifier;
use crate::repository::{InvitationStore, UserRepository, WorkspaceRepository};
use crate::session::{SessionIssuer, SessionRepository};

#[derive(Clone)]
pub struct AppState<U, W, I, S, N> {
    pub user_repo: U,
    pub workspace_repo: W,
    pub invitation_store: I,
    pub sessions: SessionIssuer<S>,
    pub notifier: N,
    /// Used for the accept link in invitation emails.
    pub invitations: InvitationConfig,
}

/// `POST /invitations`, `PATCH /invitations/{token}/extend` and
/// `PATCH /invitations/{token}/accept`.
pub fn invitation_routes<U, W, I, S, N>() -> Router<AppState<U, W, I, S, N>>
where
    U: UserRepository + Clone + Send + Sync + 'static,
    W: WorkspaceRepository + Clone + Send + Sync + 'static,
    I: InvitationStore + Clone + Send + Sync + 'static,
    S: SessionRepository + Clone + Send + Sync + 'static,
    N: Notifier + Clone + Send + Sync + 'static,
{
    Router::new()
        .route("/invitations", post(handlers::invite_users::<U, W, I, S, N>))
        .route(
            "/invitations/{token}/extend",
            patch(handlers::extend_invitation::<U, W, I, S, N>),
        )
        .route(
            "/invitations/{token}/accept",
            patch(handlers::accept_invitation::<U, W, I, S, N>),
        )
}
