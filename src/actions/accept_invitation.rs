use crate::OnboardError;
use crate::repository::{InvitationStore, UserRepository, WorkspaceRepository};
use crate::session::{IssuedSession, SessionIssuer, SessionRepository};
use crate::validators::RegistrationRequest;

/// Redeems an invitation token: completes the user's registration, burns the
/// token and opens a session.
pub struct AcceptInvitationAction<U, W, I, S>
where
    U: UserRepository,
    W: WorkspaceRepository,
    I: InvitationStore,
    S: SessionRepository,
{
    user_repo: U,
    workspace_repo: W,
    invitation_store: I,
    session_issuer: SessionIssuer<S>,
}

impl<U, W, I, S> AcceptInvitationAction<U, W, I, S>
where
    U: UserRepository,
    W: WorkspaceRepository,
    I: InvitationStore,
    S: SessionRepository,
{
    pub fn new(
        user_repo: U,
        workspace_repo: W,
        invitation_store: I,
        session_issuer: SessionIssuer<S>,
    ) -> Self {
        Self {
            user_repo,
            workspace_repo,
            invitation_store,
            session_issuer,
        }
    }

    /// # Errors
    ///
    /// - `Validation` for malformed registration data
    /// - `Expired` if the token is not live
    /// - `Conflict(Phone)` if another user already has the phone number
    /// - `NotFound` if the invited user or its workspace no longer exists
    #[cfg_attr(feature = "tracing", tracing::instrument(skip_all, err))]
    pub async fn execute(
        &self,
        token: &str,
        request: RegistrationRequest,
    ) -> Result<IssuedSession, OnboardError> {
        let registration = request.validate().map_err(OnboardError::Validation)?;

        // nothing with side effects may run before the token is known live
        let invitation = self.invitation_store.view(token).await?;

        let Some(user) = self
            .user_repo
            .register(&invitation.email, &registration)
            .await?
        else {
            log::warn!(
                target: "onboard",
                "msg=\"invitation without user\", workspace_id={}, email=\"{}\"",
                invitation.workspace_id,
                invitation.email
            );
            return Err(OnboardError::NotFound);
        };

        // revoke strictly after a successful registration
        self.invitation_store.revoke(&invitation.email).await?;

        let workspace = self
            .workspace_repo
            .find_by_id(user.workspace_id)
            .await?
            .ok_or_else(|| {
                log::warn!(
                    target: "onboard",
                    "msg=\"workspace missing at accept\", workspace_id={}, user_id={}",
                    user.workspace_id,
                    user.id
                );
                OnboardError::NotFound
            })?;

        let session = self.session_issuer.issue(&user, &workspace).await?;

        log::info!(
            target: "onboard",
            "msg=\"invitation accepted\", workspace_id={}, user_id={}",
            workspace.id,
            user.id
        );

        Ok(session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SecretString;
    use crate::config::SessionConfig;
    use crate::error::ConflictField;
    use crate::repository::{
        InMemoryInvitationStore, MockUserRepository, MockWorkspaceRepository, NewUser, Role,
    };
    use crate::session::InMemorySessionRepository;

    type Action = AcceptInvitationAction<
        MockUserRepository,
        MockWorkspaceRepository,
        InMemoryInvitationStore,
        InMemorySessionRepository,
    >;

    struct Fixture {
        action: Action,
        users: MockUserRepository,
        workspaces: MockWorkspaceRepository,
        store: InMemoryInvitationStore,
        workspace_id: i64,
    }

    async fn fixture() -> Fixture {
        let users = MockUserRepository::new();
        let workspaces = MockWorkspaceRepository::new();
        let store = InMemoryInvitationStore::new();
        let issuer = SessionIssuer::new(
            InMemorySessionRepository::new(),
            SessionConfig {
                secret_key: SecretString::new("a-session-secret-that-is-long-enough"),
                ..SessionConfig::default()
            },
        );

        let workspace = workspaces.create("Acme", "ops@acme.test").await.unwrap();
        let action = AcceptInvitationAction::new(
            users.clone(),
            workspaces.clone(),
            store.clone(),
            issuer,
        );

        Fixture {
            action,
            users,
            workspaces,
            store,
            workspace_id: workspace.id,
        }
    }

    async fn invite(f: &Fixture, email: &str) -> String {
        f.users
            .create(
                f.workspace_id,
                NewUser {
                    email: email.to_owned(),
                    role: Role::Member,
                },
            )
            .await
            .unwrap();
        f.store
            .create(f.workspace_id, "Acme", email)
            .await
            .unwrap()
            .token
            .expose_secret()
            .to_owned()
    }

    fn registration(phone: &str) -> RegistrationRequest {
        RegistrationRequest::new("Ada", "Obi", phone, "password1")
    }

    #[tokio::test]
    async fn test_accept_registers_and_issues_session() {
        let f = fixture().await;
        let token = invite(&f, "ada@x.com").await;

        let session = f.action.execute(&token, registration("08012345678")).await.unwrap();

        assert_eq!(session.data.company_name, "Acme");
        assert_eq!(session.data.full_name, "Ada Obi");
        assert_eq!(session.data.role, Role::Member);
        assert!(!session.session_key.is_empty());

        let user = f.users.find_by_email("ada@x.com").await.unwrap().unwrap();
        assert!(user.is_registered());
        assert!(f.store.is_empty());
    }

    #[tokio::test]
    async fn test_token_is_single_use() {
        let f = fixture().await;
        let token = invite(&f, "ada@x.com").await;

        f.action.execute(&token, registration("08012345678")).await.unwrap();
        assert_eq!(
            f.action
                .execute(&token, registration("08012345678"))
                .await
                .unwrap_err(),
            OnboardError::Expired
        );
    }

    #[tokio::test]
    async fn test_phone_conflict_keeps_token_and_stub() {
        let f = fixture().await;
        let first = invite(&f, "a@x.com").await;
        let second = invite(&f, "b@x.com").await;

        f.action.execute(&first, registration("08012345678")).await.unwrap();
        assert_eq!(
            f.action
                .execute(&second, registration("08012345678"))
                .await
                .unwrap_err(),
            OnboardError::Conflict(ConflictField::Phone)
        );

        let stub = f.users.find_by_email("b@x.com").await.unwrap().unwrap();
        assert!(!stub.is_registered());
        assert!(f.store.view(&second).await.is_ok());
    }

    #[tokio::test]
    async fn test_invalid_registration_touches_nothing() {
        let f = fixture().await;
        let token = invite(&f, "ada@x.com").await;

        let err = f
            .action
            .execute(&token, registration("123"))
            .await
            .unwrap_err();

        assert!(matches!(err, OnboardError::Validation(_)));
        assert!(f.store.view(&token).await.is_ok());
    }

    #[tokio::test]
    async fn test_missing_workspace_is_not_found() {
        let f = fixture().await;
        let token = invite(&f, "ada@x.com").await;
        f.workspaces.remove(f.workspace_id).unwrap();

        assert_eq!(
            f.action
                .execute(&token, registration("08012345678"))
                .await
                .unwrap_err(),
            OnboardError::NotFound
        );
    }

    #[tokio::test]
    async fn test_token_without_stub_is_not_found() {
        let f = fixture().await;
        let token = f
            .store
            .create(f.workspace_id, "Acme", "ghost@x.com")
            .await
            .unwrap()
            .token;

        assert_eq!(
            f.action
                .execute(token.expose_secret(), registration("08012345678"))
                .await
                .unwrap_err(),
            OnboardError::NotFound
        );
    }
}
