use chrono::Utc;

use super::repository::SessionRepository;
use super::signing::{sign_session_id, verify_session_key};
use super::{IssuedSession, SessionData};
use crate::OnboardError;
use crate::config::SessionConfig;
use crate::repository::{User, Workspace};

/// Builds, stores and signs sessions.
#[derive(Clone)]
pub struct SessionIssuer<S> {
    store: S,
    config: SessionConfig,
}

impl<S: SessionRepository> SessionIssuer<S> {
    pub fn new(store: S, config: SessionConfig) -> Self {
        Self { store, config }
    }

    /// Snapshots `user` and `workspace` into a new session.
    ///
    /// The user must be registered; a stub has no name to put in the session.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip_all, err))]
    pub async fn issue(
        &self,
        user: &User,
        workspace: &Workspace,
    ) -> Result<IssuedSession, OnboardError> {
        let full_name = user.full_name().ok_or_else(|| {
            OnboardError::unexpected(format!("session requested for stub user {}", user.id))
        })?;

        let now = Utc::now();
        let data = SessionData {
            workspace_id: workspace.id,
            user_id: user.id,
            role: user.role,
            company_name: workspace.company_name.clone(),
            full_name,
            created_at: now,
            expires_at: now + self.config.lifetime,
        };

        let session_id = self.store.create(data.clone()).await?;

        log::info!(
            target: "onboard::session",
            "msg=\"session issued\", user_id={}, workspace_id={}",
            user.id,
            workspace.id
        );

        Ok(IssuedSession {
            session_key: sign_session_id(&session_id, &self.config.secret_key),
            data,
        })
    }

    /// Loads the live session behind a signed key. `Ok(None)` for a bad
    /// signature, an unknown id or an expired session.
    pub async fn resolve(&self, session_key: &str) -> Result<Option<SessionData>, OnboardError> {
        let Some(session_id) = verify_session_key(session_key, &self.config.secret_key) else {
            return Ok(None);
        };

        Ok(self
            .store
            .find(&session_id)
            .await?
            .map(|session| session.data)
            .filter(|data| !data.is_expired()))
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;
    use crate::SecretString;
    use crate::repository::{Credentials, Role};
    use crate::session::InMemorySessionRepository;

    fn config(lifetime: Duration) -> SessionConfig {
        SessionConfig {
            lifetime,
            secret_key: SecretString::new("a-session-secret-that-is-long-enough"),
        }
    }

    fn workspace() -> Workspace {
        Workspace {
            id: 3,
            company_name: "Acme".to_owned(),
            contact_email: "ops@acme.test".to_owned(),
            created_at: Utc::now(),
        }
    }

    fn user(registered: bool) -> User {
        User {
            id: 9,
            workspace_id: 3,
            email: "ada@example.com".to_owned(),
            role: Role::Admin,
            created_at: Utc::now(),
            credentials: registered.then(|| Credentials {
                first_name: "Ada".to_owned(),
                last_name: "Obi".to_owned(),
                phone_number: "08012345678".to_owned(),
                password_hash: "hash".to_owned(),
            }),
        }
    }

    #[tokio::test]
    async fn test_issue_snapshots_user_and_workspace() {
        let issuer =
            SessionIssuer::new(InMemorySessionRepository::new(), config(Duration::hours(1)));
        let issued = issuer.issue(&user(true), &workspace()).await.unwrap();

        assert_eq!(issued.data.company_name, "Acme");
        assert_eq!(issued.data.full_name, "Ada Obi");
        assert_eq!(issued.data.role, Role::Admin);
        assert_eq!(issued.data.workspace_id, 3);

        let resolved = issuer.resolve(&issued.session_key).await.unwrap();
        assert_eq!(resolved, Some(issued.data));
    }

    #[tokio::test]
    async fn test_issue_rejects_stub() {
        let issuer =
            SessionIssuer::new(InMemorySessionRepository::new(), config(Duration::hours(1)));
        assert!(matches!(
            issuer.issue(&user(false), &workspace()).await,
            Err(OnboardError::Unexpected(_))
        ));
    }

    #[tokio::test]
    async fn test_resolve_rejects_forged_and_expired() {
        let store = InMemorySessionRepository::new();
        let issuer = SessionIssuer::new(store.clone(), config(Duration::hours(-1)));
        let issued = issuer.issue(&user(true), &workspace()).await.unwrap();

        assert!(issuer.resolve(&issued.session_key).await.unwrap().is_none());
        assert!(issuer.resolve("forged.0000").await.unwrap().is_none());
        assert_eq!(store.len(), 1);
    }
}
