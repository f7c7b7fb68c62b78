use crate::OnboardError;
use crate::repository::{Invitation, InvitationStore};

/// Restarts the time-to-live of a pending invitation.
pub struct ExtendInvitationAction<I: InvitationStore> {
    invitation_store: I,
}

impl<I: InvitationStore> ExtendInvitationAction<I> {
    pub fn new(invitation_store: I) -> Self {
        Self { invitation_store }
    }

    /// Returns the invitation with its new expiry.
    ///
    /// # Errors
    ///
    /// `Expired` for a token that is gone, expired or never existed. The
    /// boundary answers all three the same way.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip_all, err))]
    pub async fn execute(&self, token: &str) -> Result<Invitation, OnboardError> {
        let invitation = self.invitation_store.extend(token).await?;

        log::info!(
            target: "onboard",
            "msg=\"invitation extended\", workspace_id={}, email=\"{}\", expires_at=\"{}\"",
            invitation.workspace_id,
            invitation.email,
            invitation.expires_at
        );

        Ok(invitation)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration as StdDuration;

    use chrono::Duration;

    use super::*;
    use crate::config::InvitationConfig;
    use crate::repository::InMemoryInvitationStore;

    #[tokio::test]
    async fn test_extend_live_token() {
        let store = InMemoryInvitationStore::new();
        let created = store.create(1, "Acme", "a@x.com").await.unwrap();

        let extended = ExtendInvitationAction::new(store)
            .execute(created.token.expose_secret())
            .await
            .unwrap();

        assert!(extended.expires_at >= created.expires_at);
        assert_eq!(extended.email, created.email);
    }

    #[tokio::test]
    async fn test_extend_expired_token() {
        let store = InMemoryInvitationStore::with_config(InvitationConfig {
            ttl: Duration::milliseconds(20),
            ..InvitationConfig::default()
        });
        let created = store.create(1, "Acme", "a@x.com").await.unwrap();
        tokio::time::sleep(StdDuration::from_millis(50)).await;

        let action = ExtendInvitationAction::new(store);
        assert_eq!(
            action
                .execute(created.token.expose_secret())
                .await
                .unwrap_err(),
            OnboardError::Expired
        );
        assert_eq!(
            action.execute("made-up").await.unwrap_err(),
            OnboardError::Expired
        );
    }
}
