use crate::OnboardError;
use crate::config::InvitationConfig;
use crate::notification::{Notifier, invitation_notification};
use crate::repository::{Invitation, InvitationStore, NewUser, UserRepository};
use crate::session::SessionData;
use crate::validators::InviteRequest;

/// Creates user stubs for a batch of emails and sends each an invitation.
///
/// Either every stub is created or none is. Token creation and notification
/// then run one recipient at a time and stop at the first failure; tokens
/// already issued stay live until they expire.
pub struct InviteUsersAction<U, I, N>
where
    U: UserRepository,
    I: InvitationStore,
    N: Notifier,
{
    user_repo: U,
    invitation_store: I,
    notifier: N,
    config: InvitationConfig,
}

impl<U: UserRepository, I: InvitationStore, N: Notifier> InviteUsersAction<U, I, N> {
    pub fn new(user_repo: U, invitation_store: I, notifier: N) -> Self {
        Self::with_config(user_repo, invitation_store, notifier, InvitationConfig::default())
    }

    pub fn with_config(
        user_repo: U,
        invitation_store: I,
        notifier: N,
        config: InvitationConfig,
    ) -> Self {
        Self {
            user_repo,
            invitation_store,
            notifier,
            config,
        }
    }

    /// Invites `requests` into the caller's workspace.
    ///
    /// # Errors
    ///
    /// - `Unauthorized` if the caller is a plain member
    /// - `Validation` if any entry is malformed (nothing is created)
    /// - `Conflict(Email)` if any email is already registered or repeated in
    ///   the batch (nothing is created)
    /// - `Unexpected` if a notification fails
    #[cfg_attr(feature = "tracing", tracing::instrument(skip_all, err))]
    pub async fn execute(
        &self,
        caller: &SessionData,
        requests: Vec<InviteRequest>,
    ) -> Result<Vec<Invitation>, OnboardError> {
        if !caller.role.can_invite() {
            log::warn!(
                target: "onboard",
                "msg=\"invite rejected\", reason=\"insufficient role\", user_id={}, role=\"{}\"",
                caller.user_id,
                caller.role
            );
            return Err(OnboardError::Unauthorized);
        }

        let stubs = validate_all(&requests)?;
        if stubs.is_empty() {
            return Ok(Vec::new());
        }

        let users = self
            .user_repo
            .create_many(caller.workspace_id, stubs)
            .await?;

        let mut invitations = Vec::with_capacity(users.len());
        for user in users {
            let invitation = self
                .invitation_store
                .create(caller.workspace_id, &caller.company_name, &user.email)
                .await?;

            let notification = invitation_notification(&invitation, &self.config.link_base);
            if let Err(e) = self.notifier.send(notification).await {
                log::error!(
                    target: "onboard",
                    "msg=\"invitation notification failed\", workspace_id={}, email=\"{}\", sent={}, error=\"{e}\"",
                    caller.workspace_id,
                    user.email,
                    invitations.len()
                );
                return Err(OnboardError::unexpected(e.to_string()));
            }

            log::info!(
                target: "onboard",
                "msg=\"invitation sent\", workspace_id={}, user_id={}, email=\"{}\"",
                caller.workspace_id,
                user.id,
                user.email
            );
            invitations.push(invitation);
        }

        Ok(invitations)
    }
}

fn validate_all(requests: &[InviteRequest]) -> Result<Vec<NewUser>, OnboardError> {
    let mut stubs = Vec::with_capacity(requests.len());
    let mut violations = Vec::new();

    for request in requests {
        match request.validate() {
            Ok(stub) => stubs.push(stub),
            Err(mut errors) => violations.append(&mut errors),
        }
    }

    if violations.is_empty() {
        Ok(stubs)
    } else {
        Err(OnboardError::Validation(violations))
    }
}
