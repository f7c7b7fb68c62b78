//! End-to-end tests for the invitation workflow over the in-memory backends.
//!
//! Run with: `cargo test --features mocks --test e2e_invitations`

#![cfg(feature = "mocks")]
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]

use chrono::{Duration, Utc};
use onboard::actions::{AcceptInvitationAction, ExtendInvitationAction, InviteUsersAction};
use onboard::config::{InvitationConfig, SessionConfig};
use onboard::notification::MockNotifier;
use onboard::session::{InMemorySessionRepository, SessionData, SessionIssuer};
use onboard::validators::{InviteRequest, RegistrationRequest};
use onboard::{
    ConflictField, InMemoryInvitationStore, InvitationStore, MockUserRepository,
    MockWorkspaceRepository, NewUser, OnboardError, Registration, Role, SecretString,
    UserRepository, Workspace, WorkspaceRepository,
};

struct Harness {
    users: MockUserRepository,
    workspaces: MockWorkspaceRepository,
    invitations: InMemoryInvitationStore,
    notifier: MockNotifier,
    sessions: SessionIssuer<InMemorySessionRepository>,
    config: InvitationConfig,
}

impl Harness {
    fn new() -> Self {
        Self::with_ttl(Duration::hours(72))
    }

    fn with_ttl(ttl: Duration) -> Self {
        let config = InvitationConfig {
            ttl,
            ..InvitationConfig::default()
        };

        Self {
            users: MockUserRepository::new(),
            workspaces: MockWorkspaceRepository::new(),
            invitations: InMemoryInvitationStore::with_config(config.clone()),
            notifier: MockNotifier::new(),
            sessions: SessionIssuer::new(
                InMemorySessionRepository::new(),
                SessionConfig {
                    lifetime: Duration::hours(1),
                    secret_key: SecretString::new("integration-test-secret-of-enough-length"),
                },
            ),
            config,
        }
    }

    fn invite(
        &self,
    ) -> InviteUsersAction<MockUserRepository, InMemoryInvitationStore, MockNotifier> {
        InviteUsersAction::with_config(
            self.users.clone(),
            self.invitations.clone(),
            self.notifier.clone(),
            self.config.clone(),
        )
    }

    fn extend(&self) -> ExtendInvitationAction<InMemoryInvitationStore> {
        ExtendInvitationAction::new(self.invitations.clone())
    }

    fn accept(
        &self,
    ) -> AcceptInvitationAction<
        MockUserRepository,
        MockWorkspaceRepository,
        InMemoryInvitationStore,
        InMemorySessionRepository,
    > {
        AcceptInvitationAction::new(
            self.users.clone(),
            self.workspaces.clone(),
            self.invitations.clone(),
            self.sessions.clone(),
        )
    }
}

fn caller(workspace: &Workspace, role: Role) -> SessionData {
    let now = Utc::now();
    SessionData {
        workspace_id: workspace.id,
        user_id: 1,
        role,
        company_name: workspace.company_name.clone(),
        full_name: "Ngozi Eze".to_owned(),
        created_at: now,
        expires_at: now + Duration::hours(1),
    }
}

fn registration(phone: &str) -> RegistrationRequest {
    RegistrationRequest::new("Bola", "Ade", phone, "correct horse battery")
}

#[tokio::test]
async fn test_invite_extend_accept_flow() {
    let h = Harness::new();
    let workspace = h.workspaces.create("Acme", "ops@acme.test").await.unwrap();

    let invitations = h
        .invite()
        .execute(
            &caller(&workspace, Role::Admin),
            vec![
                InviteRequest::new("a@x.com", Role::Member),
                InviteRequest::new("b@x.com", Role::Member),
            ],
        )
        .await
        .unwrap();

    assert_eq!(invitations.len(), 2);
    assert_eq!(h.users.len(), 2);
    assert_eq!(h.invitations.len(), 2);
    let sent: Vec<String> = h.notifier.sent().into_iter().map(|n| n.recipient).collect();
    assert_eq!(sent, vec!["a@x.com", "b@x.com"]);

    let t_a = invitations[0].token.expose_secret().to_owned();
    let t_b = invitations[1].token.expose_secret().to_owned();

    // extend keeps the payload and moves the expiry forward
    let extended = h.extend().execute(&t_a).await.unwrap();
    assert_eq!(extended.email, "a@x.com");
    assert_eq!(extended.workspace_id, workspace.id);
    assert_eq!(extended.company_name, "Acme");
    assert_eq!(extended.issued_at, invitations[0].issued_at);
    assert!(extended.expires_at >= invitations[0].expires_at);

    let session = h.accept().execute(&t_b, registration("08012345678")).await.unwrap();
    assert_eq!(session.data.company_name, "Acme");
    assert_eq!(session.data.workspace_id, workspace.id);
    assert_eq!(session.data.full_name, "Bola Ade");
    assert!(h.sessions.resolve(&session.session_key).await.unwrap().is_some());

    let b = h.users.find_by_email("b@x.com").await.unwrap().unwrap();
    assert!(b.is_registered());
    assert_eq!(h.invitations.view(&t_b).await.unwrap_err(), OnboardError::Expired);

    let err = h
        .accept()
        .execute(&t_a, registration("08012345678"))
        .await
        .unwrap_err();
    assert_eq!(err, OnboardError::Conflict(ConflictField::Phone));

    let a = h.users.find_by_email("a@x.com").await.unwrap().unwrap();
    assert!(!a.is_registered());
    assert!(h.invitations.view(&t_a).await.is_ok());
}

#[tokio::test]
async fn test_member_cannot_invite() {
    let h = Harness::new();
    let workspace = h.workspaces.create("Acme", "ops@acme.test").await.unwrap();

    let err = h
        .invite()
        .execute(
            &caller(&workspace, Role::Member),
            vec![InviteRequest::new("a@x.com", Role::Member)],
        )
        .await
        .unwrap_err();

    assert_eq!(err, OnboardError::Unauthorized);
    assert!(h.users.is_empty());
    assert!(h.invitations.is_empty());
    assert!(h.notifier.attempts().is_empty());
}

#[tokio::test]
async fn test_owner_can_invite_and_emails_are_case_folded() {
    let h = Harness::new();
    let workspace = h.workspaces.create("Acme", "ops@acme.test").await.unwrap();

    let invitations = h
        .invite()
        .execute(
            &caller(&workspace, Role::Owner),
            vec![InviteRequest::new("  Ada@Example.COM ", Role::Admin)],
        )
        .await
        .unwrap();

    assert_eq!(invitations[0].email, "ada@example.com");
    let ada = h.users.find_by_email("ada@example.com").await.unwrap().unwrap();
    assert_eq!(ada.role, Role::Admin);
}

#[tokio::test]
async fn test_invite_conflict_creates_nothing() {
    let h = Harness::new();
    let workspace = h.workspaces.create("Acme", "ops@acme.test").await.unwrap();
    h.users
        .create(
            workspace.id,
            NewUser {
                email: "b@x.com".to_owned(),
                role: Role::Member,
            },
        )
        .await
        .unwrap();

    let err = h
        .invite()
        .execute(
            &caller(&workspace, Role::Admin),
            vec![
                InviteRequest::new("a@x.com", Role::Member),
                InviteRequest::new("B@x.com", Role::Member),
            ],
        )
        .await
        .unwrap_err();

    assert_eq!(err, OnboardError::Conflict(ConflictField::Email));
    assert_eq!(h.users.len(), 1);
    assert!(h.invitations.is_empty());
    assert!(h.notifier.attempts().is_empty());
}

#[tokio::test]
async fn test_email_is_unique_across_workspaces() {
    let h = Harness::new();
    let w1 = h.workspaces.create("Acme", "ops@acme.test").await.unwrap();
    let w2 = h.workspaces.create("Globex", "ops@globex.test").await.unwrap();
    let stub = || NewUser {
        email: "e@x.com".to_owned(),
        role: Role::Member,
    };

    h.users.create(w1.id, stub()).await.unwrap();
    let err = h.users.create(w2.id, stub()).await.unwrap_err();

    assert_eq!(err, OnboardError::Conflict(ConflictField::Email));
}

#[tokio::test]
async fn test_phone_is_unique_but_reregistration_updates() {
    let h = Harness::new();
    let workspace = h.workspaces.create("Acme", "ops@acme.test").await.unwrap();
    h.users
        .create_many(
            workspace.id,
            vec![
                NewUser {
                    email: "u1@x.com".to_owned(),
                    role: Role::Member,
                },
                NewUser {
                    email: "u2@x.com".to_owned(),
                    role: Role::Member,
                },
            ],
        )
        .await
        .unwrap();

    let with_phone = |phone: &str| Registration {
        first_name: "Bola".to_owned(),
        last_name: "Ade".to_owned(),
        phone_number: phone.to_owned(),
        password: SecretString::new("correct horse battery"),
    };

    h.users.register("u1@x.com", &with_phone("08012345678")).await.unwrap();
    let err = h
        .users
        .register("u2@x.com", &with_phone("08012345678"))
        .await
        .unwrap_err();
    assert_eq!(err, OnboardError::Conflict(ConflictField::Phone));

    let updated = h
        .users
        .register("u1@x.com", &with_phone("09087654321"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.credentials.unwrap().phone_number, "09087654321");
    assert_eq!(h.users.len(), 2);
}

#[tokio::test]
async fn test_expired_token_stays_expired() {
    let h = Harness::with_ttl(Duration::milliseconds(50));
    let workspace = h.workspaces.create("Acme", "ops@acme.test").await.unwrap();

    let invitations = h
        .invite()
        .execute(
            &caller(&workspace, Role::Admin),
            vec![InviteRequest::new("a@x.com", Role::Member)],
        )
        .await
        .unwrap();
    let token = invitations[0].token.expose_secret().to_owned();

    tokio::time::sleep(std::time::Duration::from_millis(80)).await;

    assert_eq!(h.invitations.view(&token).await.unwrap_err(), OnboardError::Expired);
    assert_eq!(h.extend().execute(&token).await.unwrap_err(), OnboardError::Expired);
    assert_eq!(h.invitations.view(&token).await.unwrap_err(), OnboardError::Expired);

    let err = h
        .accept()
        .execute(&token, registration("08012345678"))
        .await
        .unwrap_err();
    assert_eq!(err, OnboardError::Expired);
    assert!(!h.users.find_by_email("a@x.com").await.unwrap().unwrap().is_registered());
}

#[tokio::test]
async fn test_unknown_workspace_is_absent() {
    let h = Harness::new();
    assert!(h.workspaces.find_by_id(404).await.unwrap().is_none());
}

#[tokio::test]
async fn test_invited_user_can_change_password() {
    let h = Harness::new();
    let workspace = h.workspaces.create("Acme", "ops@acme.test").await.unwrap();
    let invitations = h
        .invite()
        .execute(
            &caller(&workspace, Role::Admin),
            vec![InviteRequest::new("a@x.com", Role::Member)],
        )
        .await
        .unwrap();

    let session = h
        .accept()
        .execute(invitations[0].token.expose_secret(), registration("08012345678"))
        .await
        .unwrap();

    let changed = h
        .users
        .change_password(
            workspace.id,
            session.data.user_id,
            &SecretString::new("a brand new passphrase"),
        )
        .await
        .unwrap();
    assert!(changed.is_some());
    assert!(h.users.verify_password("a@x.com", "a brand new passphrase").unwrap());
    assert!(!h.users.verify_password("a@x.com", "correct horse battery").unwrap());
}
