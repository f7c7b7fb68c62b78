//! Invitation-driven onboarding for multi-tenant workspaces.
//!
//! An admin invites a batch of emails; each gets a user stub and a
//! single-use, time-limited token. Accepting a token completes the user's
//! registration and opens a session.
//!
//! # Features
//!
//! | Feature | Enables |
//! |---------|---------|
//! | `mocks` | In-memory registries and a recording notifier |
//! | `tracing` | Spans on registry methods and workflow actions |
//! | `sqlx_sqlite` | SQLite registries and invitation store |
//! | `sqlx_postgres` | Postgres registries and invitation store |
//! | `axum_api` | HTTP routes for invite, extend and accept |
//!
//! # Example
//!
//! ```rust,ignore
//! use onboard::actions::InviteUsersAction;
//! use onboard::repository::{InMemoryInvitationStore, Role};
//! use onboard::validators::InviteRequest;
//!
//! let action = InviteUsersAction::new(user_repo, InMemoryInvitationStore::new(), notifier);
//! let invitations = action
//!     .execute(&caller, vec![InviteRequest::new("ada@example.com", Role::Member)])
//!     .await?;
//! ```

pub mod actions;
pub mod config;
pub mod crypto;
pub mod error;
pub mod notification;
pub mod repository;
pub mod session;
pub mod validators;

mod secret;

#[cfg(any(feature = "sqlx_sqlite", feature = "sqlx_postgres"))]
mod db;

#[cfg(feature = "sqlx_sqlite")]
pub mod sqlite;

#[cfg(feature = "sqlx_postgres")]
pub mod postgres;

#[cfg(feature = "axum_api")]
pub mod api;

pub use error::{ConflictField, OnboardError};
pub use secret::SecretString;

pub use repository::{
    Credentials, InMemoryInvitationStore, Invitation, InvitationStore, NewUser, Registration,
    Role, User, UserRepository, Workspace, WorkspaceRepository,
};

#[cfg(any(test, feature = "mocks"))]
pub use repository::{MockUserRepository, MockWorkspaceRepository};
