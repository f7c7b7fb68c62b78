//! Registry traits and data types.
//!
//! Implement these traits to plug in your own storage backend.
//!
//! # Traits
//!
//! | Trait | Description |
//! |-------|-------------|
//! | [`UserRepository`] | Stub creation, registration, password change |
//! | [`WorkspaceRepository`] | Workspace create, lookup, rename |
//! | [`InvitationStore`] | Invitation token lifecycle |
//!
//! # Mock Implementations
//!
//! Enable the `mocks` feature for in-memory registries:
//!
//! - [`MockUserRepository`]
//! - [`MockWorkspaceRepository`]
//!
//! [`InMemoryInvitationStore`] is always available.

mod invitation;
mod invitation_memory;
mod user;
mod workspace;

#[cfg(any(test, feature = "mocks"))]
mod user_mock;
#[cfg(any(test, feature = "mocks"))]
mod workspace_mock;

pub use invitation::{Invitation, InvitationStore};
pub use invitation_memory::InMemoryInvitationStore;
pub use user::{Credentials, NewUser, Registration, Role, User, UserRepository};
pub use workspace::{Workspace, WorkspaceRepository};

#[cfg(any(test, feature = "mocks"))]
pub use user_mock::MockUserRepository;
#[cfg(any(test, feature = "mocks"))]
pub use workspace_mock::MockWorkspaceRepository;
