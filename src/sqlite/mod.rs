//! `SQLite` registries and invitation store.
//!
//! Enable the `sqlx_sqlite` feature to use these implementations.

mod invitation;
pub mod migrations;
mod user;
mod workspace;

pub use invitation::SqliteInvitationStore;
pub use user::SqliteUserRepository;
pub use workspace::SqliteWorkspaceRepository;

use sqlx::SqlitePool;

use crate::config::OnboardConfig;
use crate::crypto::Argon2Hasher;

/// Builds every `SQLite` backend over one pool.
pub fn create_repositories(
    pool: SqlitePool,
    config: &OnboardConfig,
) -> (
    SqliteUserRepository,
    SqliteWorkspaceRepository,
    SqliteInvitationStore,
) {
    (
        SqliteUserRepository::with_hasher(pool.clone(), Argon2Hasher::from_config(&config.hashing)),
        SqliteWorkspaceRepository::new(pool.clone()),
        SqliteInvitationStore::with_config(pool, config.invitations.clone()),
    )
}
