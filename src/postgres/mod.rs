//! Postgres registries and invitation store.
//!
//! Enable the `sqlx_postgres` feature to use these implementations.

mod invitation;
pub mod migrations;
mod user;
mod workspace;

pub use invitation::PostgresInvitationStore;
pub use user::PostgresUserRepository;
pub use workspace::PostgresWorkspaceRepository;

use sqlx::PgPool;

use crate::config::OnboardConfig;
use crate::crypto::Argon2Hasher;

/// Builds every Postgres backend over one pool.
pub fn create_repositories(
    pool: PgPool,
    config: &OnboardConfig,
) -> (
    PostgresUserRepository,
    PostgresWorkspaceRepository,
    PostgresInvitationStore,
) {
    (
        PostgresUserRepository::with_hasher(
            pool.clone(),
            Argon2Hasher::from_config(&config.hashing),
        ),
        PostgresWorkspaceRepository::new(pool.clone()),
        PostgresInvitationStore::with_config(pool, config.invitations.clone()),
    )
}
