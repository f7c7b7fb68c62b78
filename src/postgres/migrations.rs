//! Postgres migrations, embedded with `sqlx::migrate!`.
//!
//! # Example
//!
//! ```rust,ignore
//! use onboard::postgres::migrations;
//! use sqlx::PgPool;
//!
//! async fn setup_database(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
//!     migrations::run(pool).await
//! }
//! ```

use sqlx::PgPool;

/// Creates the `workspaces`, `users` and `invitations` tables.
pub async fn run(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations/core").run(pool).await
}
