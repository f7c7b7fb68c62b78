//! Embedded `SQLite` migrations.
//!
//! # Example
//!
//! ```rust,ignore
//! use onboard::sqlite::migrations;
//! use sqlx::SqlitePool;
//!
//! async fn setup_database(pool: &SqlitePool) -> Result<(), sqlx::Error> {
//!     migrations::run(pool).await?;
//!     Ok(())
//! }
//! ```

use sqlx::{Executor, SqlitePool};

const CORE_MIGRATIONS: &[(&str, &str)] = &[
    (
        "20250301000001_create_workspaces_table",
        include_str!("../../migrations_sqlite/core/20250301000001_create_workspaces_table.sql"),
    ),
    (
        "20250301000002_create_users_table",
        include_str!("../../migrations_sqlite/core/20250301000002_create_users_table.sql"),
    ),
    (
        "20250301000003_create_invitations_table",
        include_str!("../../migrations_sqlite/core/20250301000003_create_invitations_table.sql"),
    ),
];

/// Runs pending migrations, tracked in `_onboard_migrations`.
pub async fn run(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    pool.execute(
        r"
        CREATE TABLE IF NOT EXISTS _onboard_migrations (
            name TEXT PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
        )
        ",
    )
    .await?;

    for (name, sql) in CORE_MIGRATIONS {
        let applied: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM _onboard_migrations WHERE name = ?)")
                .bind(*name)
                .fetch_one(pool)
                .await?;

        if applied {
            continue;
        }

        // one statement per execute; the bundled files keep `;` out of literals
        for statement in sql.split(';') {
            let trimmed = statement.trim();
            if !trimmed.is_empty() {
                pool.execute(trimmed).await?;
            }
        }

        sqlx::query("INSERT INTO _onboard_migrations (name) VALUES (?)")
            .bind(*name)
            .execute(pool)
            .await?;

        log::info!(target: "onboard::store", "msg=\"migration applied\", name=\"{name}\"");
    }

    Ok(())
}
