use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;

use crate::crypto::{Argon2Hasher, PasswordHasher};
use crate::db::{USER_COLUMNS, UserRecord, map_db_error};
use crate::repository::{NewUser, Registration, User, UserRepository};
use crate::validators::normalize_email;
use crate::{OnboardError, SecretString};

#[derive(Clone)]
pub struct SqliteUserRepository {
    pool: SqlitePool,
    hasher: Argon2Hasher,
}

impl SqliteUserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self::with_hasher(pool, Argon2Hasher::default())
    }

    pub fn with_hasher(pool: SqlitePool, hasher: Argon2Hasher) -> Self {
        Self { pool, hasher }
    }
}

#[async_trait]
impl UserRepository for SqliteUserRepository {
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self, user), err))]
    async fn create(&self, workspace_id: i64, user: NewUser) -> Result<User, OnboardError> {
        let now = Utc::now();
        let row: UserRecord = sqlx::query_as(&format!(
            "INSERT INTO users (workspace_id, email, role, created_at, updated_at) VALUES (?, ?, ?, ?, ?) RETURNING {USER_COLUMNS}"
        ))
        .bind(workspace_id)
        .bind(normalize_email(&user.email))
        .bind(user.role.as_str())
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error("create_user"))?;

        row.try_into()
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self, users), err))]
    async fn create_many(
        &self,
        workspace_id: i64,
        users: Vec<NewUser>,
    ) -> Result<Vec<User>, OnboardError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(map_db_error("create_users"))?;

        let now = Utc::now();
        let sql = format!(
            "INSERT INTO users (workspace_id, email, role, created_at, updated_at) VALUES (?, ?, ?, ?, ?) RETURNING {USER_COLUMNS}"
        );

        let mut created = Vec::with_capacity(users.len());
        for user in users {
            // dropping `tx` on error rolls the whole batch back
            let row: UserRecord = sqlx::query_as(&sql)
                .bind(workspace_id)
                .bind(normalize_email(&user.email))
                .bind(user.role.as_str())
                .bind(now)
                .bind(now)
                .fetch_one(&mut *tx)
                .await
                .map_err(map_db_error("create_users"))?;
            created.push(User::try_from(row)?);
        }

        tx.commit().await.map_err(map_db_error("create_users"))?;

        Ok(created)
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(skip(self, email, registration), err)
    )]
    async fn register(
        &self,
        email: &str,
        registration: &Registration,
    ) -> Result<Option<User>, OnboardError> {
        let password_hash = self.hasher.hash(registration.password.expose_secret())?;

        let row: Option<UserRecord> = sqlx::query_as(&format!(
            "UPDATE users SET first_name = ?, last_name = ?, phone_number = ?, password_hash = ?, updated_at = ? WHERE email = ? RETURNING {USER_COLUMNS}"
        ))
        .bind(&registration.first_name)
        .bind(&registration.last_name)
        .bind(&registration.phone_number)
        .bind(password_hash)
        .bind(Utc::now())
        .bind(normalize_email(email))
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error("register_user"))?;

        row.map(User::try_from).transpose()
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self, password), err))]
    async fn change_password(
        &self,
        workspace_id: i64,
        user_id: i64,
        password: &SecretString,
    ) -> Result<Option<User>, OnboardError> {
        let password_hash = self.hasher.hash(password.expose_secret())?;

        let row: Option<UserRecord> = sqlx::query_as(&format!(
            "UPDATE users SET password_hash = ?, updated_at = ? WHERE id = ? AND workspace_id = ? AND password_hash IS NOT NULL RETURNING {USER_COLUMNS}"
        ))
        .bind(password_hash)
        .bind(Utc::now())
        .bind(user_id)
        .bind(workspace_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error("change_password"))?;

        row.map(User::try_from).transpose()
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self, email), err))]
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, OnboardError> {
        let row: Option<UserRecord> =
            sqlx::query_as(&format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?"))
                .bind(normalize_email(email))
                .fetch_optional(&self.pool)
                .await
                .map_err(map_db_error("find_user_by_email"))?;

        row.map(User::try_from).transpose()
    }
}
