use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;

use crate::crypto::{Argon2Hasher, PasswordHasher};
use crate::db::{USER_COLUMNS, UserRecord, map_db_error};
use crate::repository::{NewUser, Registration, User, UserRepository};
use crate::validators::normalize_email;
use crate::{OnboardError, SecretString};

#[derive(Clone)]
pub struct PostgresUserRepository {
    pool: PgPool,
    hasher: Argon2Hasher,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self::with_hasher(pool, Argon2Hasher::default())
    }

    pub fn with_hasher(pool: PgPool, hasher: Argon2Hasher) -> Self {
        Self { pool, hasher }
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self, user), err))]
    async fn create(&self, workspace_id: i64, user: NewUser) -> Result<User, OnboardError> {
        let row: UserRecord = sqlx::query_as(&format!(
            "INSERT INTO users (workspace_id, email, role) VALUES ($1, $2, $3) RETURNING {USER_COLUMNS}"
        ))
        .bind(workspace_id)
        .bind(normalize_email(&user.email))
        .bind(user.role.as_str())
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
        let emails: Vec<String> = users.iter().map(|u| normalize_email(&u.email)).collect();
        let roles: Vec<&str> = users.iter().map(|u| u.role.as_str()).collect();

        // one statement, so the batch is atomic without an explicit transaction
        let rows: Vec<UserRecord> = sqlx::query_as(&format!(
            "INSERT INTO users (workspace_id, email, role) SELECT $1, email, role FROM UNNEST($2::TEXT[], $3::TEXT[]) WITH ORDINALITY AS t(email, role, n) ORDER BY n RETURNING {USER_COLUMNS}"
        ))
        .bind(workspace_id)
        .bind(&emails)
        .bind(&roles)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error("create_users"))?;

        rows.into_iter().map(User::try_from).collect()
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
            "UPDATE users SET first_name = $1, last_name = $2, phone_number = $3, password_hash = $4, updated_at = NOW() WHERE email = $5 RETURNING {USER_COLUMNS}"
        ))
        .bind(&registration.first_name)
        .bind(&registration.last_name)
        .bind(&registration.phone_number)
        .bind(password_hash)
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
            "UPDATE users SET password_hash = $1, updated_at = $2 WHERE id = $3 AND workspace_id = $4 AND password_hash IS NOT NULL RETURNING {USER_COLUMNS}"
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
            sqlx::query_as(&format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1"))
                .bind(normalize_email(email))
                .fetch_optional(&self.pool)
                .await
                .map_err(map_db_error("find_user_by_email"))?;

        row.map(User::try_from).transpose()
    }
}
