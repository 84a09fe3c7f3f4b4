//! `PostgreSQL` account repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::instrument;

use corner_shop_core::{Email, UserId, Username};

use super::{RepositoryError, UserRepository};
use crate::models::{NewUser, User};

/// Account row as stored in `shop.user`.
#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: UserId,
    username: String,
    email: Option<String>,
    created_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = RepositoryError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let username = Username::parse(&row.username).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid username in database: {e}"))
        })?;
        let email = row
            .email
            .as_deref()
            .map(Email::parse)
            .transpose()
            .map_err(|e| {
                RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
            })?;

        Ok(Self {
            id: row.id,
            username,
            email,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct UserWithHashRow {
    #[sqlx(flatten)]
    user: UserRow,
    password_hash: String,
}

/// Repository for `shop.user`.
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    #[instrument(skip(self, user), fields(username = %user.username))]
    async fn create(&self, user: NewUser) -> Result<User, RepositoryError> {
        let row: UserRow = sqlx::query_as(
            r"
            INSERT INTO shop.user (username, email, password_hash)
            VALUES ($1, $2, $3)
            RETURNING id, username, email, created_at
            ",
        )
        .bind(user.username.as_str())
        .bind(user.email.as_ref().map(Email::as_str))
        .bind(&user.password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| RepositoryError::from_write(e, "username already exists"))?;

        row.try_into()
    }

    async fn get_password_hash(
        &self,
        username: &Username,
    ) -> Result<Option<(User, String)>, RepositoryError> {
        let row: Option<UserWithHashRow> = sqlx::query_as(
            r"
            SELECT id, username, email, created_at, password_hash
            FROM shop.user
            WHERE username = $1
            ",
        )
        .bind(username.as_str())
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        Ok(Some((row.user.try_into()?, row.password_hash)))
    }

    async fn list(&self) -> Result<Vec<User>, RepositoryError> {
        let rows: Vec<UserRow> = sqlx::query_as(
            r"
            SELECT id, username, email, created_at
            FROM shop.user
            ORDER BY id ASC
            ",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(User::try_from).collect()
    }
}
