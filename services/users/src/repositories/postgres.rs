//! PostgreSQL-backed user store

use async_trait::async_trait;
use common::error::DatabaseError;
use sqlx::{PgPool, Row};
use tracing::info;

use super::{StoreError, UserStore};
use crate::models::{NewUser, User};

/// User store backed by a PostgreSQL pool
#[derive(Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    /// Create a new PostgreSQL user store
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create the users table and its unique email constraint if missing.
    ///
    /// The unique constraint is what closes the duplicate-email race
    /// between concurrent writers; violations surface as
    /// [`StoreError::DuplicateEmail`].
    pub async fn ensure_schema(&self) -> Result<(), DatabaseError> {
        info!("Ensuring users schema");

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS users (
                id BIGSERIAL PRIMARY KEY,
                name TEXT,
                email TEXT NOT NULL,
                password_hash TEXT NOT NULL,
                CONSTRAINT users_email_key UNIQUE (email)
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| DatabaseError::Migration(e.to_string()))?;

        Ok(())
    }
}

/// Map a sqlx error, surfacing unique-constraint violations (SQLSTATE
/// 23505) as the duplicate-email condition.
fn map_sqlx_error(e: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(ref db) = e {
        if db.code().as_deref() == Some("23505") {
            return StoreError::DuplicateEmail;
        }
    }
    StoreError::Backend(e.into())
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, StoreError> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password_hash
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)
    }

    async fn email_exists(
        &self,
        email: &str,
        exclude_id: Option<i64>,
    ) -> Result<bool, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM users
                WHERE email = $1 AND ($2::BIGINT IS NULL OR id <> $2)
            ) AS taken
            "#,
        )
        .bind(email)
        .bind(exclude_id)
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.get("taken"))
    }

    async fn insert(&self, new_user: NewUser) -> Result<User, StoreError> {
        info!("Inserting user with email: {}", new_user.email);

        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, email, password_hash)
            VALUES ($1, $2, $3)
            RETURNING id, name, email, password_hash
            "#,
        )
        .bind(&new_user.name)
        .bind(&new_user.email)
        .bind(&new_user.password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx_error)
    }

    async fn update(&self, user: User) -> Result<User, StoreError> {
        info!("Updating user: {}", user.id);

        sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET name = $2, email = $3, password_hash = $4
            WHERE id = $1
            RETURNING id, name, email, password_hash
            "#,
        )
        .bind(user.id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx_error)
    }

    async fn delete(&self, id: i64) -> Result<bool, StoreError> {
        info!("Deleting user: {}", id);

        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_page(&self, offset: i64, limit: i64) -> Result<(Vec<User>, i64), StoreError> {
        let total_row = sqlx::query("SELECT COUNT(*) AS total FROM users")
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        let total: i64 = total_row.get("total");

        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password_hash
            FROM users
            ORDER BY id ASC
            OFFSET $1 LIMIT $2
            "#,
        )
        .bind(offset)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok((users, total))
    }
}
