//! Storage abstraction for user persistence

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{NewUser, User};

pub mod memory;
pub mod postgres;

pub use memory::InMemoryUserStore;
pub use postgres::PgUserStore;

/// Errors surfaced by a user store
#[derive(Error, Debug)]
pub enum StoreError {
    /// Another live row already holds the requested email
    #[error("a user with this email already exists")]
    DuplicateEmail,

    /// Any other storage backend failure
    #[error("storage backend error: {0}")]
    Backend(#[source] anyhow::Error),
}

/// Port for user persistence.
///
/// Implementations must enforce email uniqueness inside the same
/// transaction or lock scope as the write, so two concurrent writers
/// cannot both pass the check. Object-safe and async-friendly via
/// `async_trait`.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Point lookup by identifier.
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, StoreError>;

    /// Check whether any live row holds `email`, optionally ignoring the
    /// row with identifier `exclude_id` (the update target).
    async fn email_exists(&self, email: &str, exclude_id: Option<i64>)
    -> Result<bool, StoreError>;

    /// Insert a new row, returning it with its generated identifier.
    /// Fails with [`StoreError::DuplicateEmail`] if the email is taken.
    async fn insert(&self, new_user: NewUser) -> Result<User, StoreError>;

    /// Overwrite the row keyed by `user.id`.
    /// Fails with [`StoreError::DuplicateEmail`] if the email is taken
    /// by a different row.
    async fn update(&self, user: User) -> Result<User, StoreError>;

    /// Delete by identifier. Returns true iff a row was removed.
    async fn delete(&self, id: i64) -> Result<bool, StoreError>;

    /// Scan ordered by ascending identifier, skipping `offset` rows and
    /// taking up to `limit`, together with the total row count.
    async fn list_page(&self, offset: i64, limit: i64) -> Result<(Vec<User>, i64), StoreError>;
}
