//! User service: upsert, point lookup, deletion, and paged listing
//!
//! All business rules live here: the upsert branch decision, the
//! email-uniqueness check, password hashing before persistence, and
//! pagination clamping. Durable state sits behind the injected
//! [`UserStore`] handle; the service itself is stateless between calls.

use std::sync::Arc;

use thiserror::Error;
use tracing::{info, warn};

use crate::hashing::PasswordHasher;
use crate::models::{NewUser, PagedResult, User, UserRead, UserWrite};
use crate::repositories::{StoreError, UserStore};

const DEFAULT_PAGE_NUMBER: i64 = 1;
const DEFAULT_PAGE_SIZE: i64 = 10;

/// Errors surfaced by the user service.
///
/// "Not found" and "nothing to delete" are not errors; they come back as
/// `Ok(None)` / `Ok(false)` so the caller decides the response.
#[derive(Error, Debug)]
pub enum UserError {
    /// Another live user already holds the requested email
    #[error("a user with this email already exists")]
    DuplicateEmail,

    /// Storage or infrastructure fault, wrapped with operation context
    #[error("unexpected storage failure during {operation}: {source}")]
    Unexpected {
        operation: String,
        #[source]
        source: anyhow::Error,
    },
}

impl UserError {
    fn from_store(operation: impl Into<String>, e: StoreError) -> Self {
        match e {
            StoreError::DuplicateEmail => Self::DuplicateEmail,
            StoreError::Backend(source) => Self::Unexpected {
                operation: operation.into(),
                source,
            },
        }
    }
}

/// Branch decision for the upsert operation, resolved by an explicit
/// lookup step before any write.
enum UpsertTarget {
    Create,
    Update(User),
}

/// User service. Holds the storage handle and the password hasher via
/// constructor injection; cheap to clone and share across handlers.
#[derive(Clone)]
pub struct UserService {
    store: Arc<dyn UserStore>,
    hasher: PasswordHasher,
}

impl UserService {
    /// Create a new user service over the given store
    pub fn new(store: Arc<dyn UserStore>, hasher: PasswordHasher) -> Self {
        Self { store, hasher }
    }

    /// Create or update a user.
    ///
    /// A positive `id` targeting an existing row updates it; anything
    /// else creates a new row. Note that a positive `id` with no
    /// matching row falls back to CREATE rather than erroring, so a
    /// stale identifier from a retrying client mints a fresh row instead
    /// of failing the call.
    pub async fn add_or_edit_user(&self, user: UserWrite) -> Result<UserRead, UserError> {
        match self.resolve_target(&user).await? {
            UpsertTarget::Create => self.create_user(user).await,
            UpsertTarget::Update(existing) => self.update_user(existing, user).await,
        }
    }

    async fn resolve_target(&self, user: &UserWrite) -> Result<UpsertTarget, UserError> {
        if user.id <= 0 {
            return Ok(UpsertTarget::Create);
        }

        let found = self
            .store
            .find_by_id(user.id)
            .await
            .map_err(|e| UserError::from_store(format!("upsert lookup for user {}", user.id), e))?;

        match found {
            Some(existing) => Ok(UpsertTarget::Update(existing)),
            None => {
                warn!(
                    "Upsert targeted unknown user id {}, falling back to create",
                    user.id
                );
                Ok(UpsertTarget::Create)
            }
        }
    }

    async fn create_user(&self, user: UserWrite) -> Result<UserRead, UserError> {
        info!("Creating user with email: {}", user.email);

        let taken = self
            .store
            .email_exists(&user.email, None)
            .await
            .map_err(|e| UserError::from_store("create email check", e))?;
        if taken {
            return Err(UserError::DuplicateEmail);
        }

        let password_hash = self.hasher.hash(user.password.as_deref().unwrap_or(""));

        // The store enforces uniqueness atomically with the write, so a
        // concurrent create that slipped past the check above still
        // surfaces as DuplicateEmail here.
        let created = self
            .store
            .insert(NewUser {
                name: Some(user.name),
                email: user.email,
                password_hash,
            })
            .await
            .map_err(|e| UserError::from_store("create user", e))?;

        Ok(UserRead::from(created))
    }

    async fn update_user(&self, mut existing: User, user: UserWrite) -> Result<UserRead, UserError> {
        info!("Updating user: {}", existing.id);

        let taken = self
            .store
            .email_exists(&user.email, Some(existing.id))
            .await
            .map_err(|e| {
                UserError::from_store(format!("update email check for user {}", existing.id), e)
            })?;
        if taken {
            return Err(UserError::DuplicateEmail);
        }

        existing.name = Some(user.name);
        existing.email = user.email;

        // A blank or absent password preserves the existing digest
        if let Some(password) = user.password.as_deref() {
            if !password.trim().is_empty() {
                existing.password_hash = self.hasher.hash(password);
            }
        }

        let updated = self
            .store
            .update(existing)
            .await
            .map_err(|e| UserError::from_store("update user", e))?;

        Ok(UserRead::from(updated))
    }

    /// Point lookup by identifier. Absent rows come back as `Ok(None)`.
    pub async fn get_user_by_id(&self, id: i64) -> Result<Option<UserRead>, UserError> {
        let user = self
            .store
            .find_by_id(id)
            .await
            .map_err(|e| UserError::from_store(format!("get user {id}"), e))?;

        Ok(user.map(UserRead::from))
    }

    /// Delete by identifier. Returns false when there was nothing to
    /// delete, true only when the removal affected storage.
    pub async fn delete_user(&self, id: i64) -> Result<bool, UserError> {
        let found = self
            .store
            .find_by_id(id)
            .await
            .map_err(|e| UserError::from_store(format!("delete lookup for user {id}"), e))?;

        if found.is_none() {
            return Ok(false);
        }

        self.store
            .delete(id)
            .await
            .map_err(|e| UserError::from_store(format!("delete user {id}"), e))
    }

    /// Paged listing ordered by ascending identifier.
    ///
    /// Non-positive or absent page parameters fall back to page 1 / size
    /// 10; the returned [`PagedResult`] carries the values actually
    /// applied. Pages beyond the end yield an empty item list with the
    /// correct total count.
    pub async fn get_all_users(
        &self,
        page_number: Option<i64>,
        page_size: Option<i64>,
    ) -> Result<PagedResult<UserRead>, UserError> {
        let page_number = clamp_or_default(page_number, DEFAULT_PAGE_NUMBER);
        let page_size = clamp_or_default(page_size, DEFAULT_PAGE_SIZE);

        let offset = page_number.saturating_sub(1).saturating_mul(page_size);
        let (rows, total_count) = self
            .store
            .list_page(offset, page_size)
            .await
            .map_err(|e| UserError::from_store("list users", e))?;

        Ok(PagedResult {
            items: rows.iter().map(UserRead::from).collect(),
            total_count,
            page_number,
            page_size,
        })
    }
}

fn clamp_or_default(value: Option<i64>, default: i64) -> i64 {
    match value {
        Some(v) if v > 0 => v,
        _ => default,
    }
}
