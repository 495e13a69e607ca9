//! In-memory user store
//!
//! Backs the test suite and database-free local runs. Uniqueness is
//! checked under the same write lock as the mutation, so concurrent
//! writers cannot both pass the check.

use std::collections::BTreeMap;
use std::sync::RwLock;

use anyhow::anyhow;
use async_trait::async_trait;

use super::{StoreError, UserStore};
use crate::models::{NewUser, User};

/// In-memory implementation of [`UserStore`]
#[derive(Default)]
pub struct InMemoryUserStore {
    inner: RwLock<Inner>,
}

#[derive(Default)]
struct Inner {
    rows: BTreeMap<i64, User>,
    next_id: i64,
}

impl InMemoryUserStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_poisoned() -> StoreError {
    StoreError::Backend(anyhow!("user store lock poisoned"))
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, StoreError> {
        let inner = self.inner.read().map_err(|_| lock_poisoned())?;
        Ok(inner.rows.get(&id).cloned())
    }

    async fn email_exists(
        &self,
        email: &str,
        exclude_id: Option<i64>,
    ) -> Result<bool, StoreError> {
        let inner = self.inner.read().map_err(|_| lock_poisoned())?;
        Ok(inner
            .rows
            .values()
            .any(|u| u.email == email && Some(u.id) != exclude_id))
    }

    async fn insert(&self, new_user: NewUser) -> Result<User, StoreError> {
        let mut inner = self.inner.write().map_err(|_| lock_poisoned())?;

        if inner.rows.values().any(|u| u.email == new_user.email) {
            return Err(StoreError::DuplicateEmail);
        }

        inner.next_id += 1;
        let user = User {
            id: inner.next_id,
            name: new_user.name,
            email: new_user.email,
            password_hash: new_user.password_hash,
        };
        inner.rows.insert(user.id, user.clone());

        Ok(user)
    }

    async fn update(&self, user: User) -> Result<User, StoreError> {
        let mut inner = self.inner.write().map_err(|_| lock_poisoned())?;

        if !inner.rows.contains_key(&user.id) {
            return Err(StoreError::Backend(anyhow!(
                "no user with id {} to update",
                user.id
            )));
        }

        if inner
            .rows
            .values()
            .any(|u| u.email == user.email && u.id != user.id)
        {
            return Err(StoreError::DuplicateEmail);
        }

        inner.rows.insert(user.id, user.clone());
        Ok(user)
    }

    async fn delete(&self, id: i64) -> Result<bool, StoreError> {
        let mut inner = self.inner.write().map_err(|_| lock_poisoned())?;
        Ok(inner.rows.remove(&id).is_some())
    }

    async fn list_page(&self, offset: i64, limit: i64) -> Result<(Vec<User>, i64), StoreError> {
        let inner = self.inner.read().map_err(|_| lock_poisoned())?;

        let total = inner.rows.len() as i64;
        let offset = usize::try_from(offset).unwrap_or(usize::MAX);
        let limit = usize::try_from(limit).unwrap_or(0);

        // BTreeMap iterates in ascending key order
        let users = inner
            .rows
            .values()
            .skip(offset)
            .take(limit)
            .cloned()
            .collect();

        Ok((users, total))
    }
}
