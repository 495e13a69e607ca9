//! User model and its wire representations

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// User entity as stored. The password digest stays inside the service
/// boundary; this type deliberately does not implement `Serialize`.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct User {
    pub id: i64,
    pub name: Option<String>,
    pub email: String,
    pub password_hash: String,
}

/// Insert payload for the store. The identifier is generated on insert.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: Option<String>,
    pub email: String,
    pub password_hash: String,
}

/// Inbound write model. An `id` of zero (or absent) requests a create;
/// a positive `id` targets an update.
#[derive(Debug, Clone, Deserialize)]
pub struct UserWrite {
    #[serde(default)]
    pub id: i64,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub password: Option<String>,
}

/// Outbound read model. Produced only by mapping from [`User`], which
/// drops the password digest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRead {
    pub id: i64,
    pub name: Option<String>,
    pub email: String,
}

impl From<User> for UserRead {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            name: u.name,
            email: u.email,
        }
    }
}

impl From<&User> for UserRead {
    fn from(u: &User) -> Self {
        Self {
            id: u.id,
            name: u.name.clone(),
            email: u.email.clone(),
        }
    }
}

/// One page of an ordered listing, with the total row count and the
/// page number/size actually applied after clamping.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PagedResult<T> {
    pub items: Vec<T>,
    pub total_count: i64,
    pub page_number: i64,
    pub page_size: i64,
}
