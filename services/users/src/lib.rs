//! User management service
//!
//! Manages a single entity, the user account, behind a small HTTP surface:
//! create-or-update (upsert keyed by identifier), point lookup, deletion,
//! and offset-paged listing. Business rules (email uniqueness, password
//! hashing, wire/storage mapping) live in [`service::UserService`]; durable
//! state sits behind the [`repositories::UserStore`] port.

pub mod error;
pub mod hashing;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod service;
pub mod state;
pub mod validation;
