//! User records and the store contract the handlers depend on.

use async_trait::async_trait;
use thiserror::Error;
use time::OffsetDateTime;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub email: String,
    pub name: String,
    pub password_hash: String,
    pub role: i32,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// Input to [`UserStore::upsert`]. Timestamps are assigned by the store.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub name: String,
    pub password_hash: String,
    pub role: i32,
}

impl NewUser {
    /// `name` defaults to the local part of the email.
    pub fn new(email: impl Into<String>, password_hash: impl Into<String>, role: i32) -> Self {
        let email = email.into();
        Self {
            name: display_name(&email).to_string(),
            email,
            password_hash: password_hash.into(),
            role,
        }
    }
}

pub fn display_name(email: &str) -> &str {
    email.split('@').next().unwrap_or(email)
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("user not found")]
    NotFound,
    #[error("user store backend failure: {0}")]
    Backend(#[from] sea_orm::DbErr),
}

/// Persistence for user accounts, keyed by email. Last write wins.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find(&self, email: &str) -> Result<Option<UserRecord>, StoreError>;

    /// Insert or overwrite. An existing record keeps its `created_at`.
    async fn upsert(&self, user: NewUser) -> Result<UserRecord, StoreError>;

    /// `false` when there was nothing to delete.
    async fn delete(&self, email: &str) -> Result<bool, StoreError>;

    /// Most recently updated first, skipping `offset` rows, through to the end.
    async fn list(&self, offset: u64) -> Result<Vec<UserRecord>, StoreError>;
}

impl From<crate::entities::users::Model> for UserRecord {
    fn from(model: crate::entities::users::Model) -> Self {
        Self {
            email: model.email,
            name: model.name,
            password_hash: model.password_hash,
            role: model.role,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
