//! Persistence for accounts, login sessions and live sessions.
//!
//! Handlers only see [`Store`]. `MySqlStore` is the production backend;
//! `MemoryStore` serves local development without a database and the tests.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::models::{live_session::LiveSession, session::Session, user::User};

pub mod memory;
pub mod mysql;

pub use memory::MemoryStore;
pub use mysql::MySqlStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("record already exists")]
    Duplicate,
    #[error("record not found")]
    NotFound,
    #[error("generated id {0} does not fit the id column")]
    IdOutOfRange(u64),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub struct NewUser<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
}

#[async_trait]
pub trait Store: Send + Sync {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    async fn find_user_by_id(&self, user_id: i32) -> Result<Option<User>, StoreError>;

    /// Fails with [`StoreError::Duplicate`] when the email is taken.
    async fn insert_user(&self, new_user: NewUser<'_>) -> Result<User, StoreError>;

    async fn insert_session(&self, session: &Session) -> Result<(), StoreError>;

    async fn find_session(&self, token: &str) -> Result<Option<Session>, StoreError>;

    /// Returns how many rows were removed. Zero is not an error.
    async fn delete_sessions_by_token(&self, token: &str) -> Result<u64, StoreError>;

    async fn purge_expired_sessions(&self, now: DateTime<Utc>) -> Result<u64, StoreError>;

    async fn create_live_session(
        &self,
        fields: Map<String, Value>,
    ) -> Result<LiveSession, StoreError>;

    async fn get_live_session(&self, id: &str) -> Result<Option<LiveSession>, StoreError>;

    /// Merges `patch` into the stored fields. Fails with [`StoreError::NotFound`]
    /// for an unknown id.
    async fn update_live_session(
        &self,
        id: &str,
        patch: Map<String, Value>,
    ) -> Result<LiveSession, StoreError>;
}
