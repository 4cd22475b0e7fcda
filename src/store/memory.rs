use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{NewUser, Store, StoreError};
use crate::models::{
    live_session::{sanitize_patch, LiveSession},
    session::Session,
    user::User,
};

#[derive(Default)]
struct Tables {
    next_user_id: i32,
    users: Vec<User>,
    sessions: Vec<Session>,
    live_sessions: HashMap<String, LiveSession>,
}

/// Process-local store. Contents vanish on restart.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .iter()
            .find(|u| u.user_email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn find_user_by_id(&self, user_id: i32) -> Result<Option<User>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.user_id == user_id).cloned())
    }

    async fn insert_user(&self, new_user: NewUser<'_>) -> Result<User, StoreError> {
        let mut tables = self.tables.write().await;
        if tables
            .users
            .iter()
            .any(|u| u.user_email.eq_ignore_ascii_case(new_user.email))
        {
            return Err(StoreError::Duplicate);
        }
        tables.next_user_id += 1;
        let user = User {
            user_id: tables.next_user_id,
            user_name: new_user.name.to_string(),
            user_email: new_user.email.to_string(),
            password_hash: Some(new_user.password_hash.to_string()),
        };
        tables.users.push(user.clone());
        Ok(user)
    }

    async fn insert_session(&self, session: &Session) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        if tables
            .sessions
            .iter()
            .any(|s| s.session_token == session.session_token)
        {
            return Err(StoreError::Duplicate);
        }
        tables.sessions.push(session.clone());
        Ok(())
    }

    async fn find_session(&self, token: &str) -> Result<Option<Session>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .sessions
            .iter()
            .find(|s| s.session_token == token)
            .cloned())
    }

    async fn delete_sessions_by_token(&self, token: &str) -> Result<u64, StoreError> {
        let mut tables = self.tables.write().await;
        let before = tables.sessions.len();
        tables.sessions.retain(|s| s.session_token != token);
        Ok((before - tables.sessions.len()) as u64)
    }

    async fn purge_expired_sessions(&self, now: DateTime<Utc>) -> Result<u64, StoreError> {
        let mut tables = self.tables.write().await;
        let before = tables.sessions.len();
        tables.sessions.retain(|s| !s.is_expired(now));
        Ok((before - tables.sessions.len()) as u64)
    }

    async fn create_live_session(
        &self,
        fields: Map<String, Value>,
    ) -> Result<LiveSession, StoreError> {
        let now = Utc::now();
        let session = LiveSession {
            id: Uuid::new_v4().to_string(),
            fields: sanitize_patch(fields),
            created_at: now,
            updated_at: now,
        };
        let mut tables = self.tables.write().await;
        tables
            .live_sessions
            .insert(session.id.clone(), session.clone());
        Ok(session)
    }

    async fn get_live_session(&self, id: &str) -> Result<Option<LiveSession>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.live_sessions.get(id).cloned())
    }

    async fn update_live_session(
        &self,
        id: &str,
        patch: Map<String, Value>,
    ) -> Result<LiveSession, StoreError> {
        let mut tables = self.tables.write().await;
        let session = tables
            .live_sessions
            .get_mut(id)
            .ok_or(StoreError::NotFound)?;
        session.apply_patch(patch, Utc::now());
        Ok(session.clone())
    }
}
