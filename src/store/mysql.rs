use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::info;
use serde_json::{Map, Value};
use sqlx::mysql::{MySqlPool, MySqlPoolOptions};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

use super::{NewUser, Store, StoreError};
use crate::models::{
    live_session::{sanitize_patch, LiveSession},
    session::Session,
    user::User,
};

#[derive(FromRow)]
struct LiveSessionRow {
    live_session_id: String,
    state: Json<Map<String, Value>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<LiveSessionRow> for LiveSession {
    fn from(row: LiveSessionRow) -> Self {
        Self {
            id: row.live_session_id,
            fields: row.state.0,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

fn map_insert_error(e: sqlx::Error) -> StoreError {
    match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => StoreError::Duplicate,
        _ => StoreError::Database(e),
    }
}

fn user_id_from_insert(last_insert_id: u64) -> Result<i32, StoreError> {
    i32::try_from(last_insert_id).map_err(|_| StoreError::IdOutOfRange(last_insert_id))
}

pub struct MySqlStore {
    pool: MySqlPool,
}

impl MySqlStore {
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, StoreError> {
        let pool = MySqlPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        info!("Connected to MySQL with up to {} connections", max_connections);
        Ok(Self { pool })
    }
}

#[async_trait]
impl Store for MySqlStore {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT user_id, user_name, user_email, password_hash FROM Users_ WHERE user_email = ?",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn find_user_by_id(&self, user_id: i32) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT user_id, user_name, user_email, password_hash FROM Users_ WHERE user_id = ?",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn insert_user(&self, new_user: NewUser<'_>) -> Result<User, StoreError> {
        let result = sqlx::query(
            "INSERT INTO Users_ (user_name, user_email, password_hash) VALUES (?, ?, ?)",
        )
        .bind(new_user.name)
        .bind(new_user.email)
        .bind(new_user.password_hash)
        .execute(&self.pool)
        .await
        .map_err(map_insert_error)?;

        Ok(User {
            user_id: user_id_from_insert(result.last_insert_id())?,
            user_name: new_user.name.to_string(),
            user_email: new_user.email.to_string(),
            password_hash: Some(new_user.password_hash.to_string()),
        })
    }

    async fn insert_session(&self, session: &Session) -> Result<(), StoreError> {
        sqlx::query("INSERT INTO Sessions_ (session_token, user_id, expires_at) VALUES (?, ?, ?)")
            .bind(&session.session_token)
            .bind(session.user_id)
            .bind(session.expires_at)
            .execute(&self.pool)
            .await
            .map_err(map_insert_error)?;
        Ok(())
    }

    async fn find_session(&self, token: &str) -> Result<Option<Session>, StoreError> {
        let session = sqlx::query_as::<_, Session>(
            "SELECT session_token, user_id, expires_at FROM Sessions_ WHERE session_token = ?",
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;
        Ok(session)
    }

    async fn delete_sessions_by_token(&self, token: &str) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM Sessions_ WHERE session_token = ?")
            .bind(token)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn purge_expired_sessions(&self, now: DateTime<Utc>) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM Sessions_ WHERE expires_at <= ?")
            .bind(now)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
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
        sqlx::query(
            "INSERT INTO LiveSessions_ (live_session_id, state, created_at, updated_at) VALUES (?, ?, ?, ?)",
        )
        .bind(&session.id)
        .bind(Json(&session.fields))
        .bind(session.created_at)
        .bind(session.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_insert_error)?;
        Ok(session)
    }

    async fn get_live_session(&self, id: &str) -> Result<Option<LiveSession>, StoreError> {
        let row = sqlx::query_as::<_, LiveSessionRow>(
            "SELECT live_session_id, state, created_at, updated_at FROM LiveSessions_ WHERE live_session_id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(LiveSession::from))
    }

    async fn update_live_session(
        &self,
        id: &str,
        patch: Map<String, Value>,
    ) -> Result<LiveSession, StoreError> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, LiveSessionRow>(
            "SELECT live_session_id, state, created_at, updated_at FROM LiveSessions_ WHERE live_session_id = ? FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        let mut session = match row {
            Some(row) => LiveSession::from(row),
            None => return Err(StoreError::NotFound),
        };
        session.apply_patch(patch, Utc::now());

        sqlx::query("UPDATE LiveSessions_ SET state = ?, updated_at = ? WHERE live_session_id = ?")
            .bind(Json(&session.fields))
            .bind(session.updated_at)
            .bind(&session.id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(session)
    }
}
