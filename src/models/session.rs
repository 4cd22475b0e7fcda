use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

pub const SESSION_COOKIE: &str = "session_token";
pub const SESSION_TTL_DAYS: i64 = 30;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Session {
    pub session_token: String,
    pub user_id: i32,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// Mints a fresh random token for `user_id`, valid for thirty days.
    pub fn issue(user_id: i32) -> Self {
        Self {
            session_token: Uuid::new_v4().to_string(),
            user_id,
            expires_at: Utc::now() + Duration::days(SESSION_TTL_DAYS),
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}
