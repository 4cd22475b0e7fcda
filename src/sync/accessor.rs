use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::models::live_session::LiveSession;

#[derive(Debug, Error)]
pub enum AccessError {
    #[error("live session {0} not found")]
    NotFound(String),

    #[error("server returned status {0}")]
    Status(u16),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
}

/// Remote read/write pair the synchronizer polls and writes through.
#[async_trait]
pub trait LiveSessionAccessor: Send + Sync + 'static {
    async fn get_live_session(&self, id: &str) -> Result<LiveSession, AccessError>;

    async fn update_live_session(
        &self,
        id: &str,
        patch: Map<String, Value>,
    ) -> Result<(), AccessError>;
}

/// Talks to the `/api/live-sessions` routes of a running server.
pub struct HttpLiveSessionAccessor {
    client: Client,
    base_url: String,
}

impl HttpLiveSessionAccessor {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn session_url(&self, id: &str) -> String {
        format!(
            "{}/api/live-sessions/{}",
            self.base_url,
            urlencoding::encode(id)
        )
    }
}

#[async_trait]
impl LiveSessionAccessor for HttpLiveSessionAccessor {
    async fn get_live_session(&self, id: &str) -> Result<LiveSession, AccessError> {
        let response = self.client.get(self.session_url(id)).send().await?;
        match response.status() {
            StatusCode::NOT_FOUND => Err(AccessError::NotFound(id.to_string())),
            status if !status.is_success() => Err(AccessError::Status(status.as_u16())),
            _ => Ok(response.json().await?),
        }
    }

    async fn update_live_session(
        &self,
        id: &str,
        patch: Map<String, Value>,
    ) -> Result<(), AccessError> {
        let response = self
            .client
            .patch(self.session_url(id))
            .json(&patch)
            .send()
            .await?;
        match response.status() {
            StatusCode::NOT_FOUND => Err(AccessError::NotFound(id.to_string())),
            status if !status.is_success() => Err(AccessError::Status(status.as_u16())),
            _ => Ok(()),
        }
    }
}
