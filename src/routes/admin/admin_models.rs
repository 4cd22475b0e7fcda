use serde::Serialize;

#[derive(Serialize)]
pub struct PurgeSessionsResponse {
    pub success: bool,
    pub message: String,
    pub purged: u64,
}
