use serde::Deserialize;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QrQuery {
    pub session_id: Option<String>,
}
