//! Client for the text translation provider.

use log::debug;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

/// All text is translated from English.
pub const SOURCE_LANGUAGE: &str = "en";
/// The one language name recognised by [`target_language_code`].
pub const DESIGNATED_LANGUAGE: &str = "korean";
pub const DESIGNATED_CODE: &str = "ko";
pub const DEFAULT_CODE: &str = "es";

#[derive(Debug, Error)]
pub enum TranslateError {
    /// The provider answered but reported a failure.
    #[error("Translation failed: {0}")]
    Provider(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
}

/// Maps a language name to the code sent upstream. Only the designated name is
/// recognised, in any letter case; everything else gets the default code.
pub fn target_language_code(name: &str) -> &'static str {
    if name.trim().eq_ignore_ascii_case(DESIGNATED_LANGUAGE) {
        DESIGNATED_CODE
    } else {
        DEFAULT_CODE
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProviderResponse {
    response_data: Option<ResponseData>,
    // Sent as a number on success and sometimes as a string on failure.
    response_status: Option<Value>,
    response_details: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResponseData {
    translated_text: Option<String>,
}

impl ProviderResponse {
    fn status(&self) -> Option<u64> {
        match &self.response_status {
            Some(Value::Number(n)) => n.as_u64(),
            Some(Value::String(s)) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

#[derive(Clone)]
pub struct Translator {
    client: Client,
    base_url: String,
}

impl Translator {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Translates `text` into the language named by `target_language`.
    pub async fn translate(
        &self,
        text: &str,
        target_language: &str,
    ) -> Result<String, TranslateError> {
        let code = target_language_code(target_language);
        let langpair = format!("{}|{}", SOURCE_LANGUAGE, code);
        debug!("Translating {} chars with langpair {}", text.len(), langpair);

        let body: ProviderResponse = self
            .client
            .get(format!("{}/get", self.base_url))
            .query(&[("q", text), ("langpair", langpair.as_str())])
            .send()
            .await?
            .json()
            .await?;

        if body.status() == Some(200) {
            if let Some(translated) = body.response_data.and_then(|d| d.translated_text) {
                return Ok(translated);
            }
        }

        let detail = body
            .response_details
            .filter(|d| !d.trim().is_empty())
            .unwrap_or_else(|| "Unknown provider error".to_string());
        Err(TranslateError::Provider(detail))
    }
}
