//! Client for the scripture provider.
//!
//! The provider answers both reference lookups and keyword searches with the same
//! envelope: a canonical `reference` string plus the matching verses. Nothing is
//! cached; every call goes out to the network.

use log::{debug, warn};
use reqwest::{Client, Response};
use serde::Deserialize;
use thiserror::Error;

use crate::models::verse::BibleVerse;

#[derive(Debug, Error)]
pub enum VerseError {
    /// Lookup came back empty or the provider refused the reference.
    #[error("Verse not found: {0}")]
    NotFound(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
}

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    reference: String,
    #[serde(default)]
    verses: Vec<RawVerse>,
}

#[derive(Debug, Deserialize)]
struct RawVerse {
    #[serde(default)]
    book_id: String,
    book_name: String,
    chapter: u32,
    verse: u32,
    text: String,
}

impl Envelope {
    fn into_verses(self) -> Vec<BibleVerse> {
        let reference = self.reference;
        self.verses
            .into_iter()
            .map(|v| BibleVerse {
                book_id: v.book_id,
                book_name: v.book_name,
                chapter: v.chapter,
                verse: v.verse,
                text: v.text,
                reference: reference.clone(),
            })
            .collect()
    }
}

#[derive(Clone)]
pub struct BibleClient {
    client: Client,
    base_url: String,
    translation: String,
}

impl BibleClient {
    pub fn new(base_url: &str, translation: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            translation: translation.to_string(),
        }
    }

    async fn request(&self, query: &str) -> Result<Response, VerseError> {
        let url = format!("{}/{}", self.base_url, urlencoding::encode(query.trim()));
        let response = self
            .client
            .get(&url)
            .query(&[("translation", self.translation.as_str())])
            .send()
            .await?;
        Ok(response)
    }

    /// Fetches the verses for a reference such as `John 3:16-18`.
    ///
    /// Never returns an empty list: zero verses or a non-success status is
    /// [`VerseError::NotFound`].
    pub async fn fetch_reference(&self, reference: &str) -> Result<Vec<BibleVerse>, VerseError> {
        debug!("Fetching verses for {}", reference);
        let response = self.request(reference).await?;

        if !response.status().is_success() {
            warn!(
                "Scripture provider answered {} for reference {}",
                response.status(),
                reference
            );
            return Err(VerseError::NotFound(reference.to_string()));
        }

        let verses = response.json::<Envelope>().await?.into_verses();
        if verses.is_empty() {
            return Err(VerseError::NotFound(reference.to_string()));
        }
        Ok(verses)
    }

    /// Keyword search through the same lookup endpoint, best effort.
    ///
    /// A non-success status, an unreadable body or zero verses all give an empty
    /// list. Only a failed request is an error.
    pub async fn search(&self, keyword: &str) -> Result<Vec<BibleVerse>, VerseError> {
        debug!("Searching verses for {:?}", keyword);
        let response = self.request(keyword).await?;

        let status = response.status();
        if !status.is_success() {
            debug!("No search results for {:?} (status {})", keyword, status);
            return Ok(Vec::new());
        }

        match response.json::<Envelope>().await {
            Ok(envelope) => Ok(envelope.into_verses()),
            Err(e) => {
                warn!("Unreadable search response for {:?}: {}", keyword, e);
                Ok(Vec::new())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn john_3_16() -> serde_json::Value {
        json!({
            "reference": "John 3:16-17",
            "verses": [
                {"book_id": "JHN", "book_name": "John", "chapter": 3, "verse": 16, "text": "For God so loved the world"},
                {"book_id": "JHN", "book_name": "John", "chapter": 3, "verse": 17, "text": "For God sent not his Son"}
            ],
            "translation_id": "kjv"
        })
    }

    #[tokio::test]
    async fn reference_lookup_tags_every_verse() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/John%203%3A16-17"))
            .and(query_param("translation", "kjv"))
            .respond_with(ResponseTemplate::new(200).set_body_json(john_3_16()))
            .mount(&server)
            .await;

        let client = BibleClient::new(&server.uri(), "kjv");
        let verses = client.fetch_reference("John 3:16-17").await.unwrap();

        assert_eq!(verses.len(), 2);
        assert!(verses.iter().all(|v| v.reference == "John 3:16-17"));
        assert_eq!(verses[1].verse, 17);
    }

    #[tokio::test]
    async fn reference_lookup_fails_on_empty_or_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/Hezekiah%201%3A1"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({"error": "not found"})))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/Empty%201%3A1"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"reference": "Empty 1:1", "verses": []})),
            )
            .mount(&server)
            .await;

        let client = BibleClient::new(&server.uri(), "kjv");
        assert!(matches!(
            client.fetch_reference("Hezekiah 1:1").await,
            Err(VerseError::NotFound(_))
        ));
        assert!(matches!(
            client.fetch_reference("Empty 1:1").await,
            Err(VerseError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn search_uses_the_lookup_endpoint() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/love"))
            .and(query_param("translation", "kjv"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "reference": "1 John 4:8",
                "verses": [{"book_id": "1JN", "book_name": "1 John", "chapter": 4, "verse": 8,
                            "text": "He that loveth not knoweth not God; for God is love."}]
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let client = BibleClient::new(&server.uri(), "kjv");
        let verses = client.search("love").await.unwrap();
        assert_eq!(verses.len(), 1);
        assert_eq!(verses[0].reference, "1 John 4:8");
    }

    #[tokio::test]
    async fn search_without_matches_is_empty() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/zzzz"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"reference": "", "verses": []})))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/garbled"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/outage"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let client = BibleClient::new(&server.uri(), "kjv");
        for keyword in ["zzzz", "qqqq", "garbled", "outage"] {
            assert!(client.search(keyword).await.unwrap().is_empty(), "{}", keyword);
        }
    }

    #[tokio::test]
    async fn search_fails_only_when_the_provider_is_unreachable() {
        let client = BibleClient::new("http://127.0.0.1:9", "kjv");
        assert!(matches!(client.search("love").await, Err(VerseError::Http(_))));
    }
}
