use serde::{Deserialize, Serialize};

use crate::models::verse::{BibleVerse, Presentation};

#[derive(Deserialize)]
pub struct ReferenceQuery {
    pub reference: Option<String>,
}

#[derive(Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

#[derive(Serialize)]
pub struct VersesResponse {
    pub verses: Vec<BibleVerse>,
}

#[derive(Serialize)]
pub struct PresentationResponse {
    pub presentation: Presentation,
}
