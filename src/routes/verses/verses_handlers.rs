use actix_web::{web, HttpResponse};
use log::{error, info};

use super::verses_models::{PresentationResponse, ReferenceQuery, SearchQuery, VersesResponse};
use crate::clients::{BibleClient, VerseError};
use crate::error::{required, ApiError};
use crate::models::verse::{BibleVerse, Presentation};

async fn lookup(bible: &BibleClient, reference: &str) -> Result<Vec<BibleVerse>, ApiError> {
    match bible.fetch_reference(reference).await {
        Ok(verses) => Ok(verses),
        Err(VerseError::NotFound(_)) => {
            info!("No verses found for {}", reference);
            Err(ApiError::NotFound("Verse not found".into()))
        }
        Err(e) => {
            error!("Failed to fetch verses for {}: {}", reference, e);
            Err(ApiError::Upstream("Failed to fetch verses".into()))
        }
    }
}

pub async fn get_verses(
    bible: web::Data<BibleClient>,
    query: web::Query<ReferenceQuery>,
) -> Result<HttpResponse, ApiError> {
    let reference = required(&query.reference, "Reference is required")?;
    info!("Received verse lookup for {}", reference);
    let verses = lookup(&bible, reference).await?;
    Ok(HttpResponse::Ok().json(VersesResponse { verses }))
}

pub async fn search_verses(
    bible: web::Data<BibleClient>,
    query: web::Query<SearchQuery>,
) -> Result<HttpResponse, ApiError> {
    let keyword = required(&query.q, "Search keyword is required")?;
    info!("Received verse search for {:?}", keyword);

    match bible.search(keyword).await {
        Ok(verses) => Ok(HttpResponse::Ok().json(VersesResponse { verses })),
        Err(e) => {
            error!("Verse search for {:?} failed: {}", keyword, e);
            Err(ApiError::Upstream("Failed to search verses".into()))
        }
    }
}

pub async fn get_presentation(
    bible: web::Data<BibleClient>,
    query: web::Query<ReferenceQuery>,
) -> Result<HttpResponse, ApiError> {
    let reference = required(&query.reference, "Reference is required")?;
    info!("Building presentation for {}", reference);
    let verses = lookup(&bible, reference).await?;
    Ok(HttpResponse::Ok().json(PresentationResponse {
        presentation: Presentation::from_verses(&verses),
    }))
}
