use actix_web::{web, HttpResponse};
use log::{error, info};

use super::translate_models::{TranslateRequest, TranslateResponse};
use crate::clients::Translator;
use crate::error::{required, ApiError};

const MISSING_FIELDS: &str = "Text and target language are required";

pub async fn translate(
    translator: web::Data<Translator>,
    req: web::Json<TranslateRequest>,
) -> Result<HttpResponse, ApiError> {
    let text = required(&req.text, MISSING_FIELDS)?;
    // Present but empty still counts as a language; it maps to the default code.
    let target_language = req
        .target_language
        .as_deref()
        .ok_or_else(|| ApiError::Validation(MISSING_FIELDS.into()))?;
    info!("Received translation request into {:?}", target_language);

    match translator.translate(text, target_language).await {
        Ok(translated_text) => Ok(HttpResponse::Ok().json(TranslateResponse { translated_text })),
        Err(e) => {
            error!("Translation failed: {}", e);
            Err(ApiError::Upstream("Failed to translate text".into()))
        }
    }
}
