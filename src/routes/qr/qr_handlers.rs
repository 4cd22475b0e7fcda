use actix_web::http::header::LOCATION;
use actix_web::{web, HttpResponse};
use log::info;

use super::qr_models::QrQuery;
use crate::config::AppConfig;
use crate::error::{required, ApiError};

pub const QR_IMAGE_SIZE: &str = "300x300";

/// Deep link a phone opens to drive the session's presentation screen.
pub fn remote_control_url(app_base_url: &str, session_id: &str) -> String {
    format!(
        "{}/remote?session={}",
        app_base_url.trim_end_matches('/'),
        urlencoding::encode(session_id)
    )
}

/// Address of the rendered QR image encoding `data`.
pub fn qr_image_url(qr_api_url: &str, data: &str) -> String {
    let separator = if qr_api_url.contains('?') { '&' } else { '?' };
    format!(
        "{}{}size={}&data={}",
        qr_api_url,
        separator,
        QR_IMAGE_SIZE,
        urlencoding::encode(data)
    )
}

pub async fn qr_redirect(
    config: web::Data<AppConfig>,
    query: web::Query<QrQuery>,
) -> Result<HttpResponse, ApiError> {
    let session_id = required(&query.session_id, "Session ID is required")?.trim();
    info!("Generating QR redirect for live session {}", session_id);

    let deep_link = remote_control_url(&config.app_base_url, session_id);
    Ok(HttpResponse::Found()
        .insert_header((LOCATION, qr_image_url(&config.qr_api_url, &deep_link)))
        .finish())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deep_link_is_embedded_encoded() {
        let link = remote_control_url("https://pulpit.example.org/", "abc 1");
        assert_eq!(link, "https://pulpit.example.org/remote?session=abc%201");

        let image = qr_image_url("https://qr.example.com/create", &link);
        assert_eq!(
            image,
            "https://qr.example.com/create?size=300x300&data=https%3A%2F%2Fpulpit.example.org%2Fremote%3Fsession%3Dabc%25201"
        );
        assert!(qr_image_url("https://qr.example.com/?fmt=png", "x").contains("?fmt=png&size="));
    }
}
