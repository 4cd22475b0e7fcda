use actix_web::{error::InternalError, get, web, HttpResponse, Responder, ResponseError};
use serde::Serialize;

use crate::error::ApiError;

pub mod admin;
pub mod auth;
pub mod live_session;
pub mod qr;
pub mod routes;
pub mod translate;
pub mod verses;

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
}

#[get("/health")]
async fn health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse { status: "ok" })
}

pub fn init(cfg: &mut web::ServiceConfig) {
    cfg.service(health);
}

/// Malformed or missing JSON bodies become a 400 with the usual `{error}` body.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        let message = format!("Invalid request body: {}", err);
        InternalError::from_response(err, ApiError::Validation(message).error_response()).into()
    })
}
