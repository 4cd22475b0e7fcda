use actix_web::web;

use super::auth::auth_handlers;

pub fn auth_configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/auth")
            .route("/register", web::post().to(auth_handlers::register))
            .route("/login", web::post().to(auth_handlers::login))
            .route("/logout", web::post().to(auth_handlers::logout))
            .route("/me", web::get().to(auth_handlers::me))
    );
}

use super::verses::verses_handlers;

pub fn verses_configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/verses")
            .route("", web::get().to(verses_handlers::get_verses))
            .route("/search", web::get().to(verses_handlers::search_verses))
            .route("/presentation", web::get().to(verses_handlers::get_presentation))
    );
}

use super::translate::translate_handlers;

pub fn translate_configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/api/translate", web::post().to(translate_handlers::translate));
}

use super::qr::qr_handlers;

pub fn qr_configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/api/qr", web::get().to(qr_handlers::qr_redirect));
}

use super::live_session::live_session_handlers;

pub fn live_session_configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/live-sessions")
            .route("", web::post().to(live_session_handlers::create_live_session))
            .route("/{id}", web::get().to(live_session_handlers::get_live_session))
            .route("/{id}", web::patch().to(live_session_handlers::update_live_session))
    );
}

use super::admin::admin_handlers;

pub fn admin_configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/admin")
            .route("/sessions/purge", web::post().to(admin_handlers::purge_expired_sessions))
    );
}
