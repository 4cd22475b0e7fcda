use actix_web::{web, HttpResponse};
use chrono::Utc;
use log::info;

use super::admin_models::PurgeSessionsResponse;
use crate::error::{internal, ApiError};
use crate::store::Store;

// Drop every session row whose expiry has passed
pub async fn purge_expired_sessions(
    store: web::Data<dyn Store>,
) -> Result<HttpResponse, ApiError> {
    let purged = store
        .purge_expired_sessions(Utc::now())
        .await
        .map_err(|e| internal("Failed to purge sessions", e))?;

    info!("Purged {} expired session(s)", purged);
    Ok(HttpResponse::Ok().json(PurgeSessionsResponse {
        success: true,
        message: "Expired sessions have been removed".into(),
        purged,
    }))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::{test, web, App};
    use chrono::Duration;
    use serde_json::Value;

    use super::*;
    use crate::models::session::Session;
    use crate::routes::routes::admin_configure;
    use crate::store::MemoryStore;

    #[actix_web::test]
    async fn purge_reports_count() {
        let store = Arc::new(MemoryStore::new());
        let mut stale = Session::issue(1);
        stale.expires_at = Utc::now() - Duration::days(1);
        store.insert_session(&stale).await.unwrap();
        store.insert_session(&Session::issue(2)).await.unwrap();

        let app = test::init_service(
            App::new()
                .app_data(web::Data::from(store.clone() as Arc<dyn Store>))
                .configure(admin_configure),
        )
        .await;

        let req = test::TestRequest::post().uri("/admin/sessions/purge").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["purged"], 1);
    }
}
