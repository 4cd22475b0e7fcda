use actix_web::{web, HttpResponse};
use log::info;
use serde_json::{Map, Value};

use crate::error::{internal, ApiError};
use crate::store::{Store, StoreError};

fn not_found() -> ApiError {
    ApiError::NotFound("Live session not found".into())
}

// Initial fields are optional; an absent or non-JSON body starts empty
pub async fn create_live_session(
    store: web::Data<dyn Store>,
    body: Option<web::Json<Map<String, Value>>>,
) -> Result<HttpResponse, ApiError> {
    let fields = body.map(web::Json::into_inner).unwrap_or_default();
    let session = store
        .create_live_session(fields)
        .await
        .map_err(|e| internal("Failed to create live session", e))?;
    info!("Created live session {}", session.id);
    Ok(HttpResponse::Created().json(session))
}

pub async fn get_live_session(
    store: web::Data<dyn Store>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    match store.get_live_session(&id).await {
        Ok(Some(session)) => Ok(HttpResponse::Ok().json(session)),
        Ok(None) => Err(not_found()),
        Err(e) => Err(internal("Failed to fetch live session", e)),
    }
}

// Last write wins; there is no version check between concurrent writers
pub async fn update_live_session(
    store: web::Data<dyn Store>,
    path: web::Path<String>,
    patch: web::Json<Map<String, Value>>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    info!("Updating live session {}", id);
    match store.update_live_session(&id, patch.into_inner()).await {
        Ok(session) => Ok(HttpResponse::Ok().json(session)),
        Err(StoreError::NotFound) => Err(not_found()),
        Err(e) => Err(internal("Failed to update live session", e)),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::http::StatusCode;
    use actix_web::{test, web, App};
    use serde_json::json;

    use super::*;
    use crate::routes::{json_config, routes::live_session_configure};
    use crate::store::MemoryStore;

    macro_rules! live_app {
        () => {
            test::init_service(
                App::new()
                    .app_data(web::Data::from(Arc::new(MemoryStore::new()) as Arc<dyn Store>))
                    .app_data(json_config())
                    .configure(live_session_configure),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn create_read_and_patch() {
        let app = live_app!();

        let req = test::TestRequest::post()
            .uri("/api/live-sessions")
            .set_json(json!({"reference": "John 1:1", "slide": 0}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let created: Value = test::read_body_json(resp).await;
        let id = created["id"].as_str().unwrap().to_string();

        let req = test::TestRequest::patch()
            .uri(&format!("/api/live-sessions/{}", id))
            .set_json(json!({"slide": 1, "id": "hijack", "created_at": "1999-01-01T00:00:00Z"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let req = test::TestRequest::get()
            .uri(&format!("/api/live-sessions/{}", id))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let current: Value = test::read_body_json(resp).await;
        assert_eq!(current["id"], id.as_str());
        assert_eq!(current["slide"], 1);
        assert_eq!(current["reference"], "John 1:1");
        assert_eq!(current["created_at"], created["created_at"]);
    }

    #[actix_web::test]
    async fn create_without_body_starts_empty() {
        let app = live_app!();

        let req = test::TestRequest::post().uri("/api/live-sessions").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let created: Value = test::read_body_json(resp).await;
        assert_eq!(created.as_object().unwrap().len(), 3);
    }

    #[actix_web::test]
    async fn unknown_ids_are_404() {
        let app = live_app!();

        let req = test::TestRequest::get().uri("/api/live-sessions/missing").to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);

        let req = test::TestRequest::patch()
            .uri("/api/live-sessions/missing")
            .set_json(json!({"slide": 2}))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
    }
}
