use std::sync::Arc;

use actix_web::{middleware::Logger, web, App, HttpServer};
use dotenv::dotenv;
use log::{info, warn};

use pulpit::clients::{BibleClient, Translator};
use pulpit::config::AppConfig;
use pulpit::routes;
use pulpit::store::{MemoryStore, MySqlStore, Store};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = AppConfig::from_env().expect("Invalid configuration");

    let store: Arc<dyn Store> = match &config.database_url {
        Some(database_url) => Arc::new(
            MySqlStore::connect(database_url, config.db_max_connections)
                .await
                .expect("Failed to create pool"),
        ),
        None => {
            warn!("DATABASE_URL is not set, keeping accounts and sessions in memory");
            Arc::new(MemoryStore::new())
        }
    };

    let store = web::Data::from(store);
    let bible = web::Data::new(BibleClient::new(&config.bible_api_url, &config.bible_translation));
    let translator = web::Data::new(Translator::new(&config.translate_api_url));
    let server_address = config.server_address.clone();
    let config = web::Data::new(config);

    info!("Server running at http://{}", server_address);

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(store.clone())
            .app_data(bible.clone())
            .app_data(translator.clone())
            .app_data(config.clone())
            .app_data(routes::json_config())
            .configure(routes::init)
            .configure(routes::routes::auth_configure)
            .configure(routes::routes::verses_configure)
            .configure(routes::routes::translate_configure)
            .configure(routes::routes::qr_configure)
            .configure(routes::routes::live_session_configure)
            .configure(routes::routes::admin_configure)
    })
    .bind(server_address)?
    .run()
    .await
}
