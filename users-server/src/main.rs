mod application;
mod data;
mod domain;
mod infrastructure;
mod presentation;

use std::sync::Arc;

use actix_web::middleware::NormalizePath;
use actix_web::{App, HttpServer, web};
use tracing::info;

use application::user_service::UserService;
use data::user_repository::JsonFileUserRepository;
use infrastructure::config::AppConfig;
use infrastructure::logging::init_logging;
use presentation::handlers::{meta, users};
use presentation::middleware::{RequestTelemetry, ResponseHeaders};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    init_logging();

    let config = AppConfig::from_env().expect("invalid configuration");
    let repo = JsonFileUserRepository::new(&config.data_file).expect("data directory unavailable");
    let user_service = UserService::new(Arc::new(repo));

    info!(
        host = %config.host,
        port = config.port,
        data_file = %config.data_file.display(),
        "starting user records API"
    );

    HttpServer::new(move || {
        App::new()
            .wrap(ResponseHeaders)
            .wrap(RequestTelemetry)
            .wrap(NormalizePath::trim())
            .app_data(web::Data::new(user_service.clone()))
            .service(
                web::resource("/")
                    .route(web::get().to(meta::index))
                    .default_service(web::to(meta::fallback)),
            )
            .service(users::scope())
            .default_service(web::to(meta::fallback))
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
