use actix_web::{HttpResponse, Scope, web};
use serde_json::Value;

use crate::application::user_service::UserService;
use crate::data::user_repository::JsonFileUserRepository;
use crate::domain::error::ApiError;
use crate::presentation::dto::{CollectionResponse, RecordResponse};
use crate::presentation::handlers::meta;

type Service = UserService<JsonFileUserRepository>;

pub fn scope() -> Scope {
    web::scope("/api")
        .service(
            web::resource("/users")
                .route(web::get().to(list_users))
                .route(web::post().to(create_user))
                .default_service(web::to(meta::fallback)),
        )
        .service(
            web::resource("/users/{id:\\d+}")
                .route(web::get().to(get_user))
                .route(web::put().to(update_user))
                .route(web::delete().to(delete_user))
                .default_service(web::to(meta::fallback)),
        )
        .default_service(web::to(meta::fallback))
}

/// An empty body counts as `{}`, so a bare POST fails field validation
/// rather than JSON parsing.
fn parse_body(body: &web::Bytes) -> Result<Value, ApiError> {
    if body.is_empty() {
        return Ok(Value::Object(serde_json::Map::new()));
    }
    serde_json::from_slice(body).map_err(|e| ApiError::BadPayload(e.to_string()))
}

async fn list_users(service: web::Data<Service>) -> HttpResponse {
    let users = service.list().await;
    HttpResponse::Ok().json(CollectionResponse::new(users))
}

async fn get_user(
    service: web::Data<Service>,
    path: web::Path<u64>,
) -> Result<HttpResponse, ApiError> {
    let user = service.get(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(RecordResponse::new(user)))
}

async fn create_user(
    service: web::Data<Service>,
    body: web::Bytes,
) -> Result<HttpResponse, ApiError> {
    let payload = parse_body(&body)?;
    let user = service.create(payload).await?;
    Ok(HttpResponse::Created().json(RecordResponse::with_message("user created", user)))
}

async fn update_user(
    service: web::Data<Service>,
    path: web::Path<u64>,
    body: web::Bytes,
) -> Result<HttpResponse, ApiError> {
    let payload = parse_body(&body)?;
    let user = service.update(path.into_inner(), payload).await?;
    Ok(HttpResponse::Ok().json(RecordResponse::with_message("user updated", user)))
}

async fn delete_user(
    service: web::Data<Service>,
    path: web::Path<u64>,
) -> Result<HttpResponse, ApiError> {
    let user = service.delete(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(RecordResponse::with_message("user deleted", user)))
}
