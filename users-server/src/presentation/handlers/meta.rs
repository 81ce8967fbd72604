use actix_web::http::Method;
use actix_web::{HttpRequest, HttpResponse};
use serde_json::json;

/// Service metadata and the endpoint list, served at the root.
pub async fn index() -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "message": "user records REST API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": [
            "GET /",
            "GET /api/users",
            "GET /api/users/:id",
            "POST /api/users",
            "PUT /api/users/:id",
            "DELETE /api/users/:id",
        ],
    }))
}

/// Catch-all for anything the router did not match: preflight requests get
/// an empty 204, everything else a 404 echoing the attempted path. Also
/// registered as the default service of every resource so an unknown verb
/// on a known path lands here instead of actix's 405.
pub async fn fallback(req: HttpRequest) -> HttpResponse {
    if req.method() == Method::OPTIONS {
        return HttpResponse::NoContent().finish();
    }
    HttpResponse::NotFound().json(json!({
        "success": false,
        "message": "route not found",
        "route": req.path(),
    }))
}
