use actix_web::HttpResponse;

/// GET /health_check
///
/// Liveness only; the store and cache are not probed.
pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().body("OK")
}
