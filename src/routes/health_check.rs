use actix_web::HttpResponse;

/// `GET /health_check`
///
/// Does not touch the provider; 200 with an empty body as long as the server
/// is up.
pub async fn health_check() -> HttpResponse { HttpResponse::Ok().finish() }
