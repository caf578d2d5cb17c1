use actix_cors::Cors;
use actix_web::http::header;

/// Permissive CORS: the API is key-gated, the browser origin carries no
/// trust.
pub fn middleware() -> Cors {
    Cors::default()
        .allow_any_origin()
        .allowed_methods(["GET", "POST", "PUT", "DELETE", "OPTIONS"])
        .allowed_headers([header::ORIGIN, header::CONTENT_TYPE])
        .allowed_header("X-API-Key")
        .expose_headers([header::CONTENT_LENGTH])
        .max_age(12 * 3600)
}
