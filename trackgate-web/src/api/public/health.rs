use actix_web::Responder;
use trackgate_models::web::ApiReply;

pub(crate) async fn health() -> impl Responder {
    ApiReply::of("up")
}
