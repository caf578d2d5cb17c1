use super::auth_user;
use actix_web::HttpRequest;
use serde_json::json;
use trackgate_error::WebResult;
use trackgate_models::web::ApiReply;

/// Resolve the caller's name; doubles as an API-key validity probe.
pub(crate) async fn whoami(req: HttpRequest) -> WebResult<ApiReply<serde_json::Value>> {
    let user = auth_user(&req)?;
    Ok(ApiReply::of(json!({ "name": user.name })))
}
