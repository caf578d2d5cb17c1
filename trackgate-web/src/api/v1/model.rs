use super::{auth_user, require_admin};
use crate::AppState;
use actix_web::{web, HttpRequest};
use trackgate_error::{web::WebError, WebResult};
use trackgate_models::domain::prelude::NewDeviceModel;
use trackgate_models::entities::prelude::DeviceModelModel;
use trackgate_models::web::{acked, ApiReply};
use trackgate_repository::DeviceModelRepository;

pub(crate) fn configure_routes(cfg: &mut actix_web::web::ServiceConfig) {
    cfg.route("", web::get().to(list))
        .route("", web::post().to(create))
        .route("/{name}", web::get().to(get_by_name))
        .route("/{name}", web::delete().to(delete));
}

async fn list(
    req: HttpRequest,
    state: web::Data<AppState>,
) -> WebResult<ApiReply<Vec<DeviceModelModel>>> {
    auth_user(&req)?;
    Ok(ApiReply::of(
        DeviceModelRepository::find_all(&state.subst).await?,
    ))
}

async fn get_by_name(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> WebResult<ApiReply<DeviceModelModel>> {
    auth_user(&req)?;
    let model = DeviceModelRepository::find_by_name(&path, &state.subst)
        .await?
        .ok_or_else(|| WebError::NotFound(format!("model {path}")))?;
    Ok(ApiReply::of(model))
}

async fn create(
    req: HttpRequest,
    payload: web::Json<NewDeviceModel>,
) -> WebResult<ApiReply<&'static str>> {
    let user = auth_user(&req)?;
    require_admin(&user)?;
    DeviceModelRepository::create(payload.into_inner()).await?;
    Ok(acked())
}

async fn delete(req: HttpRequest, path: web::Path<String>) -> WebResult<ApiReply<&'static str>> {
    let user = auth_user(&req)?;
    require_admin(&user)?;
    if DeviceModelRepository::delete(&path).await? {
        Ok(acked())
    } else {
        Err(WebError::NotFound(format!("model {path}")))
    }
}
