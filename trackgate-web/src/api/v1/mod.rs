mod auth;
mod model;
mod tracker;

use actix_web::{web, HttpMessage, HttpRequest};
use chrono::{DateTime, Utc};
use trackgate_error::{web::WebError, WebResult};
use trackgate_models::domain::prelude::AuthUser;
use trackgate_models::entities::prelude::TrackerModel;
use trackgate_repository::TrackerRepository;

pub(crate) fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/whoami", web::get().to(auth::whoami));
    cfg.service(web::scope("/trackers").configure(tracker::configure_routes));
    cfg.service(web::scope("/models").configure(model::configure_routes));
}

/// The caller resolved by the authentication middleware.
pub(crate) fn auth_user(req: &HttpRequest) -> WebResult<AuthUser> {
    req.extensions()
        .get::<AuthUser>()
        .cloned()
        .ok_or(WebError::Unauthorized)
}

pub(crate) fn require_admin(user: &AuthUser) -> WebResult<()> {
    if user.admin {
        Ok(())
    } else {
        Err(WebError::Forbidden(
            "this action requires admin permissions".into(),
        ))
    }
}

/// Trackers are only visible to their owner, unless the caller is an
/// admin. Unknown ids surface as 404 either way.
pub(crate) async fn require_tracker_access(
    user: &AuthUser,
    tracker_id: &str,
) -> WebResult<TrackerModel> {
    let tracker = TrackerRepository::find_by_id(tracker_id)
        .await?
        .ok_or_else(|| WebError::NotFound(format!("tracker {tracker_id}")))?;
    if user.admin || tracker.owner == user.id {
        Ok(tracker)
    } else {
        Err(WebError::Forbidden(
            "you don't have a tracker registered with the specified id".into(),
        ))
    }
}

/// Parse an RFC 3339 timestamp or plain epoch seconds.
pub(crate) fn parse_time_query(value: &str) -> WebResult<i64> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.timestamp());
    }
    value
        .parse::<i64>()
        .map_err(|_| WebError::BadRequest(format!("invalid time parameter `{value}`")))
}

pub(crate) fn format_timestamp(epoch: i64) -> String {
    DateTime::<Utc>::from_timestamp(epoch, 0)
        .map(|dt| dt.to_rfc3339())
        .unwrap_or_default()
}
