use super::{auth_user, format_timestamp, parse_time_query, require_admin, require_tracker_access};
use crate::AppState;
use actix_web::{web, HttpRequest};
use chrono::Utc;
use trackgate_error::{web::WebError, WebResult};
use trackgate_models::domain::prelude::{
    CommandPayload, HistoryQuery, LocationView, NewTracker, RegistrationOutcome, SetEnabled,
    TrackerInfo,
};
use trackgate_models::entities::prelude::{LocationDataModel, TrackerModel};
use trackgate_models::web::{acked, ApiReply};
use trackgate_repository::{LocationRepository, TrackerRepository};
use trackgate_sdk::{CommandReply, TrackerCommand};
use tracing::info;

pub(crate) fn configure_routes(cfg: &mut actix_web::web::ServiceConfig) {
    cfg.route("", web::get().to(list))
        .route("", web::post().to(register))
        .route("/{id}", web::get().to(get_by_id))
        .route("/{id}", web::delete().to(deregister))
        .route("/{id}/enabled", web::put().to(set_enabled))
        .route("/{id}/location", web::get().to(latest_location))
        .route("/{id}/locations", web::get().to(location_history))
        .route("/{id}/command", web::post().to(send_command));
}

fn location_view(model: &LocationDataModel) -> LocationView {
    LocationView {
        timestamp: format_timestamp(model.timestamp),
        lat: model.lat,
        lon: model.lon,
        speed: model.speed,
        heading: model.heading,
    }
}

async fn tracker_info(state: &AppState, tracker: TrackerModel) -> WebResult<TrackerInfo> {
    let location = LocationRepository::latest(&tracker.id)
        .await?
        .map(|m| location_view(&m));
    Ok(TrackerInfo {
        connected: state.registry.is_connected(&tracker.id),
        last_connected: format_timestamp(tracker.last_connected),
        id: tracker.id,
        name: tracker.name,
        owner: tracker.owner,
        phone_number: tracker.phone_number,
        model: tracker.model,
        enabled: tracker.enabled,
        location,
    })
}

/// Admins see the whole fleet; everyone else sees their own trackers.
async fn list(
    req: HttpRequest,
    state: web::Data<AppState>,
) -> WebResult<ApiReply<Vec<TrackerInfo>>> {
    let user = auth_user(&req)?;
    let trackers = if user.admin {
        TrackerRepository::find_all().await?
    } else {
        TrackerRepository::find_by_owner(user.id).await?
    };

    let mut out = Vec::with_capacity(trackers.len());
    for tracker in trackers {
        out.push(tracker_info(&state, tracker).await?);
    }
    Ok(ApiReply::of(out))
}

async fn get_by_id(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> WebResult<ApiReply<TrackerInfo>> {
    let user = auth_user(&req)?;
    let tracker = require_tracker_access(&user, &path).await?;
    Ok(ApiReply::of(tracker_info(&state, tracker).await?))
}

async fn register(
    req: HttpRequest,
    payload: web::Json<NewTracker>,
) -> WebResult<ApiReply<&'static str>> {
    let user = auth_user(&req)?;
    let new_tracker = payload.into_inner();

    // Registering on someone else's behalf is an admin privilege.
    let owner = match new_tracker.owner {
        Some(owner) if owner != user.id => {
            require_admin(&user)?;
            owner
        }
        _ => user.id,
    };

    info!(id = %new_tracker.id, name = %new_tracker.name, owner, "registering tracker");
    match TrackerRepository::register(new_tracker, owner).await? {
        RegistrationOutcome::Success => Ok(acked()),
        RegistrationOutcome::IdUsedByOther | RegistrationOutcome::NameUsedByOther => Err(
            WebError::Forbidden("identifier in use by another account".into()),
        ),
        RegistrationOutcome::IdenticalExists
        | RegistrationOutcome::IdUsedByOwner
        | RegistrationOutcome::NameUsedByOwner => Err(WebError::Conflict(
            "tracker with identical id or name already exists".into(),
        )),
        RegistrationOutcome::Unknown => {
            Err(WebError::InternalError("tracker registration failed".into()))
        }
    }
}

async fn deregister(req: HttpRequest, path: web::Path<String>) -> WebResult<ApiReply<&'static str>> {
    let user = auth_user(&req)?;
    require_tracker_access(&user, &path).await?;
    if TrackerRepository::delete(&path).await? {
        Ok(acked())
    } else {
        Err(WebError::NotFound(format!("tracker {path}")))
    }
}

async fn set_enabled(
    req: HttpRequest,
    path: web::Path<String>,
    payload: web::Json<SetEnabled>,
) -> WebResult<ApiReply<&'static str>> {
    let user = auth_user(&req)?;
    require_tracker_access(&user, &path).await?;
    TrackerRepository::set_enabled(&path, payload.enabled).await?;
    Ok(acked())
}

async fn latest_location(
    req: HttpRequest,
    path: web::Path<String>,
) -> WebResult<ApiReply<LocationView>> {
    let user = auth_user(&req)?;
    require_tracker_access(&user, &path).await?;
    let latest = LocationRepository::latest(&path)
        .await?
        .ok_or_else(|| WebError::NotFound("location entry".into()))?;
    Ok(ApiReply::of(location_view(&latest)))
}

/// History selection: an explicit `start`/`end` range wins over `limit`;
/// with neither, the full history comes back. All results are oldest
/// first.
async fn location_history(
    req: HttpRequest,
    path: web::Path<String>,
    query: web::Query<HistoryQuery>,
) -> WebResult<ApiReply<Vec<LocationView>>> {
    let user = auth_user(&req)?;
    require_tracker_access(&user, &path).await?;

    let rows = if query.start.is_some() || query.end.is_some() {
        let end = match &query.end {
            Some(raw) => parse_time_query(raw)?,
            None => Utc::now().timestamp(),
        };
        let start = match &query.start {
            Some(raw) => parse_time_query(raw)?,
            None => end - 24 * 3600,
        };
        let rows = LocationRepository::history_range(&path, start, end).await?;
        if rows.is_empty() {
            return Err(WebError::NotFound("location entry".into()));
        }
        rows
    } else if let Some(limit) = query.limit {
        if limit == 0 {
            return Err(WebError::BadRequest("invalid limit parameter".into()));
        }
        LocationRepository::history_limit(&path, limit).await?
    } else {
        LocationRepository::history(&path).await?
    };

    Ok(ApiReply::of(rows.iter().map(location_view).collect()))
}

/// Forward a text command to the device and answer with whatever it
/// replied. Routing sentinels map to 503, a silent device to 504.
async fn send_command(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<String>,
    payload: web::Json<CommandPayload>,
) -> WebResult<ApiReply<String>> {
    let user = auth_user(&req)?;
    require_tracker_access(&user, &path).await?;

    if !state.registry.is_connected(&path) {
        return Err(WebError::TrackerNotConnected);
    }

    let (cmd, reply) = TrackerCommand::new(path.as_str(), payload.command.clone());
    state
        .commands
        .try_send(cmd)
        .map_err(|_| WebError::TrackerBusy)?;

    match tokio::time::timeout(state.command_timeout, reply).await {
        Ok(Ok(CommandReply::Answer(text))) => Ok(ApiReply::of(text)),
        Ok(Ok(CommandReply::NotConnected)) => Err(WebError::TrackerNotConnected),
        Ok(Ok(CommandReply::Busy)) => Err(WebError::TrackerBusy),
        // The session went away without resolving the slot.
        Ok(Err(_)) => Err(WebError::TrackerNotConnected),
        Err(_) => Err(WebError::CommandTimeout),
    }
}
