//! REST control plane for the gateway.

mod api;
mod middleware;

use actix_web::{
    dev::Server,
    middleware::{Logger, NormalizePath},
    web::{self, Data},
    App, HttpServer,
};
use middleware::auth::Authentication;
use middleware::cors;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use trackgate_core::TrackerRegistry;
use trackgate_error::{GateError, GateResult};
use trackgate_models::domain::prelude::Substitutions;
use trackgate_models::Settings;
use trackgate_sdk::TrackerCommand;
use tracing::info;

/// State shared with every request handler.
#[derive(Clone)]
pub struct AppState {
    /// Registry snapshot access for "connected" flags and command
    /// pre-checks.
    pub registry: Arc<TrackerRegistry>,
    /// Fan-in to the gateway's command router.
    pub commands: mpsc::Sender<TrackerCommand>,
    /// Provisioning placeholder substitution for device models.
    pub subst: Substitutions,
    /// End-to-end deadline for the command endpoint.
    pub command_timeout: Duration,
}

/// Build the HTTP server. The caller spawns the returned future and may
/// keep its handle for graceful shutdown.
pub fn create_server(
    settings: &Settings,
    registry: Arc<TrackerRegistry>,
    commands: mpsc::Sender<TrackerCommand>,
) -> GateResult<Server> {
    let addr = format!("{}:{}", settings.web.host, settings.web.port);
    let state = AppState {
        registry,
        commands,
        subst: Substitutions::from_settings(settings),
        command_timeout: Duration::from_secs(settings.web.command_timeout_secs),
    };

    let server = HttpServer::new(move || {
        App::new()
            .app_data(Data::new(state.clone()))
            .wrap(cors::middleware())
            .wrap(Logger::default())
            .wrap(NormalizePath::trim())
            .configure(api::configure_public_routes)
            .service(
                web::scope("/api/v1")
                    .wrap(Authentication)
                    .configure(api::configure_routes),
            )
    })
    .bind(&addr)
    .map_err(|e| GateError::from(format!("failed to bind HTTP server to {addr}: {e}")))?;

    info!("control plane listening on {addr}");
    Ok(server.run())
}
