use clap::Parser;
use std::env::current_dir;
use std::path::PathBuf;
use std::sync::Arc;
use trackgate_common::Logger;
use trackgate_core::TrackerGateway;
use trackgate_error::{GateError, GateResult};
use trackgate_models::constants::DEFAULT_CONFIG_FILE_NAME;
use trackgate_models::Settings;
use trackgate_repository::DbTrackerStore;
use tracing::{error, info};

/// TrackGate - multi-tenant ingestion gateway for GPS trackers
///
/// Accepts long-lived device connections speaking JT/T 808 or GT06 on
/// the device TCP plane and exposes a REST control plane for tracker
/// management, location history and upstream commands.
#[derive(Parser)]
#[command(name = "trackgate")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "TrackGate", long_about = None)]
struct Cli {
    /// Custom config file path; defaults to `trackgate.toml` in the
    /// working directory.
    #[arg(short, long, env = "TG_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main(flavor = "multi_thread")]
async fn main() -> GateResult<()> {
    let cli = Cli::parse();

    let config_path = match cli.config {
        Some(p) => p,
        None => {
            let dir = current_dir()
                .map_err(|e| GateError::from(format!("failed to get current directory: {e}")))?;
            dir.join(DEFAULT_CONFIG_FILE_NAME)
        }
    };
    let settings = Settings::new(&config_path.to_string_lossy())?;

    let _logger = Logger::init()?;
    info!("starting TrackGate {}", env!("CARGO_PKG_VERSION"));

    let db = trackgate_storage::init_db(&settings.db.sqlite).await?;
    trackgate_repository::install(db.clone());

    let gateway = TrackerGateway::new(Arc::new(DbTrackerStore));
    let registry = gateway.registry();
    let commands = gateway.commands();

    let server = trackgate_web::create_server(&settings, registry, commands)?;
    let server_handle = server.handle();
    tokio::spawn(server);

    let bind_addr = settings.device.bind_addr();
    let device_plane = tokio::spawn(async move {
        if let Err(e) = gateway.run(&bind_addr).await {
            error!(error = %e, "device plane terminated");
        }
    });

    tokio::signal::ctrl_c()
        .await
        .map_err(|e| GateError::from(format!("failed to listen for shutdown signal: {e}")))?;
    info!("shutting down");

    device_plane.abort();
    server_handle.stop(true).await;
    trackgate_storage::close_db(db).await?;
    Ok(())
}
