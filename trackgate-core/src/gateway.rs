//! The device-plane gateway: TCP accept loop plus the singleton workers.

use crate::connection::serve_connection;
use crate::persist::run_persister;
use crate::registry::TrackerRegistry;
use crate::router::run_router;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use trackgate_error::GateResult;
use trackgate_sdk::{LocationFix, SessionContext, TrackerCommand, TrackerStore};
use tracing::{error, info};

/// Capacity of the command fan-in shared by all control-plane callers.
pub const COMMAND_CHANNEL_DEPTH: usize = 100;
/// Capacity of the event fan-out drained by the persistence worker.
pub const EVENT_CHANNEL_DEPTH: usize = 100;

/// Owns the registry and the two global channels; `run` consumes the
/// receiver halves into their worker tasks and accepts device
/// connections until the process shuts down.
pub struct TrackerGateway {
    registry: Arc<TrackerRegistry>,
    store: Arc<dyn TrackerStore>,
    commands_tx: mpsc::Sender<TrackerCommand>,
    commands_rx: mpsc::Receiver<TrackerCommand>,
    events_tx: mpsc::Sender<LocationFix>,
    events_rx: mpsc::Receiver<LocationFix>,
}

impl TrackerGateway {
    pub fn new(store: Arc<dyn TrackerStore>) -> Self {
        let (commands_tx, commands_rx) = mpsc::channel(COMMAND_CHANNEL_DEPTH);
        let (events_tx, events_rx) = mpsc::channel(EVENT_CHANNEL_DEPTH);
        Self {
            registry: Arc::new(TrackerRegistry::new()),
            store,
            commands_tx,
            commands_rx,
            events_tx,
            events_rx,
        }
    }

    /// Registry shared with the control plane for connection snapshots.
    pub fn registry(&self) -> Arc<TrackerRegistry> {
        self.registry.clone()
    }

    /// Sender the control plane uses to submit tracker commands.
    pub fn commands(&self) -> mpsc::Sender<TrackerCommand> {
        self.commands_tx.clone()
    }

    /// Bind the device plane and serve connections forever.
    pub async fn run(self, bind_addr: &str) -> GateResult<()> {
        let listener = TcpListener::bind(bind_addr).await?;
        info!("device plane listening on {bind_addr}");

        tokio::spawn(run_router(self.commands_rx, self.registry.clone()));
        tokio::spawn(run_persister(self.events_rx, self.store.clone()));

        let ctx = SessionContext {
            store: self.store,
            events: self.events_tx,
        };

        loop {
            match listener.accept().await {
                Ok((stream, peer)) => {
                    info!(%peer, "device connection accepted");
                    let registry = self.registry.clone();
                    let ctx = ctx.clone();
                    tokio::spawn(async move {
                        serve_connection(stream, registry, ctx).await;
                    });
                }
                Err(e) => {
                    error!(error = %e, "failed to accept connection");
                }
            }
        }
    }
}
