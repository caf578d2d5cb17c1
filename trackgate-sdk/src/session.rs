use crate::command::TrackerCommand;
use crate::event::LocationFix;
use crate::store::TrackerStore;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;

/// Outbound command queue depth per session.
pub const COMMAND_QUEUE_DEPTH: usize = 10;

static NEXT_SESSION_TOKEN: AtomicU64 = AtomicU64::new(1);

/// Registry-facing view of one live tracker session.
///
/// The session task owns the socket and its correlation state; the handle
/// only carries the channels needed to reach it, plus a token that makes
/// handles from different connections of the same device distinguishable.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    device_id: String,
    token: u64,
    commands: mpsc::Sender<TrackerCommand>,
    evict: mpsc::Sender<()>,
}

/// Receiver halves handed to the session task.
pub struct SessionChannels {
    pub commands: mpsc::Receiver<TrackerCommand>,
    pub evict: mpsc::Receiver<()>,
}

impl SessionHandle {
    pub fn new(device_id: impl Into<String>) -> (Self, SessionChannels) {
        let (cmd_tx, cmd_rx) = mpsc::channel(COMMAND_QUEUE_DEPTH);
        let (evict_tx, evict_rx) = mpsc::channel(1);
        let handle = Self {
            device_id: device_id.into(),
            token: NEXT_SESSION_TOKEN.fetch_add(1, Ordering::Relaxed),
            commands: cmd_tx,
            evict: evict_tx,
        };
        (
            handle,
            SessionChannels {
                commands: cmd_rx,
                evict: evict_rx,
            },
        )
    }

    pub fn device_id(&self) -> &str {
        &self.device_id
    }

    /// Whether two handles refer to the same connection.
    pub fn same_session(&self, other: &SessionHandle) -> bool {
        self.token == other.token
    }

    /// Ask the session to terminate. The evict channel is buffered (size
    /// 1) and the signal is fire-and-forget: a full buffer means the
    /// session is already being evicted.
    pub fn signal_evict(&self) {
        let _ = self.evict.try_send(());
    }

    /// Non-blocking enqueue onto the session's command queue. The command
    /// is handed back when the queue is full or the session is gone.
    pub fn try_send_command(&self, cmd: TrackerCommand) -> Result<(), TrackerCommand> {
        self.commands.try_send(cmd).map_err(|e| e.into_inner())
    }
}

/// Collaborators a session needs besides its socket: the store for auth
/// and attach bookkeeping, and the sink feeding the persistence worker.
#[derive(Clone)]
pub struct SessionContext {
    pub store: Arc<dyn TrackerStore>,
    pub events: mpsc::Sender<LocationFix>,
}

/// Why a session loop ended normally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// Peer closed the connection.
    Disconnected,
    /// A newer connection for the same device id took over.
    Evicted,
    /// The device sent an explicit logout (JT808 only).
    Logout,
}
