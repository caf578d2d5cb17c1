use thiserror::Error;
use trackgate_error::storage::StorageError;

/// Terminal session failures. Recoverable frame-level problems (bad
/// check code, resync garbage) are logged and dropped inside the session
/// loop and never surface here.
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("transport error: {0}")]
    Transport(#[from] std::io::Error),

    #[error("handshake failed: {0}")]
    Handshake(String),

    #[error("authentication failed: {0}")]
    Auth(String),

    #[error("store operation failed: {0}")]
    Store(#[from] StorageError),

    #[error("no heartbeat inside the supervision window")]
    HeartbeatTimeout,

    #[error("unexpected message type 0x{0:04x}")]
    UnexpectedMessage(u16),
}
