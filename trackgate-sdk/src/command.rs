use tokio::sync::oneshot;

/// Reply delivered to the control-plane caller for one command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandReply {
    /// Text the device answered with.
    Answer(String),
    /// No live session for the tracker.
    NotConnected,
    /// The session's outbound queue was full.
    Busy,
}

/// A platform-originated command travelling from the REST layer to a
/// tracker session. The reply slot is resolved exactly once: with the
/// device's answer, or with a routing sentinel.
#[derive(Debug)]
pub struct TrackerCommand {
    pub tracker_id: String,
    pub payload: String,
    pub reply: oneshot::Sender<CommandReply>,
}

impl TrackerCommand {
    pub fn new(
        tracker_id: impl Into<String>,
        payload: impl Into<String>,
    ) -> (Self, oneshot::Receiver<CommandReply>) {
        let (tx, rx) = oneshot::channel();
        (
            Self {
                tracker_id: tracker_id.into(),
                payload: payload.into(),
                reply: tx,
            },
            rx,
        )
    }
}
