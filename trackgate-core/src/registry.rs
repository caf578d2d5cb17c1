//! Process-wide index of live tracker sessions.

use std::collections::HashMap;
use std::sync::Mutex;
use trackgate_sdk::{CommandReply, SessionHandle, TrackerCommand};
use tracing::{debug, info};

/// Maps device id to the handle of its live session.
///
/// One plain mutex guards the map; it is only ever held for map
/// operations, never across I/O. Command delivery uses the handle's
/// non-blocking queue, eviction uses its buffered signal channel.
#[derive(Default)]
pub struct TrackerRegistry {
    sessions: Mutex<HashMap<String, SessionHandle>>,
}

impl TrackerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a session, evicting any previous session registered under
    /// the same device id.
    pub fn attach(&self, handle: SessionHandle) {
        let device_id = handle.device_id().to_string();
        let previous = self
            .sessions
            .lock()
            .unwrap()
            .insert(device_id.clone(), handle);
        if let Some(previous) = previous {
            info!(device = %device_id, "duplicate login, evicting previous session");
            previous.signal_evict();
        }
    }

    /// Remove a session, but only while the mapping still points at this
    /// exact handle. After an eviction the slot belongs to the successor
    /// and must not be touched by the leaving session's teardown.
    pub fn detach(&self, handle: &SessionHandle) {
        let mut sessions = self.sessions.lock().unwrap();
        if sessions
            .get(handle.device_id())
            .is_some_and(|current| current.same_session(handle))
        {
            sessions.remove(handle.device_id());
            debug!(device = %handle.device_id(), "session detached");
        }
    }

    /// Route a command to the target session's queue. The caller's reply
    /// slot is resolved immediately with a sentinel when the tracker is
    /// not connected or its queue is saturated.
    pub fn dispatch(&self, cmd: TrackerCommand) {
        let target = self.sessions.lock().unwrap().get(&cmd.tracker_id).cloned();
        match target {
            None => {
                let _ = cmd.reply.send(CommandReply::NotConnected);
            }
            Some(handle) => {
                if let Err(cmd) = handle.try_send_command(cmd) {
                    let _ = cmd.reply.send(CommandReply::Busy);
                }
            }
        }
    }

    /// Snapshot of the currently connected device ids.
    pub fn active_ids(&self) -> Vec<String> {
        self.sessions.lock().unwrap().keys().cloned().collect()
    }

    pub fn is_connected(&self, device_id: &str) -> bool {
        self.sessions.lock().unwrap().contains_key(device_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trackgate_sdk::COMMAND_QUEUE_DEPTH;

    #[tokio::test]
    async fn attach_replaces_and_signals_previous_session() {
        let registry = TrackerRegistry::new();
        let (h1, mut ch1) = SessionHandle::new("dev");
        let (h2, _ch2) = SessionHandle::new("dev");

        registry.attach(h1);
        registry.attach(h2.clone());

        // The first handle was evicted exactly once...
        assert_eq!(ch1.evict.recv().await, Some(()));
        assert!(ch1.evict.try_recv().is_err());

        // ...and the registry now resolves to the second session.
        let (cmd, _rx) = TrackerCommand::new("dev", "X");
        registry.dispatch(cmd);
        assert!(ch1.commands.try_recv().is_err());
    }

    #[tokio::test]
    async fn detach_is_identity_checked() {
        let registry = TrackerRegistry::new();
        let (h1, _ch1) = SessionHandle::new("dev");
        let (h2, _ch2) = SessionHandle::new("dev");

        registry.attach(h1.clone());
        registry.attach(h2);

        // The evicted session's teardown must not undo the takeover.
        registry.detach(&h1);
        assert!(registry.is_connected("dev"));

        // Detaching an already-removed handle is a no-op.
        registry.detach(&h1);
        assert!(registry.is_connected("dev"));
    }

    #[tokio::test]
    async fn dispatch_to_unknown_tracker_resolves_not_connected() {
        let registry = TrackerRegistry::new();
        let (cmd, rx) = TrackerCommand::new("missing", "STATUS#");
        registry.dispatch(cmd);
        assert_eq!(rx.await.unwrap(), CommandReply::NotConnected);
    }

    #[tokio::test]
    async fn dispatch_to_saturated_queue_resolves_busy() {
        let registry = TrackerRegistry::new();
        let (handle, _channels) = SessionHandle::new("dev");
        registry.attach(handle);

        for _ in 0..COMMAND_QUEUE_DEPTH {
            let (cmd, _rx) = TrackerCommand::new("dev", "fill");
            registry.dispatch(cmd);
        }
        let (cmd, rx) = TrackerCommand::new("dev", "overflow");
        registry.dispatch(cmd);
        assert_eq!(rx.await.unwrap(), CommandReply::Busy);
    }

    #[tokio::test]
    async fn active_ids_snapshots_current_sessions() {
        let registry = TrackerRegistry::new();
        let (h1, _c1) = SessionHandle::new("a");
        let (h2, _c2) = SessionHandle::new("b");
        registry.attach(h1.clone());
        registry.attach(h2);

        let mut ids = registry.active_ids();
        ids.sort();
        assert_eq!(ids, vec!["a".to_string(), "b".to_string()]);

        registry.detach(&h1);
        assert_eq!(registry.active_ids(), vec!["b".to_string()]);
    }
}
