//! Per-session command/response correlation.
//!
//! GT06 echoes a 32-bit command id, so responses match by key; JT808
//! carries no id at all, so responses resolve pending slots in FIFO
//! order. Both structures are owned by their session task and never
//! shared.

use crate::command::CommandReply;
use std::collections::{HashMap, VecDeque};
use tokio::sync::oneshot;

/// Keyed correlation for protocols that echo a command id.
#[derive(Debug, Default)]
pub struct CommandMatcher {
    pending: HashMap<u32, oneshot::Sender<CommandReply>>,
}

impl CommandMatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a reply slot under the command id used on the wire.
    pub fn insert(&mut self, cmd_id: u32, slot: oneshot::Sender<CommandReply>) {
        self.pending.insert(cmd_id, slot);
    }

    /// Deliver a device answer to the matching slot. Returns `false` when
    /// no slot is registered for the id (unsolicited response).
    pub fn resolve(&mut self, cmd_id: u32, answer: String) -> bool {
        match self.pending.remove(&cmd_id) {
            Some(slot) => {
                // The caller may have timed out and dropped its receiver;
                // either way the entry is gone.
                let _ = slot.send(CommandReply::Answer(answer));
                true
            }
            None => false,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }
}

/// Ordered correlation for protocols without a command id: the oldest
/// pending slot receives the next response.
#[derive(Debug, Default)]
pub struct ReplyQueue {
    pending: VecDeque<oneshot::Sender<CommandReply>>,
}

impl ReplyQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, slot: oneshot::Sender<CommandReply>) {
        self.pending.push_back(slot);
    }

    /// Deliver a device answer to the head slot. Returns `false` when the
    /// queue is empty (unsolicited response); the queue is left unchanged
    /// in that case.
    pub fn resolve_next(&mut self, answer: String) -> bool {
        match self.pending.pop_front() {
            Some(slot) => {
                let _ = slot.send(CommandReply::Answer(answer));
                true
            }
            None => false,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }
}
