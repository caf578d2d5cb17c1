//! Shared abstractions of the tracker communication plane.
//!
//! Protocol crates and the gateway core meet here: event and command
//! types, the per-session handle the registry indexes, the two
//! command/response correlation shapes, and the store contract.

pub mod command;
pub mod correlate;
pub mod error;
pub mod event;
pub mod session;
pub mod store;

pub use command::{CommandReply, TrackerCommand};
pub use correlate::{CommandMatcher, ReplyQueue};
pub use error::SessionError;
pub use event::LocationFix;
pub use session::{
    SessionChannels, SessionContext, SessionEnd, SessionHandle, COMMAND_QUEUE_DEPTH,
};
pub use store::TrackerStore;
