//! Gateway core: the tracker registry, protocol detection and per-
//! connection dispatch, the TCP accept loop, and the two singleton
//! workers (command router, event persister).

pub mod connection;
pub mod detect;
pub mod gateway;
pub mod persist;
pub mod registry;
pub mod router;

pub use gateway::TrackerGateway;
pub use registry::TrackerRegistry;
