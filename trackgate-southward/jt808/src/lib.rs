//! JT/T 808 tracker protocol: frame codec and server-side session
//! handling.
//!
//! JT/T 808 is the PRC standard for vehicle terminal communications:
//! `7E`-framed with byte stuffing inside the envelope, XOR-checked, with
//! a 12-byte header carrying message id, body attributes, the BCD
//! terminal id and a serial number. Devices register once to obtain an
//! auth code and replay it on every reconnect.

pub mod protocol;
pub mod session;

pub use protocol::codec::Jt808FrameCodec;
pub use protocol::error::ProtocolError;
pub use protocol::frame::Jt808Frame;
pub use session::{authenticate, Jt808Session};
