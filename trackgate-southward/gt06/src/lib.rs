//! GT06 tracker protocol: frame codec and server-side session handling.
//!
//! GT06 is the lighter of the two supported protocols: `7878`-framed
//! (`7979` for extended frames), CRC-ITU checked, with a one-byte message
//! type. Sessions authenticate with a single login frame carrying the
//! device IMEI as BCD.

pub mod protocol;
pub mod session;

pub use protocol::codec::Gt06FrameCodec;
pub use protocol::error::ProtocolError;
pub use protocol::frame::Gt06Frame;
pub use session::{authenticate, Gt06Session};
