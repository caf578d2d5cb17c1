use bytes::Bytes;

pub mod body;
pub mod builder;
pub mod defs;

pub use body::*;
pub use defs::*;

/// One GT06 frame as carried on the wire.
///
/// `7878 | LEN(1) | TYPE(1) | PAYLOAD | SERIAL(2) | CHECK(2) | 0D0A` for
/// standard frames, `7979 | LEN(2) | ...` for extended frames. `LEN`
/// covers TYPE through CHECK, i.e. `payload.len() + 5`; the check code is
/// CRC-ITU over LEN through SERIAL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Gt06Frame {
    pub msg_type: u8,
    pub payload: Bytes,
    pub serial: u16,
    /// `7979` framing with a two-byte length field.
    pub extended: bool,
}

impl Gt06Frame {
    pub fn new(msg_type: u8, payload: impl Into<Bytes>, serial: u16) -> Self {
        Self {
            msg_type,
            payload: payload.into(),
            serial,
            extended: false,
        }
    }

    pub fn extended(msg_type: u8, payload: impl Into<Bytes>, serial: u16) -> Self {
        Self {
            msg_type,
            payload: payload.into(),
            serial,
            extended: true,
        }
    }

    /// Value of the wire LEN field for this frame.
    pub fn wire_len(&self) -> usize {
        self.payload.len() + 5
    }
}
