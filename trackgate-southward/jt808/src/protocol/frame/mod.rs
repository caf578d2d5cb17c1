use bytes::Bytes;

pub mod body;
pub mod builder;
pub mod defs;

pub use body::*;
pub use defs::*;

use crate::protocol::error::ProtocolError;

/// One JT/T 808 frame, after unescaping.
///
/// Wire layout: `7E | HEADER(12) | BODY | CHECK(1) | 7E` with `7D`-based
/// byte stuffing applied between the flags. The header carries
/// `MSGID(2) | BODY_ATTR(2) | DEVICE_ID(6 BCD) | SERIAL(2)`; the body
/// length sits in the low 10 bits of the attribute word, and the check
/// byte is the XOR of header and body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Jt808Frame {
    pub msg_id: u16,
    /// Terminal id as 12 hex digits (decoded BCD).
    pub device_id: String,
    pub serial: u16,
    pub body: Bytes,
}

impl Jt808Frame {
    pub fn new(
        msg_id: u16,
        device_id: impl Into<String>,
        serial: u16,
        body: impl Into<Bytes>,
    ) -> Self {
        Self {
            msg_id,
            device_id: device_id.into(),
            serial,
            body: body.into(),
        }
    }
}

/// XOR of all bytes, the JT/T 808 check code.
pub fn xor_check(data: &[u8]) -> u8 {
    data.iter().fold(0, |acc, b| acc ^ b)
}

/// Apply byte stuffing: `7D -> 7D 01`, `7E -> 7D 02`.
pub fn escape(data: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(data.len() + data.len() / 8);
    for &b in data {
        match b {
            0x7D => out.extend_from_slice(&[0x7D, 0x01]),
            0x7E => out.extend_from_slice(&[0x7D, 0x02]),
            other => out.push(other),
        }
    }
    out
}

/// Undo byte stuffing. Rejects a trailing lone `7D` and any `7D xx`
/// sequence other than `7D 01` / `7D 02`.
pub fn unescape(data: &[u8]) -> Result<Vec<u8>, ProtocolError> {
    let mut out = Vec::with_capacity(data.len());
    let mut iter = data.iter();
    while let Some(&b) = iter.next() {
        if b != 0x7D {
            out.push(b);
            continue;
        }
        match iter.next() {
            Some(0x01) => out.push(0x7D),
            Some(0x02) => out.push(0x7E),
            Some(&other) => return Err(ProtocolError::InvalidEscape(other)),
            None => {
                return Err(ProtocolError::InvalidFrame(
                    "dangling escape byte at frame end".into(),
                ))
            }
        }
    }
    Ok(out)
}
