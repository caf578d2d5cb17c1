//! Builders for the platform-originated GT06 frames.

use super::defs::{MSG_COMMAND, MSG_HEARTBEAT, MSG_LOGIN};
use super::Gt06Frame;
use bytes::{BufMut, Bytes, BytesMut};

/// Empty login acknowledgement echoing the device's serial number.
pub fn login_ack(serial: u16) -> Gt06Frame {
    Gt06Frame::new(MSG_LOGIN, Bytes::new(), serial)
}

/// Empty heartbeat acknowledgement echoing the device's serial number.
pub fn heartbeat_ack(serial: u16) -> Gt06Frame {
    Gt06Frame::new(MSG_HEARTBEAT, Bytes::new(), serial)
}

/// Platform command frame (`0x80`).
///
/// Payload: `LEN(1) = text.len() + 4 | CMDID(4, big-endian) | text`.
/// The command id is echoed back by the device and keys the response
/// correlation.
pub fn command(text: &str, cmd_id: u32, serial: u16) -> Gt06Frame {
    let mut payload = BytesMut::with_capacity(5 + text.len());
    payload.put_u8((text.len() + 4) as u8);
    payload.put_u32(cmd_id);
    payload.put_slice(text.as_bytes());
    Gt06Frame::new(MSG_COMMAND, payload.freeze(), serial)
}
