//! Builders for the platform-originated JT/T 808 frames.
//!
//! Platform frames carry serial 0 except where they echo the device's
//! serial, matching observed platform behavior.

use super::defs::{MSG_COMMAND, MSG_PLATFORM_ACK, MSG_REGISTRATION_ACK, MSG_VERSION_INFO_ACK};
use super::Jt808Frame;
use crate::protocol::bcd;
use bytes::{BufMut, BytesMut};

/// Registration reply (`0x8100`):
/// `REQ_SERIAL(2) | RESULT(1) | [AUTH_CODE if success]`.
pub fn registration_ack(
    device_id: &str,
    req_serial: u16,
    result: u8,
    auth_code: Option<&[u8]>,
) -> Jt808Frame {
    let mut body = BytesMut::with_capacity(3 + auth_code.map_or(0, <[u8]>::len));
    body.put_u16(req_serial);
    body.put_u8(result);
    if let Some(code) = auth_code {
        body.put_slice(code);
    }
    Jt808Frame::new(MSG_REGISTRATION_ACK, device_id, 0, body.freeze())
}

/// Platform universal acknowledgement (`0x8001`):
/// `REQ_SERIAL(2) | REQ_TYPE(2) | RESULT(1)`.
pub fn universal_ack(device_id: &str, req_serial: u16, req_type: u16, result: u8) -> Jt808Frame {
    let mut body = BytesMut::with_capacity(5);
    body.put_u16(req_serial);
    body.put_u16(req_type);
    body.put_u8(result);
    Jt808Frame::new(MSG_PLATFORM_ACK, device_id, 0, body.freeze())
}

/// Version-info reply (`0x8205`): current UTC+8 BCD time padded with
/// five zero bytes, echoing the device's serial.
pub fn version_info_ack(device_id: &str, req_serial: u16) -> Jt808Frame {
    let mut body = BytesMut::with_capacity(11);
    body.put_slice(&bcd::utc8_time_bcd());
    body.put_slice(&[0u8; 5]);
    Jt808Frame::new(MSG_VERSION_INFO_ACK, device_id, req_serial, body.freeze())
}

/// Platform text command (`0x8300`): flag byte then the command text.
pub fn command(device_id: &str, text: &str, serial: u16) -> Jt808Frame {
    let mut body = BytesMut::with_capacity(1 + text.len());
    body.put_u8(0x01);
    body.put_slice(text.as_bytes());
    Jt808Frame::new(MSG_COMMAND, device_id, serial, body.freeze())
}
