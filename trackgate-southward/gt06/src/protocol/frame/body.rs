//! Payload-level parsers for the GT06 message types the gateway consumes.

use super::defs::alarm_name;
use crate::protocol::error::ProtocolError;
use chrono::{TimeZone, Utc};

/// Location section of a location or alarm payload, raw wire units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocationReport {
    /// GPS timestamp from the payload (epoch seconds, year offset +2000).
    pub timestamp: i64,
    /// Latitude, minutes x 30000.
    pub lat: u32,
    /// Longitude, minutes x 30000.
    pub lon: u32,
    pub speed: u16,
    pub heading: u16,
}

/// Parse the location section of a `0x12`/`0x22`/`0x16` payload.
///
/// Layout: `[0:6]` datetime `YY MM DD hh mm ss`, `[6]` GPS info length
/// and satellite count, `[7:11]` latitude, `[11:15]` longitude, `[15]`
/// speed, `[16:17]` course/status word.
pub fn parse_location(payload: &[u8]) -> Result<LocationReport, ProtocolError> {
    if payload.len() < 18 {
        return Err(ProtocolError::InvalidBody(format!(
            "location payload too short: {} bytes",
            payload.len()
        )));
    }

    let timestamp = parse_datetime(&payload[0..6])?;
    let gps = &payload[6..18];
    let lat = u32::from_be_bytes([gps[1], gps[2], gps[3], gps[4]]);
    let lon = u32::from_be_bytes([gps[5], gps[6], gps[7], gps[8]]);
    let speed = gps[9] as u16;
    // Low two bits of the status high byte are the compass sign flags;
    // the heading keeps the observed on-wire interpretation.
    let heading = u16::from_be_bytes([gps[10] & 0x03, gps[11]]);

    Ok(LocationReport {
        timestamp,
        lat,
        lon,
        speed,
        heading,
    })
}

/// Parse an alarm payload: the location section plus the alarm code at
/// byte 31. Unknown codes map to `"Unknown"`.
pub fn parse_alarm(payload: &[u8]) -> Result<(LocationReport, &'static str), ProtocolError> {
    let report = parse_location(payload)?;
    if payload.len() < 32 {
        return Err(ProtocolError::InvalidBody(format!(
            "alarm payload too short: {} bytes",
            payload.len()
        )));
    }
    Ok((report, alarm_name(payload[31])))
}

/// Parse a `0x15` command-response payload:
/// `LEN(1) | CMDID(4, big-endian) | text`, where `LEN = text.len() + 4`.
/// Returns the response text and the echoed command id.
pub fn parse_command_response(payload: &[u8]) -> Result<(String, u32), ProtocolError> {
    if payload.len() < 5 {
        return Err(ProtocolError::InvalidBody(
            "command response shorter than its fixed header".into(),
        ));
    }
    let content_len = payload[0] as usize;
    if content_len < 4 || 1 + content_len > payload.len() {
        return Err(ProtocolError::InvalidBody(format!(
            "command response length field {} out of range",
            content_len
        )));
    }
    let cmd_id = u32::from_be_bytes([payload[1], payload[2], payload[3], payload[4]]);
    let text = String::from_utf8_lossy(&payload[5..1 + content_len]).into_owned();
    Ok((text, cmd_id))
}

/// Device id from a login payload: hex digits of the 8-byte BCD IMEI
/// with the leading pad nibble stripped.
pub fn device_id_from_login(payload: &[u8]) -> Result<String, ProtocolError> {
    if payload.is_empty() {
        return Err(ProtocolError::InvalidBody("empty login payload".into()));
    }
    let mut id = String::with_capacity(payload.len() * 2);
    for b in payload {
        id.push(char::from_digit((b >> 4) as u32, 16).unwrap());
        id.push(char::from_digit((b & 0x0F) as u32, 16).unwrap());
    }
    id.remove(0);
    Ok(id)
}

fn parse_datetime(b: &[u8]) -> Result<i64, ProtocolError> {
    Utc.with_ymd_and_hms(
        2000 + b[0] as i32,
        b[1] as u32,
        b[2] as u32,
        b[3] as u32,
        b[4] as u32,
        b[5] as u32,
    )
    .single()
    .map(|dt| dt.timestamp())
    .ok_or_else(|| ProtocolError::InvalidBody(format!("invalid datetime {:02x?}", b)))
}
