//! BCD helpers: terminal ids and the UTC+8 wall-clock timestamp some
//! replies carry.

use crate::protocol::error::ProtocolError;
use chrono::{Datelike, FixedOffset, Timelike, Utc};

/// Decode a 6-byte BCD terminal id into its 12-digit hex string form.
pub fn device_id_to_hex(id: &[u8; 6]) -> String {
    let mut out = String::with_capacity(12);
    for b in id {
        out.push(char::from_digit((b >> 4) as u32, 16).unwrap());
        out.push(char::from_digit((b & 0x0F) as u32, 16).unwrap());
    }
    out
}

/// Encode a 12-digit hex terminal id back into its 6-byte wire form.
pub fn device_id_from_hex(id: &str) -> Result<[u8; 6], ProtocolError> {
    if id.len() != 12 {
        return Err(ProtocolError::InvalidDeviceId(id.to_string()));
    }
    let digits = id.as_bytes();
    let mut out = [0u8; 6];
    for (i, chunk) in digits.chunks_exact(2).enumerate() {
        let hi = (chunk[0] as char)
            .to_digit(16)
            .ok_or_else(|| ProtocolError::InvalidDeviceId(id.to_string()))?;
        let lo = (chunk[1] as char)
            .to_digit(16)
            .ok_or_else(|| ProtocolError::InvalidDeviceId(id.to_string()))?;
        out[i] = ((hi as u8) << 4) | lo as u8;
    }
    Ok(out)
}

/// Current UTC+8 time as six BCD bytes `YY MM DD hh mm ss`.
///
/// The standard expects terminal-local (Chinese) wall-clock time here.
pub fn utc8_time_bcd() -> [u8; 6] {
    let cn = Utc::now().with_timezone(&FixedOffset::east_opt(8 * 3600).unwrap());
    [
        to_bcd((cn.year() % 100) as u8),
        to_bcd(cn.month() as u8),
        to_bcd(cn.day() as u8),
        to_bcd(cn.hour() as u8),
        to_bcd(cn.minute() as u8),
        to_bcd(cn.second() as u8),
    ]
}

/// Pack a decimal value 0..=99 into one BCD byte, e.g. 12 -> 0x12.
pub fn to_bcd(n: u8) -> u8 {
    ((n / 10) << 4) | (n % 10)
}
