//! Body-level parsers for the JT/T 808 messages the gateway consumes.

use crate::protocol::error::ProtocolError;

/// Location section of a `0x0200` body, raw wire units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocationReport {
    /// Latitude, degrees x 1_000_000.
    pub lat: u32,
    /// Longitude, degrees x 1_000_000.
    pub lon: u32,
    pub speed: u16,
    pub heading: u16,
}

/// Parse a single-shot location body. The alarm and status words at
/// `[0:8]` are skipped; `[8:12]` latitude, `[12:16]` longitude, two
/// bytes of altitude, `[18:20]` speed, `[20:22]` heading.
pub fn parse_location(body: &[u8]) -> Result<LocationReport, ProtocolError> {
    if body.len() < 22 {
        return Err(ProtocolError::InvalidBody(format!(
            "location body too short: {} bytes",
            body.len()
        )));
    }
    Ok(LocationReport {
        lat: u32::from_be_bytes([body[8], body[9], body[10], body[11]]),
        lon: u32::from_be_bytes([body[12], body[13], body[14], body[15]]),
        speed: u16::from_be_bytes([body[18], body[19]]),
        heading: u16::from_be_bytes([body[20], body[21]]),
    })
}

/// Text of a `0x6006` command response. The seven leading bytes are a
/// fixed preamble (response serial and flags) the platform ignores.
pub fn parse_command_response(body: &[u8]) -> Result<String, ProtocolError> {
    if body.len() < 7 {
        return Err(ProtocolError::InvalidBody(format!(
            "command response too short: {} bytes",
            body.len()
        )));
    }
    Ok(String::from_utf8_lossy(&body[7..]).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn location_fields() {
        let mut body = vec![0u8; 8];
        body.extend_from_slice(&22_546_000u32.to_be_bytes());
        body.extend_from_slice(&114_057_000u32.to_be_bytes());
        body.extend_from_slice(&[0x00, 0x64]); // altitude, skipped
        body.extend_from_slice(&55u16.to_be_bytes());
        body.extend_from_slice(&270u16.to_be_bytes());

        let report = parse_location(&body).unwrap();
        assert_eq!(report.lat, 22_546_000);
        assert_eq!(report.lon, 114_057_000);
        assert_eq!(report.speed, 55);
        assert_eq!(report.heading, 270);
    }

    #[test]
    fn short_location_rejected() {
        assert!(parse_location(&[0u8; 21]).is_err());
    }

    #[test]
    fn command_response_skips_preamble() {
        let mut body = vec![0u8; 7];
        body.extend_from_slice(b"LOW BATTERY");
        assert_eq!(parse_command_response(&body).unwrap(), "LOW BATTERY");
    }
}
