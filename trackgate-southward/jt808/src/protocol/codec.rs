//! JT/T 808 framed codec for use with `tokio_util::codec::Framed`.
//!
//! Every frame is bracketed by its own `7E` flags and unescaped as a
//! whole buffer segment, so there is no special read path for any
//! message: registration, the follow-up authentication and everything
//! after it travel through the same decoder.
//!
//! Corrupt segments (bad escapes, length lies, check mismatches) are
//! dropped inside the decoder with a warning and the scan continues at
//! the next flag; a decoder error would terminate the stream, which a
//! single mangled frame does not warrant.

use crate::protocol::bcd;
use crate::protocol::error::ProtocolError;
use crate::protocol::frame::{escape, unescape, xor_check, Jt808Frame, BODY_LEN_MASK, FLAG};
use bytes::{Buf, BufMut, BytesMut};
use std::io;
use tokio_util::codec::{Decoder, Encoder};

/// Header length after unescaping, excluding the check byte.
const HEADER_LEN: usize = 12;

/// Longest escaped segment we accept between flags.
const MAX_SEGMENT_LEN: usize = 2 * (HEADER_LEN + BODY_LEN_MASK as usize + 1);

#[derive(Debug, Clone, Default)]
pub struct Jt808FrameCodec;

impl Jt808FrameCodec {
    pub fn new() -> Self {
        Self
    }
}

impl Decoder for Jt808FrameCodec {
    type Item = Jt808Frame;
    type Error = io::Error;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        loop {
            // Drop anything before the opening flag.
            let Some(start) = src.iter().position(|&b| b == FLAG) else {
                src.clear();
                return Ok(None);
            };
            if start > 0 {
                tracing::debug!(skipped = start, "discarded bytes before frame flag");
                src.advance(start);
            }

            // A flag pair with nothing between them is the tail of the
            // previous frame butting against the next one; skip it.
            if src.len() >= 2 && src[1] == FLAG {
                src.advance(1);
                continue;
            }

            let Some(end) = src[1..].iter().position(|&b| b == FLAG).map(|p| p + 1) else {
                if src.len() > MAX_SEGMENT_LEN {
                    src.clear();
                    return Err(ProtocolError::InvalidFrame(
                        "unterminated frame exceeds maximum length".into(),
                    )
                    .into());
                }
                return Ok(None);
            };

            let segment = src.split_to(end + 1);
            let plain = match unescape(&segment[1..end]) {
                Ok(plain) => plain,
                Err(e) => {
                    tracing::warn!(error = %e, "dropping frame");
                    continue;
                }
            };

            if plain.len() < HEADER_LEN + 1 {
                tracing::warn!(len = plain.len(), "dropping truncated frame");
                continue;
            }

            let msg_id = u16::from_be_bytes([plain[0], plain[1]]);
            let attr = u16::from_be_bytes([plain[2], plain[3]]);
            let body_len = (attr & BODY_LEN_MASK) as usize;
            if plain.len() != HEADER_LEN + body_len + 1 {
                tracing::warn!(
                    declared = body_len,
                    carried = plain.len() - HEADER_LEN - 1,
                    "dropping frame with lying body attribute"
                );
                continue;
            }

            let wire = plain[HEADER_LEN + body_len];
            let computed = xor_check(&plain[..HEADER_LEN + body_len]);
            if wire != computed {
                tracing::warn!(
                    error = %ProtocolError::ChecksumMismatch { wire, computed },
                    "dropping frame"
                );
                continue;
            }

            let mut raw_id = [0u8; 6];
            raw_id.copy_from_slice(&plain[4..10]);
            let device_id = bcd::device_id_to_hex(&raw_id);
            let serial = u16::from_be_bytes([plain[10], plain[11]]);
            let body = BytesMut::from(&plain[HEADER_LEN..HEADER_LEN + body_len]).freeze();

            return Ok(Some(Jt808Frame {
                msg_id,
                device_id,
                serial,
                body,
            }));
        }
    }
}

impl Encoder<Jt808Frame> for Jt808FrameCodec {
    type Error = io::Error;

    fn encode(&mut self, frame: Jt808Frame, dst: &mut BytesMut) -> Result<(), Self::Error> {
        if frame.body.len() > BODY_LEN_MASK as usize {
            return Err(ProtocolError::InvalidFrame(format!(
                "body too large for attribute field: {} bytes",
                frame.body.len()
            ))
            .into());
        }
        let device_id = bcd::device_id_from_hex(&frame.device_id)?;

        let mut plain = BytesMut::with_capacity(HEADER_LEN + frame.body.len() + 1);
        plain.put_u16(frame.msg_id);
        plain.put_u16(frame.body.len() as u16);
        plain.put_slice(&device_id);
        plain.put_u16(frame.serial);
        plain.put_slice(&frame.body);
        let check = xor_check(&plain);
        plain.put_u8(check);

        let stuffed = escape(&plain);
        dst.reserve(stuffed.len() + 2);
        dst.put_u8(FLAG);
        dst.put_slice(&stuffed);
        dst.put_u8(FLAG);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::frame::{builder, defs};
    use bytes::Bytes;

    const DEVICE_ID: &str = "016370577506";

    fn encode(frame: Jt808Frame) -> BytesMut {
        let mut buf = BytesMut::new();
        Jt808FrameCodec::new().encode(frame, &mut buf).unwrap();
        buf
    }

    #[test]
    fn roundtrip_plain_body() {
        let frame = Jt808Frame::new(
            defs::MSG_LOCATION,
            DEVICE_ID,
            0x0102,
            Bytes::from_static(&[0x01, 0x02, 0x03]),
        );
        let mut buf = encode(frame.clone());
        let decoded = Jt808FrameCodec::new().decode(&mut buf).unwrap().unwrap();
        assert_eq!(decoded, frame);
        assert!(buf.is_empty());
    }

    #[test]
    fn roundtrip_body_full_of_flag_bytes() {
        let body = vec![0x7E, 0x7D, 0x7E, 0x7E, 0x7D, 0x01, 0x7D, 0x02, 0x7E];
        let frame = Jt808Frame::new(defs::MSG_UPSTREAM_DATA, DEVICE_ID, 7, body.clone());
        let buf = encode(frame.clone());

        // No bare flag byte anywhere inside the envelope.
        assert_eq!(buf[0], FLAG);
        assert_eq!(buf[buf.len() - 1], FLAG);
        assert!(!buf[1..buf.len() - 1].contains(&FLAG));

        let mut buf = BytesMut::from(buf.as_ref());
        let decoded = Jt808FrameCodec::new().decode(&mut buf).unwrap().unwrap();
        assert_eq!(decoded.body.as_ref(), body.as_slice());
    }

    #[test]
    fn xor_of_encoded_header_and_body_matches_check_byte() {
        let frame = Jt808Frame::new(defs::MSG_HEARTBEAT, DEVICE_ID, 3, Bytes::new());
        let buf = encode(frame);
        let plain = unescape(&buf[1..buf.len() - 1]).unwrap();
        let (content, check) = plain.split_at(plain.len() - 1);
        assert_eq!(xor_check(content), check[0]);
    }

    #[test]
    fn back_to_back_frames_decode_in_sequence() {
        let mut buf = BytesMut::new();
        buf.extend_from_slice(&encode(builder::universal_ack(
            DEVICE_ID,
            1,
            defs::MSG_HEARTBEAT,
            0,
        )));
        buf.extend_from_slice(&encode(builder::version_info_ack(DEVICE_ID, 2)));

        let mut codec = Jt808FrameCodec::new();
        let first = codec.decode(&mut buf).unwrap().unwrap();
        let second = codec.decode(&mut buf).unwrap().unwrap();
        assert_eq!(first.msg_id, defs::MSG_PLATFORM_ACK);
        assert_eq!(second.msg_id, defs::MSG_VERSION_INFO_ACK);
        assert_eq!(second.body.len(), 11);
    }

    #[test]
    fn partial_frame_waits_for_more_data() {
        let buf = encode(Jt808Frame::new(defs::MSG_HEARTBEAT, DEVICE_ID, 1, Bytes::new()));
        let mut partial = BytesMut::from(&buf[..buf.len() - 4]);
        assert!(Jt808FrameCodec::new().decode(&mut partial).unwrap().is_none());
    }

    #[test]
    fn corrupted_check_byte_drops_only_that_frame() {
        let mut buf = encode(Jt808Frame::new(defs::MSG_HEARTBEAT, DEVICE_ID, 1, Bytes::new()));
        let pos = buf.len() - 2;
        buf[pos] ^= 0x10;
        buf.extend_from_slice(&encode(Jt808Frame::new(
            defs::MSG_HEARTBEAT,
            DEVICE_ID,
            2,
            Bytes::new(),
        )));

        let decoded = Jt808FrameCodec::new().decode(&mut buf).unwrap().unwrap();
        assert_eq!(decoded.serial, 2);
        assert!(buf.is_empty());
    }

    #[test]
    fn garbage_before_flag_is_skipped() {
        let mut buf = BytesMut::from(&[0xDE, 0xAD][..]);
        buf.extend_from_slice(&encode(Jt808Frame::new(
            defs::MSG_HEARTBEAT,
            DEVICE_ID,
            9,
            Bytes::new(),
        )));
        let decoded = Jt808FrameCodec::new().decode(&mut buf).unwrap().unwrap();
        assert_eq!(decoded.serial, 9);
    }

    #[test]
    fn body_attribute_mismatch_drops_the_frame() {
        // Hand-build a frame whose attribute word lies about the length.
        let device = bcd::device_id_from_hex(DEVICE_ID).unwrap();
        let mut plain = BytesMut::new();
        plain.put_u16(defs::MSG_HEARTBEAT);
        plain.put_u16(5); // claims five body bytes, carries none
        plain.put_slice(&device);
        plain.put_u16(1);
        let check = xor_check(&plain);
        plain.put_u8(check);

        let mut buf = BytesMut::new();
        buf.put_u8(FLAG);
        buf.put_slice(&escape(&plain));
        buf.put_u8(FLAG);

        assert!(Jt808FrameCodec::new().decode(&mut buf).unwrap().is_none());
        assert!(buf.is_empty());
    }
}
