//! GT06 framed codec for use with `tokio_util::codec::Framed`.
//!
//! Corrupt input (bad check code, missing stop bytes, implausible
//! length) is dropped inside the decoder with a warning and the scan
//! resynchronizes on the next start pair; a decoder error would
//! terminate the stream, which a single mangled frame does not warrant.

use crate::protocol::crc::crc_itu;
use crate::protocol::error::ProtocolError;
use crate::protocol::frame::{Gt06Frame, END, START, START_EXTENDED};
use bytes::{Buf, BufMut, BytesMut};
use std::io;
use tokio_util::codec::{Decoder, Encoder};

/// Longest frame we accept before assuming stream corruption.
const MAX_WIRE_LEN: usize = 1024;

#[derive(Debug, Clone, Default)]
pub struct Gt06FrameCodec;

impl Gt06FrameCodec {
    pub fn new() -> Self {
        Self
    }
}

/// Scan to the next plausible `7878`/`7979` start pair, discarding
/// garbage. Returns `false` when the buffer has no start pair and has
/// been reduced to at most one trailing byte.
fn sync_to_start(src: &mut BytesMut) -> bool {
    let mut skipped = 0usize;
    while src.len() >= 2 {
        let b = src[0];
        if (b == START || b == START_EXTENDED) && src[1] == b {
            break;
        }
        src.advance(1);
        skipped += 1;
    }
    if skipped > 0 {
        tracing::debug!(skipped, "discarded bytes while scanning for frame start");
    }
    src.len() >= 2
}

impl Decoder for Gt06FrameCodec {
    type Item = Gt06Frame;
    type Error = io::Error;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        loop {
            if !sync_to_start(src) {
                return Ok(None);
            }

            let extended = src[0] == START_EXTENDED;
            let len_width = if extended { 2 } else { 1 };
            if src.len() < 2 + len_width {
                return Ok(None);
            }

            // LEN covers TYPE + PAYLOAD + SERIAL + CHECK.
            let wire_len = if extended {
                u16::from_be_bytes([src[2], src[3]]) as usize
            } else {
                src[2] as usize
            };
            let total = 2 + len_width + wire_len + END.len();
            if wire_len < 5 || total > MAX_WIRE_LEN {
                // Not a real frame start; resynchronize past the pair.
                tracing::warn!(wire_len, "implausible length field, resynchronizing");
                src.advance(2);
                continue;
            }
            if src.len() < total {
                src.reserve(total - src.len());
                return Ok(None);
            }

            if src[total - 2] != END[0] || src[total - 1] != END[1] {
                tracing::warn!("frame without stop bytes, resynchronizing");
                src.advance(2);
                continue;
            }

            // Check code is CRC-ITU over LEN through SERIAL.
            let computed = crc_itu(&src[2..total - 4]);
            let wire = u16::from_be_bytes([src[total - 4], src[total - 3]]);
            if computed != wire {
                tracing::warn!(
                    error = %ProtocolError::ChecksumMismatch { wire, computed },
                    "dropping frame"
                );
                src.advance(total);
                continue;
            }

            let frame = src.split_to(total);
            let msg_type = frame[2 + len_width];
            let payload_start = 2 + len_width + 1;
            let payload_end = total - 6;
            let serial = u16::from_be_bytes([frame[total - 6], frame[total - 5]]);
            let payload = frame.freeze().slice(payload_start..payload_end);

            return Ok(Some(Gt06Frame {
                msg_type,
                payload,
                serial,
                extended,
            }));
        }
    }
}

impl Encoder<Gt06Frame> for Gt06FrameCodec {
    type Error = io::Error;

    fn encode(&mut self, frame: Gt06Frame, dst: &mut BytesMut) -> Result<(), Self::Error> {
        let wire_len = frame.wire_len();
        if wire_len > u16::MAX as usize || (!frame.extended && wire_len > u8::MAX as usize) {
            return Err(ProtocolError::InvalidFrame(format!(
                "payload too large for framing: {} bytes",
                frame.payload.len()
            ))
            .into());
        }

        dst.reserve(4 + wire_len + END.len());
        let crc_from = dst.len() + 2;
        if frame.extended {
            dst.put_slice(&[START_EXTENDED, START_EXTENDED]);
            dst.put_u16(wire_len as u16);
        } else {
            dst.put_slice(&[START, START]);
            dst.put_u8(wire_len as u8);
        }
        dst.put_u8(frame.msg_type);
        dst.put_slice(&frame.payload);
        dst.put_u16(frame.serial);
        let check = crc_itu(&dst[crc_from..]);
        dst.put_u16(check);
        dst.put_slice(&END);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::frame::{builder, MSG_HEARTBEAT, MSG_LOCATION, MSG_LOGIN};
    use bytes::Bytes;

    fn encode(frame: Gt06Frame) -> BytesMut {
        let mut buf = BytesMut::new();
        Gt06FrameCodec::new().encode(frame, &mut buf).unwrap();
        buf
    }

    #[test]
    fn login_ack_reference_bytes() {
        let buf = encode(builder::login_ack(1));
        assert_eq!(
            buf.as_ref(),
            &[0x78, 0x78, 0x05, 0x01, 0x00, 0x01, 0xD9, 0xDC, 0x0D, 0x0A]
        );
    }

    #[test]
    fn roundtrip_standard() {
        let frame = Gt06Frame::new(
            MSG_LOCATION,
            Bytes::from_static(&[0x10, 0x20, 0x30, 0x40]),
            0x0102,
        );
        let mut buf = encode(frame.clone());
        let decoded = Gt06FrameCodec::new().decode(&mut buf).unwrap().unwrap();
        assert_eq!(decoded, frame);
        assert!(buf.is_empty());
    }

    #[test]
    fn roundtrip_extended() {
        let payload: Vec<u8> = (0..300).map(|i| (i % 251) as u8).collect();
        let frame = Gt06Frame::extended(MSG_LOCATION, payload, 0xBEEF);
        let mut buf = encode(frame.clone());
        let decoded = Gt06FrameCodec::new().decode(&mut buf).unwrap().unwrap();
        assert_eq!(decoded, frame);
    }

    #[test]
    fn partial_frame_waits_for_more_data() {
        let buf = encode(builder::heartbeat_ack(9));
        let mut partial = BytesMut::from(&buf[..buf.len() - 3]);
        assert!(Gt06FrameCodec::new().decode(&mut partial).unwrap().is_none());
    }

    #[test]
    fn resynchronizes_past_garbage() {
        let mut buf = BytesMut::from(&[0x00, 0xFF, 0x42][..]);
        buf.extend_from_slice(&encode(builder::login_ack(7)));
        let decoded = Gt06FrameCodec::new().decode(&mut buf).unwrap().unwrap();
        assert_eq!(decoded.msg_type, MSG_LOGIN);
        assert_eq!(decoded.serial, 7);
    }

    #[test]
    fn corrupted_check_code_drops_only_that_frame() {
        let mut bad = encode(builder::heartbeat_ack(3));
        let pos = bad.len() - 3;
        bad[pos] ^= 0xFF;

        // The mangled frame is skipped and the following one decodes.
        let mut buf = bad;
        buf.extend_from_slice(&encode(builder::heartbeat_ack(4)));
        let decoded = Gt06FrameCodec::new().decode(&mut buf).unwrap().unwrap();
        assert_eq!(decoded.serial, 4);
        assert!(buf.is_empty());
    }

    #[test]
    fn corrupted_frame_alone_leaves_empty_buffer() {
        let mut buf = encode(builder::heartbeat_ack(3));
        let pos = buf.len() - 3;
        buf[pos] ^= 0xFF;
        assert!(Gt06FrameCodec::new().decode(&mut buf).unwrap().is_none());
        assert!(buf.is_empty());
    }

    #[test]
    fn mismatched_start_pair_is_skipped() {
        let mut buf = BytesMut::from(&[0x78, 0x79][..]);
        buf.extend_from_slice(&encode(builder::heartbeat_ack(1)));
        let decoded = Gt06FrameCodec::new().decode(&mut buf).unwrap().unwrap();
        assert_eq!(decoded.msg_type, MSG_HEARTBEAT);
    }
}
