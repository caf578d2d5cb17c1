//! First-byte protocol detection for freshly accepted connections.

use std::time::Duration;
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt};

/// Deadline for the whole identification read; devices announce
/// themselves immediately after connecting, so anything slower is junk.
pub const HANDSHAKE_DEADLINE: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectedProtocol {
    /// `0x7E` flag: JT/T 808.
    Jt808,
    /// `0x78 0x78` / `0x79 0x79` start pair: GT06, extended framing for
    /// the latter.
    Gt06 { extended: bool },
}

#[derive(Error, Debug)]
pub enum DetectError {
    #[error("read error during protocol detection: {0}")]
    Io(#[from] std::io::Error),

    #[error("no identifiable frame start within the deadline")]
    Timeout,

    #[error("start bytes disagree: {first:#04x} then {second:#04x}")]
    StartMismatch { first: u8, second: u8 },

    #[error("unknown protocol start byte {0:#04x}")]
    UnknownProtocol(u8),
}

/// Identify the device protocol from the first byte(s) of the stream.
///
/// Returns the detected protocol together with the consumed bytes so
/// the caller can replay them into the protocol codec's read buffer:
/// every parser owns its complete frame, start bytes included.
pub async fn detect_protocol<T>(
    stream: &mut T,
    deadline: Duration,
) -> Result<(DetectedProtocol, Vec<u8>), DetectError>
where
    T: AsyncRead + Unpin,
{
    let first = read_byte(stream, deadline).await?;
    match first {
        0x7E => Ok((DetectedProtocol::Jt808, vec![first])),
        0x78 | 0x79 => {
            // Both detection bytes share the same handshake deadline.
            let second = read_byte(stream, deadline).await?;
            if second != first {
                return Err(DetectError::StartMismatch { first, second });
            }
            Ok((
                DetectedProtocol::Gt06 {
                    extended: first == 0x79,
                },
                vec![first, second],
            ))
        }
        other => Err(DetectError::UnknownProtocol(other)),
    }
}

async fn read_byte<T>(stream: &mut T, deadline: Duration) -> Result<u8, DetectError>
where
    T: AsyncRead + Unpin,
{
    match tokio::time::timeout(deadline, stream.read_u8()).await {
        Ok(Ok(byte)) => Ok(byte),
        Ok(Err(e)) => Err(DetectError::Io(e)),
        Err(_) => Err(DetectError::Timeout),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    const DEADLINE: Duration = Duration::from_secs(1);

    #[tokio::test]
    async fn jt808_flag_detected() {
        let mut input: &[u8] = &[0x7E, 0x01, 0x02];
        let (proto, consumed) = detect_protocol(&mut input, DEADLINE).await.unwrap();
        assert_eq!(proto, DetectedProtocol::Jt808);
        assert_eq!(consumed, vec![0x7E]);
        // Only the flag byte was taken off the stream.
        assert_eq!(input, &[0x01, 0x02]);
    }

    #[tokio::test]
    async fn gt06_start_pair_detected() {
        let mut input: &[u8] = &[0x78, 0x78];
        let (proto, consumed) = detect_protocol(&mut input, DEADLINE).await.unwrap();
        assert_eq!(proto, DetectedProtocol::Gt06 { extended: false });
        assert_eq!(consumed, vec![0x78, 0x78]);
    }

    #[tokio::test]
    async fn gt06_extended_start_pair_detected() {
        let mut input: &[u8] = &[0x79, 0x79];
        let (proto, _) = detect_protocol(&mut input, DEADLINE).await.unwrap();
        assert_eq!(proto, DetectedProtocol::Gt06 { extended: true });
    }

    #[tokio::test]
    async fn mismatched_pair_rejected() {
        let mut input: &[u8] = &[0x78, 0x79];
        let err = detect_protocol(&mut input, DEADLINE).await.unwrap_err();
        assert!(matches!(
            err,
            DetectError::StartMismatch {
                first: 0x78,
                second: 0x79
            }
        ));
    }

    #[tokio::test]
    async fn unknown_start_byte_rejected() {
        let mut input: &[u8] = &[0x47];
        let err = detect_protocol(&mut input, DEADLINE).await.unwrap_err();
        assert!(matches!(err, DetectError::UnknownProtocol(0x47)));
    }

    #[tokio::test(start_paused = true)]
    async fn silent_connection_times_out() {
        let (_keep_alive, mut silent) = tokio::io::duplex(16);
        let err = detect_protocol(&mut silent, DEADLINE).await.unwrap_err();
        assert!(matches!(err, DetectError::Timeout));
    }
}
