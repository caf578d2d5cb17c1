use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProtocolError {
    #[error("invalid frame: {0}")]
    InvalidFrame(String),

    #[error("invalid escape sequence 0x7d{0:02x}")]
    InvalidEscape(u8),

    #[error("check code mismatch: frame carries {wire:#04x}, computed {computed:#04x}")]
    ChecksumMismatch { wire: u8, computed: u8 },

    #[error("invalid body: {0}")]
    InvalidBody(String),

    #[error("invalid device id: {0}")]
    InvalidDeviceId(String),
}

impl From<ProtocolError> for std::io::Error {
    fn from(e: ProtocolError) -> Self {
        std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
    }
}
