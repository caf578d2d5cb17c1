use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProtocolError {
    #[error("invalid frame: {0}")]
    InvalidFrame(String),

    #[error("check code mismatch: frame carries {wire:#06x}, computed {computed:#06x}")]
    ChecksumMismatch { wire: u16, computed: u16 },

    #[error("invalid body: {0}")]
    InvalidBody(String),
}

impl From<ProtocolError> for std::io::Error {
    fn from(e: ProtocolError) -> Self {
        std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
    }
}
