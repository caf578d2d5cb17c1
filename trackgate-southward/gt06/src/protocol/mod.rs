pub mod codec;
pub mod crc;
pub mod error;
pub mod frame;
