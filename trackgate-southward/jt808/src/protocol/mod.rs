pub mod bcd;
pub mod codec;
pub mod error;
pub mod frame;
