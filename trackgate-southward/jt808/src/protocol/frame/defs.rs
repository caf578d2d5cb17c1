pub const FLAG: u8 = 0x7E;

/// Low 10 bits of the body attribute word carry the body length.
pub const BODY_LEN_MASK: u16 = 0x03FF;

pub const MSG_TERMINAL_ACK: u16 = 0x0001;
pub const MSG_HEARTBEAT: u16 = 0x0002;
pub const MSG_LOGOUT: u16 = 0x0003;
pub const MSG_REGISTRATION: u16 = 0x0100;
pub const MSG_AUTHENTICATION: u16 = 0x0102;
pub const MSG_LOCATION: u16 = 0x0200;
pub const MSG_VERSION_INFO: u16 = 0x0205;
pub const MSG_LOCATION_BATCH: u16 = 0x0704;
pub const MSG_UPSTREAM_DATA: u16 = 0x0900;
pub const MSG_COMMAND_RESPONSE: u16 = 0x6006;
pub const MSG_PLATFORM_ACK: u16 = 0x8001;
pub const MSG_REGISTRATION_ACK: u16 = 0x8100;
pub const MSG_VERSION_INFO_ACK: u16 = 0x8205;
pub const MSG_COMMAND: u16 = 0x8300;

pub const RESULT_SUCCESS: u8 = 0x00;
pub const RESULT_FAILURE: u8 = 0x01;
pub const RESULT_INCORRECT_INFORMATION: u8 = 0x02;
pub const RESULT_NOT_SUPPORTED: u8 = 0x03;
pub const RESULT_ALARM_CONFIRMATION: u8 = 0x04;

/// Registration replies reuse the result byte with their own meaning;
/// `2` tells the terminal its id is not provisioned on the platform.
pub const REGISTRATION_OK: u8 = 0x00;
pub const REGISTRATION_NOT_PROVISIONED: u8 = 0x02;

/// Auth codes are 12 random bytes minted at registration.
pub const AUTH_CODE_LEN: usize = 12;
