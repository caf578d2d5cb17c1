pub mod auth_code;
pub mod device_model;
pub mod location_data;
pub mod prelude;
pub mod tracker;
pub mod user;
