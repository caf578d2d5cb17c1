pub mod constants;
pub mod domain;
pub mod entities;
pub mod settings;
pub mod web;

pub use settings::Settings;
pub use web::ApiReply;
