pub use super::auth::AuthUser;
pub use super::command::CommandPayload;
pub use super::location::{HistoryQuery, LocationView};
pub use super::model::{NewDeviceModel, Substitutions};
pub use super::tracker::{NewTracker, RegistrationOutcome, SetEnabled, TrackerInfo};
