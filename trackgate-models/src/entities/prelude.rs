pub use super::auth_code::{
    ActiveModel as AuthCodeActiveModel, Column as AuthCodeColumn, Entity as AuthCode,
    Model as AuthCodeModel,
};
pub use super::device_model::{
    ActiveModel as DeviceModelActiveModel, Column as DeviceModelColumn, Entity as DeviceModel,
    Model as DeviceModelModel,
};
pub use super::location_data::{
    ActiveModel as LocationDataActiveModel, Column as LocationDataColumn, Entity as LocationData,
    Model as LocationDataModel,
};
pub use super::tracker::{
    ActiveModel as TrackerActiveModel, Column as TrackerColumn, Entity as Tracker,
    Model as TrackerModel,
};
pub use super::user::{
    ActiveModel as UserActiveModel, Column as UserColumn, Entity as User, Model as UserModel,
};
