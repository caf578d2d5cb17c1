//! Data access layer: one repository struct per entity plus the
//! [`TrackerStore`] implementation consumed by the communication plane.
//!
//! The connection pool is installed once at startup; repositories grab a
//! cheap clone per call.

use once_cell::sync::OnceCell;
use sea_orm::DatabaseConnection;
use trackgate_error::storage::StorageError;

pub mod auth_code;
pub mod device_model;
pub mod location;
pub mod store;
pub mod tracker;
pub mod user;

pub use auth_code::AuthCodeRepository;
pub use device_model::DeviceModelRepository;
pub use location::LocationRepository;
pub use store::DbTrackerStore;
pub use tracker::TrackerRepository;
pub use user::UserRepository;

static DB: OnceCell<DatabaseConnection> = OnceCell::new();

/// Install the process-wide connection pool. Called once from startup,
/// before anything touches a repository. A second install is ignored.
pub fn install(conn: DatabaseConnection) {
    let _ = DB.set(conn);
}

#[inline]
pub fn get_db_connection() -> Result<DatabaseConnection, StorageError> {
    DB.get().cloned().ok_or(StorageError::Unavailable)
}
