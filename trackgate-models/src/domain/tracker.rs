use serde::{Deserialize, Serialize};

use super::location::LocationView;

/// Registration request body.
#[derive(Debug, Clone, Deserialize)]
pub struct NewTracker {
    pub id: String,
    pub name: String,
    /// Explicit owner; admin-only, defaults to the caller.
    #[serde(default)]
    pub owner: Option<i32>,
    pub phone_number: String,
    pub model: String,
    pub enabled: bool,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct SetEnabled {
    pub enabled: bool,
}

/// Tracker as presented to the control plane: registration record plus
/// live-connection flag and the latest reported location, if any.
#[derive(Debug, Clone, Serialize)]
pub struct TrackerInfo {
    pub id: String,
    pub name: String,
    pub owner: i32,
    pub phone_number: String,
    pub model: String,
    pub connected: bool,
    pub enabled: bool,
    /// RFC 3339 timestamp of the last session attach.
    pub last_connected: String,
    pub location: Option<LocationView>,
}

/// Outcome classification for tracker registration.
///
/// The insert itself is a plain unique-constraint race; the classification
/// afterwards decides which conflict the caller is told about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationOutcome {
    Success,
    IdenticalExists,
    IdUsedByOwner,
    IdUsedByOther,
    NameUsedByOwner,
    NameUsedByOther,
    Unknown,
}
