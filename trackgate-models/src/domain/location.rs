use serde::{Deserialize, Serialize};

/// A single location event as returned by the REST layer.
///
/// `lat`/`lon` are the raw fixed-point integers from the wire; the scale
/// depends on the reporting protocol and conversion to floating degrees is
/// left to the presentation layer.
#[derive(Debug, Clone, Serialize)]
pub struct LocationView {
    pub timestamp: String,
    pub lat: u32,
    pub lon: u32,
    pub speed: u16,
    pub heading: u16,
}

/// Query parameters for location history.
///
/// `start`/`end` accept RFC 3339 or epoch seconds and take precedence over
/// `limit`; `end` defaults to now, `start` to 24 hours before `end`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<u64>,
    pub start: Option<String>,
    pub end: Option<String>,
}
