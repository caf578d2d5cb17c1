/// A location or alarm event on its way to the persistence worker.
///
/// Coordinates are the raw fixed-point integers from the wire. GT06
/// reports minutes x 30000 (divisor 1_800_000 per degree), JT808 reports
/// degrees x 1_000_000; the store keeps whatever the device sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationFix {
    pub tracker_id: String,
    /// Epoch seconds.
    pub timestamp: i64,
    pub lat: u32,
    pub lon: u32,
    pub speed: u16,
    pub heading: u16,
    /// Alarm name when the event came in as an alarm frame.
    pub alarm: Option<&'static str>,
}

impl LocationFix {
    /// Trackers without a GPS fix report all-zero coordinates; such
    /// records are dropped before persistence.
    pub fn has_position(&self) -> bool {
        self.lat != 0 || self.lon != 0
    }
}
