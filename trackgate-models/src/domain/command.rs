use serde::Deserialize;

/// Upstream command request body. The reply is whatever text the device
/// eventually answers with, passed through verbatim.
#[derive(Debug, Clone, Deserialize)]
pub struct CommandPayload {
    pub command: String,
}
