/// Default configuration file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE_NAME: &str = "trackgate.toml";

/// Header carrying the caller's API key on every control-plane request.
pub const API_KEY_HEADER: &str = "X-API-Key";

/// Placeholders substituted into device-model provisioning strings.
pub const SUBST_IP: &str = "<ip>";
pub const SUBST_PORT: &str = "<port>";
