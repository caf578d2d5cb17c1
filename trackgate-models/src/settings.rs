use config::{Config, File};
use serde::Deserialize;
use std::{ops::Deref, sync::Arc};
use trackgate_error::GateResult;

/// Process-wide configuration, cheap to clone and share.
#[derive(Debug, Clone)]
pub struct Settings(Arc<Inner>);

impl Deref for Settings {
    type Target = Inner;
    fn deref(&self) -> &Self::Target {
        self.0.as_ref()
    }
}

impl Settings {
    /// Load settings from the given file (optional) layered with
    /// `TG__`-prefixed environment variables, e.g. `TG__DEVICE__PORT=7018`.
    pub fn new(config_path: &str) -> GateResult<Self> {
        let builder = Config::builder()
            .add_source(File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix("TG")
                    .separator("__")
                    .try_parsing(true),
            );
        let inner: Inner = builder.build()?.try_deserialize()?;
        Ok(Self(Arc::new(inner)))
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct Inner {
    #[serde(default)]
    pub general: General,
    #[serde(default)]
    pub device: Device,
    #[serde(default)]
    pub web: Web,
    #[serde(default)]
    pub db: Db,
}

#[derive(Debug, Clone, Deserialize)]
pub struct General {
    /// Public address of this gateway as reachable by tracker SIM cards.
    /// Substituted for `<ip>` in device-model provisioning strings.
    #[serde(default = "General::public_ip_default")]
    pub public_ip: String,
}

impl Default for General {
    fn default() -> Self {
        General {
            public_ip: General::public_ip_default(),
        }
    }
}

impl General {
    fn public_ip_default() -> String {
        "127.0.0.1".into()
    }
}

/// Device TCP plane (tracker connections).
#[derive(Debug, Clone, Deserialize)]
pub struct Device {
    #[serde(default = "Device::bind_default")]
    pub bind: String,
    /// Listener port; also substituted for `<port>` in provisioning strings.
    #[serde(default = "Device::port_default")]
    pub port: u16,
}

impl Default for Device {
    fn default() -> Self {
        Device {
            bind: Device::bind_default(),
            port: Device::port_default(),
        }
    }
}

impl Device {
    fn bind_default() -> String {
        "0.0.0.0".into()
    }

    fn port_default() -> u16 {
        7018
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.bind, self.port)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Web {
    #[serde(default = "Web::host_default")]
    pub host: String,
    #[serde(default = "Web::port_default")]
    pub port: u16,
    /// End-to-end deadline for the tracker command endpoint, in seconds.
    #[serde(default = "Web::command_timeout_secs_default")]
    pub command_timeout_secs: u64,
}

impl Default for Web {
    fn default() -> Self {
        Web {
            host: Web::host_default(),
            port: Web::port_default(),
            command_timeout_secs: Web::command_timeout_secs_default(),
        }
    }
}

impl Web {
    fn host_default() -> String {
        "0.0.0.0".into()
    }

    fn port_default() -> u16 {
        8080
    }

    fn command_timeout_secs_default() -> u64 {
        30
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct Db {
    #[serde(default)]
    pub sqlite: Sqlite,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Sqlite {
    #[serde(default = "Sqlite::path_default")]
    pub path: String,
    #[serde(default = "Sqlite::max_connections_default")]
    pub max_connections: u32,
    #[serde(default = "Sqlite::min_connections_default")]
    pub min_connections: u32,
    /// Connect timeout in milliseconds.
    #[serde(default = "Sqlite::timeout_default")]
    pub timeout: u64,
}

impl Default for Sqlite {
    fn default() -> Self {
        Sqlite {
            path: Sqlite::path_default(),
            max_connections: Sqlite::max_connections_default(),
            min_connections: Sqlite::min_connections_default(),
            timeout: Sqlite::timeout_default(),
        }
    }
}

impl Sqlite {
    fn path_default() -> String {
        "trackgate.db".into()
    }

    fn max_connections_default() -> u32 {
        10
    }

    fn min_connections_default() -> u32 {
        5
    }

    fn timeout_default() -> u64 {
        5000
    }

    /// Connection URL with `mode=rwc` so the database file is created on
    /// first start.
    pub fn to_url(&self) -> String {
        format!("sqlite://{}?mode=rwc", self.path)
    }
}
