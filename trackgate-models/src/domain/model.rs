use serde::Deserialize;

use crate::constants::{SUBST_IP, SUBST_PORT};
use crate::settings::Settings;

/// Device-model creation request body.
#[derive(Debug, Clone, Deserialize)]
pub struct NewDeviceModel {
    pub name: String,
    pub init_commands: String,
    pub success_keywords: String,
}

/// Placeholder substitution applied to provisioning strings when device
/// models are read back: `<ip>` and `<port>` become the address this
/// gateway is reachable at.
#[derive(Debug, Clone)]
pub struct Substitutions {
    pairs: Vec<(&'static str, String)>,
}

impl Substitutions {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            pairs: vec![
                (SUBST_IP, settings.general.public_ip.clone()),
                (SUBST_PORT, settings.device.port.to_string()),
            ],
        }
    }

    pub fn apply(&self, input: &str) -> String {
        let mut out = input.to_string();
        for (from, to) in &self.pairs {
            out = out.replace(from, to);
        }
        out
    }
}
