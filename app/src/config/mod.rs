//! Configuration management: defaults, validation, loading from DB + environment.

pub mod app_config;
pub mod defaults;
pub mod manager;
pub mod validation;

pub use app_config::{AppConfig, StorageBackend};
pub use manager::SettingsManager;

use serde::{Deserialize, Serialize};

/// Setting type: normal or secret (masked when listed).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SettingType {
    Normal,
    Secret,
}

impl SettingType {
    pub fn as_str(self) -> &'static str {
        match self {
            SettingType::Normal => "normal",
            SettingType::Secret => "secret",
        }
    }
}

/// A setting as shown to the operator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettingInfo {
    pub key: String,
    pub value: String,
    #[serde(rename = "type")]
    pub setting_type: SettingType,
    pub required: bool,
    pub description: String,
    pub has_value: bool,
}

/// Whether photo storage is usable with the current settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageStatus {
    pub storage_configured: bool,
    pub missing_settings: Vec<String>,
    pub warnings: Vec<String>,
}
