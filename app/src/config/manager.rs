//! SettingsManager: DB-backed settings with defaults, migration, and storage status.

use std::collections::HashMap;

use member_db::Database;

use super::defaults::{DEFAULT_SETTINGS, SettingDef};
use super::validation::validate_setting;
use super::{SettingInfo, SettingType, StorageStatus};

const MASK: &str = "********";

/// Wraps [`Database`] to provide high-level settings operations.
#[derive(Clone)]
pub struct SettingsManager {
    db: Database,
}

fn setting_type(def: Option<&SettingDef>) -> SettingType {
    match def {
        Some(d) if d.secret => SettingType::Secret,
        _ => SettingType::Normal,
    }
}

impl SettingsManager {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Get a setting value. Falls back to default if not in DB.
    pub fn get_setting(&self, key: &str) -> Result<String, anyhow::Error> {
        if let Some(val) = self.db.get_setting(key)? {
            return Ok(val);
        }
        if let Some(def) = DEFAULT_SETTINGS.get(key) {
            return Ok(def.default.to_string());
        }
        anyhow::bail!("setting not found: {key}");
    }

    /// Set a setting value with validation.
    pub fn set_setting(&self, key: &str, value: &str) -> Result<(), anyhow::Error> {
        let def = DEFAULT_SETTINGS
            .get(key)
            .ok_or_else(|| anyhow::anyhow!("unknown setting key: {key}"))?;

        validate_setting(key, value)
            .map_err(|e| anyhow::anyhow!("validation error for {key}: {e}"))?;

        self.db
            .set_setting(key, value, setting_type(Some(def)).as_str())?;
        tracing::info!("Setting updated: {key}");
        Ok(())
    }

    /// Get all settings, filling in defaults for missing keys. Secret values
    /// are masked.
    pub fn get_all_settings(&self) -> Result<HashMap<String, SettingInfo>, anyhow::Error> {
        let db_settings = self.db.get_all_settings()?;
        let mut result = HashMap::new();

        for (key, def) in DEFAULT_SETTINGS.iter() {
            let value = db_settings
                .get(*key)
                .cloned()
                .unwrap_or_else(|| def.default.to_string());
            let has_value = !value.is_empty();
            let kind = setting_type(Some(def));
            result.insert(
                key.to_string(),
                SettingInfo {
                    key: key.to_string(),
                    value: if kind == SettingType::Secret && has_value {
                        MASK.to_string()
                    } else {
                        value
                    },
                    setting_type: kind,
                    required: def.required,
                    description: def.description.to_string(),
                    has_value,
                },
            );
        }

        // Keys stored by older versions are listed as-is.
        for (key, value) in db_settings {
            result.entry(key.clone()).or_insert_with(|| SettingInfo {
                key,
                has_value: !value.is_empty(),
                value,
                setting_type: SettingType::Normal,
                required: false,
                description: String::new(),
            });
        }

        Ok(result)
    }

    /// Initialize default settings in DB (skip existing).
    pub fn initialize_defaults(&self) -> Result<(), anyhow::Error> {
        for (key, def) in DEFAULT_SETTINGS.iter() {
            if self.db.get_setting(key)?.is_some() {
                continue;
            }
            self.db
                .set_setting(key, def.default, setting_type(Some(def)).as_str())?;
        }
        Ok(())
    }

    /// Migrate settings from environment variables to DB (one-time).
    ///
    /// Invalid environment values are skipped with a warning.
    pub fn migrate_from_env(&self) -> Result<u32, anyhow::Error> {
        let mut migrated = 0u32;
        for (key, def) in DEFAULT_SETTINGS.iter() {
            if self.db.get_setting(key)?.is_some() {
                continue;
            }
            let Ok(env_val) = std::env::var(key) else {
                continue;
            };
            if env_val.is_empty() {
                continue;
            }
            if let Err(e) = validate_setting(key, &env_val) {
                tracing::warn!("Ignoring env setting {key}: {e}");
                continue;
            }
            self.db
                .set_setting(key, &env_val, setting_type(Some(def)).as_str())?;
            tracing::info!("Migrated setting from env: {key}");
            migrated += 1;
        }
        if migrated > 0 {
            tracing::info!("Migration completed: {migrated} settings migrated");
            if std::env::var("STORAGE_TOKEN").is_ok_and(|v| !v.is_empty()) {
                tracing::warn!(
                    "SECURITY WARNING: Storage token in env vars. \
                     Remove from .env after confirming migration."
                );
            }
        }
        Ok(migrated)
    }

    /// Check whether photo storage is properly configured.
    pub fn check_storage_status(&self) -> Result<StorageStatus, anyhow::Error> {
        let mut status = StorageStatus {
            storage_configured: true,
            missing_settings: Vec::new(),
            warnings: Vec::new(),
        };

        if self.get_setting("STORAGE_BACKEND")? == "http" {
            if self.get_setting("STORAGE_ENDPOINT")?.is_empty() {
                status.missing_settings.push("STORAGE_ENDPOINT".into());
                status.storage_configured = false;
            }
            if self.get_setting("STORAGE_TOKEN")?.is_empty() {
                status
                    .warnings
                    .push("STORAGE_TOKEN is empty - uploads are sent unauthenticated".into());
            }
        } else {
            status
                .warnings
                .push("STORAGE_BACKEND is 'local' - photos are kept on this machine".into());
        }

        Ok(status)
    }

    pub fn db(&self) -> &Database {
        &self.db
    }
}
