//! Runtime application configuration loaded from DB + environment overrides.

use photo_engine::{CompressOptions, PhotoError, TargetDimensions};
use registration_form::{FormError, IdentityLength};

use super::manager::SettingsManager;
use super::validation::validate_setting;

/// Where uploaded photos go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    /// A directory under the data dir.
    Local,
    /// An HTTP object store at `storage_endpoint`.
    Http,
}

/// Runtime configuration populated from the settings DB.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub photo_width: u32,
    pub photo_height: u32,
    pub photo_max_size_kb: usize,
    pub photo_max_dimension: u32,
    pub photo_folder: String,
    pub storage_backend: StorageBackend,
    pub storage_endpoint: String,
    pub storage_public_base_url: String,
    pub storage_token: String,
    pub aadhaar_length: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            photo_width: photo_engine::PROFILE_PHOTO_WIDTH,
            photo_height: photo_engine::PROFILE_PHOTO_HEIGHT,
            photo_max_size_kb: 100,
            photo_max_dimension: 800,
            photo_folder: "profilePictures".into(),
            storage_backend: StorageBackend::Local,
            storage_endpoint: String::new(),
            storage_public_base_url: String::new(),
            storage_token: String::new(),
            aadhaar_length: 12,
        }
    }
}

impl AppConfig {
    /// Load configuration from the settings manager (DB-first, env overrides).
    pub fn load(sm: &SettingsManager) -> Result<Self, anyhow::Error> {
        let g = |key: &str| -> String { sm.get_setting(key).unwrap_or_default() };
        let defaults = Self::default();

        let backend = backend_override(std::env::var("STORAGE_BACKEND").ok())
            .unwrap_or_else(|| g("STORAGE_BACKEND"));

        Ok(Self {
            photo_width: parse_or(&g("PHOTO_WIDTH"), defaults.photo_width),
            photo_height: parse_or(&g("PHOTO_HEIGHT"), defaults.photo_height),
            photo_max_size_kb: parse_or(&g("PHOTO_MAX_SIZE_KB"), defaults.photo_max_size_kb),
            photo_max_dimension: parse_or(&g("PHOTO_MAX_DIMENSION"), defaults.photo_max_dimension),
            photo_folder: {
                let f = g("PHOTO_FOLDER");
                if f.is_empty() { defaults.photo_folder } else { f }
            },
            storage_backend: if backend == "http" {
                StorageBackend::Http
            } else {
                StorageBackend::Local
            },
            storage_endpoint: g("STORAGE_ENDPOINT"),
            storage_public_base_url: g("STORAGE_PUBLIC_BASE_URL"),
            storage_token: g("STORAGE_TOKEN"),
            aadhaar_length: parse_or(&g("AADHAAR_LENGTH"), defaults.aadhaar_length),
        })
    }

    /// Size every stored photo is fitted to.
    pub fn photo_target(&self) -> Result<TargetDimensions, PhotoError> {
        TargetDimensions::new(self.photo_width, self.photo_height)
    }

    pub fn compress_options(&self) -> CompressOptions {
        CompressOptions::new()
            .with_max_size_kb(self.photo_max_size_kb)
            .with_max_dimension(self.photo_max_dimension)
    }

    pub fn identity_length(&self) -> Result<IdentityLength, FormError> {
        IdentityLength::from_digits(self.aadhaar_length)
    }
}

/// STORAGE_BACKEND from the environment wins over the stored value for
/// one-off runs. Invalid values are ignored with a warning.
fn backend_override(env: Option<String>) -> Option<String> {
    let value = env.filter(|v| !v.is_empty())?;
    match validate_setting("STORAGE_BACKEND", &value) {
        Ok(()) => Some(value),
        Err(e) => {
            tracing::warn!("Ignoring STORAGE_BACKEND from env: {e}");
            None
        }
    }
}

fn parse_or<T: std::str::FromStr>(s: &str, default: T) -> T {
    if s.is_empty() {
        return default;
    }
    s.parse().unwrap_or(default)
}
