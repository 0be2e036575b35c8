use std::path::PathBuf;

use member_db::Database;

use crate::config::{AppConfig, SettingsManager};

/// Determine the data directory for the application.
/// Priority: MEMBER_REGISTRATION_DATA_DIR env var > ~/.member-registration
pub fn data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("MEMBER_REGISTRATION_DATA_DIR") {
        return PathBuf::from(dir);
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".member-registration")
}

/// Load .env from multiple candidate paths.
fn load_dotenv() {
    let candidates = [".env", "../.env"];
    for path in &candidates {
        if dotenvy::from_filename(path).is_ok() {
            tracing::info!("Loaded .env from: {path}");
            return;
        }
    }
    tracing::info!("No .env file found, using system environment variables");
}

/// Open the DB, migrate and seed settings, load config (fatal on error).
pub fn init_foundation() -> Result<(Database, AppConfig, PathBuf), anyhow::Error> {
    load_dotenv();
    let dir = data_dir();
    std::fs::create_dir_all(&dir)?;

    let db_path = dir.join("registrations.db");
    tracing::info!("Opening database at {}", db_path.display());
    let db = Database::open(&db_path)?;

    let sm = SettingsManager::new(db.clone());
    if let Err(e) = sm.migrate_from_env() {
        tracing::error!("Failed to migrate from env: {e}");
    }
    sm.initialize_defaults()?;

    let config = AppConfig::load(&sm)?;

    if let Ok(status) = sm.check_storage_status() {
        if !status.missing_settings.is_empty() {
            tracing::warn!(
                "Missing settings: {:?}, warnings: {:?}",
                status.missing_settings,
                status.warnings
            );
        } else {
            for warning in &status.warnings {
                tracing::debug!("{warning}");
            }
        }
    }

    tracing::info!(
        "Settings loaded (photo={}x{}, folder={})",
        config.photo_width,
        config.photo_height,
        config.photo_folder
    );
    Ok((db, config, dir))
}
