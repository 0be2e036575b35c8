//! Registration services: record store seam, photo processing and storage,
//! and the submission flow.

pub mod photo;
pub mod records;
pub mod registrar;
pub mod storage;

use std::path::Path;

use member_db::Database;

use crate::config::AppConfig;
use photo::PhotoProcessor;
use registrar::Registrar;
use storage::PhotoStore;

/// Registrar wired to the SQLite database and the configured photo store.
pub fn build_registrar(
    db: Database,
    config: &AppConfig,
    data_dir: &Path,
) -> Result<Registrar<Database, PhotoStore>, anyhow::Error> {
    let processor = PhotoProcessor::new(config.photo_target()?, config.compress_options());
    let storage = PhotoStore::from_config(config, data_dir)?;
    Ok(Registrar::new(
        db,
        storage,
        processor,
        config.photo_folder.clone(),
    ))
}
