//! Photo storage backend selected from configuration.

use std::path::Path;

use photo_storage::{HttpObjectStore, LocalObjectStore, ObjectPath, ObjectStore, StorageError};

use crate::config::{AppConfig, StorageBackend};

/// Directory under the data dir used by the local backend.
const LOCAL_STORAGE_DIR: &str = "storage";

pub enum PhotoStore {
    Local(LocalObjectStore),
    Http(HttpObjectStore),
}

impl PhotoStore {
    /// Build the configured backend. The local backend writes under `data_dir`.
    pub fn from_config(config: &AppConfig, data_dir: &Path) -> Result<Self, StorageError> {
        match config.storage_backend {
            StorageBackend::Local => {
                let root = data_dir.join(LOCAL_STORAGE_DIR);
                tracing::info!("Using local photo storage at {}", root.display());
                Ok(Self::Local(LocalObjectStore::new(root)))
            }
            StorageBackend::Http => {
                if config.storage_endpoint.is_empty() {
                    return Err(StorageError::InvalidPath(
                        "STORAGE_ENDPOINT is required for the http backend".into(),
                    ));
                }
                let mut store = HttpObjectStore::new(&config.storage_endpoint)?
                    .with_token(config.storage_token.as_str());
                if !config.storage_public_base_url.is_empty() {
                    store = store.with_public_base(&config.storage_public_base_url)?;
                }
                tracing::info!(endpoint = %config.storage_endpoint, "Using HTTP photo storage");
                Ok(Self::Http(store))
            }
        }
    }
}

impl ObjectStore for PhotoStore {
    async fn upload(
        &self,
        bytes: Vec<u8>,
        path: &ObjectPath,
        content_type: &str,
    ) -> Result<String, StorageError> {
        match self {
            Self::Local(store) => store.upload(bytes, path, content_type).await,
            Self::Http(store) => store.upload(bytes, path, content_type).await,
        }
    }
}
