use std::path::{Path, PathBuf};

use url::Url;

use crate::{ObjectPath, ObjectStore, StorageError};

/// Object store backed by a local directory; returns `file://` URLs.
#[derive(Debug, Clone)]
pub struct LocalObjectStore {
    root: PathBuf,
}

impl LocalObjectStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Filesystem location of an object.
    pub fn object_path(&self, path: &ObjectPath) -> PathBuf {
        let mut full = self.root.clone();
        for segment in path.folder().split('/').filter(|s| !s.is_empty()) {
            full.push(segment);
        }
        full.push(path.file_name());
        full
    }
}

impl ObjectStore for LocalObjectStore {
    async fn upload(
        &self,
        bytes: Vec<u8>,
        path: &ObjectPath,
        _content_type: &str,
    ) -> Result<String, StorageError> {
        let target = self.object_path(path);
        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let size = bytes.len();
        tokio::fs::write(&target, bytes).await?;

        let absolute = tokio::fs::canonicalize(&target).await?;
        let url = Url::from_file_path(&absolute).map_err(|_| {
            StorageError::InvalidPath(format!("not an absolute path: {}", absolute.display()))
        })?;

        tracing::info!(key = %path, size, "Photo stored locally");
        Ok(url.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_root(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("photo-storage-{name}-{}", std::process::id()))
    }

    #[tokio::test]
    async fn test_upload_writes_file_and_returns_url() {
        let root = temp_root("upload");
        let store = LocalObjectStore::new(&root);
        let path = ObjectPath::new("profilePictures", "123456789012.png").unwrap();

        let url = store
            .upload(vec![1, 2, 3], &path, "image/png")
            .await
            .unwrap();

        assert!(url.starts_with("file://"));
        assert!(url.ends_with("profilePictures/123456789012.png"));
        let written = std::fs::read(store.object_path(&path)).unwrap();
        assert_eq!(written, vec![1, 2, 3]);

        let _ = std::fs::remove_dir_all(&root);
    }

    #[tokio::test]
    async fn test_upload_overwrites_existing_object() {
        let root = temp_root("overwrite");
        let store = LocalObjectStore::new(&root);
        let path = ObjectPath::new("profilePictures", "same.jpg").unwrap();

        store.upload(vec![1], &path, "image/jpeg").await.unwrap();
        store.upload(vec![9, 9], &path, "image/jpeg").await.unwrap();

        assert_eq!(std::fs::read(store.object_path(&path)).unwrap(), vec![9, 9]);
        let _ = std::fs::remove_dir_all(&root);
    }

    #[test]
    fn test_object_path_nests_folders() {
        let store = LocalObjectStore::new("/srv/photos");
        let path = ObjectPath::new("a/b", "c.jpg").unwrap();
        assert_eq!(
            store.object_path(&path),
            PathBuf::from("/srv/photos/a/b/c.jpg")
        );
    }
}
