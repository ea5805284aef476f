use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;

use scribe_core::ports::{MediaStorage, StorageError};

use super::check_name;

/// Stores uploads as files under a root directory.
pub struct LocalMediaStorage {
    root: PathBuf,
}

impl LocalMediaStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path_for(&self, name: &str) -> Result<PathBuf, StorageError> {
        check_name(name)?;
        Ok(self.root.join(name))
    }
}

#[async_trait]
impl MediaStorage for LocalMediaStorage {
    async fn save(&self, name: &str, content: &[u8]) -> Result<String, StorageError> {
        let path = self.path_for(name)?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| StorageError::Io(e.to_string()))?;
        }
        tokio::fs::write(&path, content)
            .await
            .map_err(|e| StorageError::Io(e.to_string()))?;

        tracing::debug!(file = %path.display(), bytes = content.len(), "Media file stored");
        Ok(name.to_string())
    }

    async fn open(&self, name: &str) -> Result<Option<Vec<u8>>, StorageError> {
        let path = self.path_for(name)?;
        // Directories and other non-files are not media.
        match tokio::fs::metadata(&path).await {
            Ok(meta) if meta.is_file() => {}
            Ok(_) => return Ok(None),
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StorageError::Io(e.to_string())),
        }

        match tokio::fs::read(&path).await {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::Io(e.to_string())),
        }
    }

    async fn delete(&self, name: &str) -> Result<(), StorageError> {
        let path = self.path_for(name)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::Io(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_save_open_delete() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalMediaStorage::new(dir.path());

        let name = storage.save("posts/small.gif", b"GIF89a").await.unwrap();
        assert_eq!(name, "posts/small.gif");
        assert!(dir.path().join("posts/small.gif").exists());
        assert_eq!(
            storage.open("posts/small.gif").await.unwrap().as_deref(),
            Some(&b"GIF89a"[..])
        );

        storage.delete("posts/small.gif").await.unwrap();
        assert_eq!(storage.open("posts/small.gif").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_directory_is_not_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalMediaStorage::new(dir.path());
        storage.save("posts/small.gif", b"GIF89a").await.unwrap();

        assert_eq!(storage.open("posts").await.unwrap(), None);
        assert_eq!(storage.open("posts/missing.gif").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_rejects_traversal() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalMediaStorage::new(dir.path());

        let err = storage.save("../escape.gif", b"x").await.unwrap_err();
        assert!(matches!(err, StorageError::InvalidName(_)));
    }
}
