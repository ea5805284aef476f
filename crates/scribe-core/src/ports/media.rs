//! Storage for uploaded binary files (post images).

use async_trait::async_trait;

#[async_trait]
pub trait MediaStorage: Send + Sync {
    /// Store `content` under `name` (a relative path such as `posts/x.gif`).
    /// Returns the name the file is reachable under.
    async fn save(&self, name: &str, content: &[u8]) -> Result<String, StorageError>;

    /// Read a stored file, `None` if nothing is stored under `name`.
    async fn open(&self, name: &str) -> Result<Option<Vec<u8>>, StorageError>;

    async fn delete(&self, name: &str) -> Result<(), StorageError>;
}

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Invalid file name: {0}")]
    InvalidName(String),

    #[error("I/O failed: {0}")]
    Io(String),
}
