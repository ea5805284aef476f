use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use scribe_core::ports::{MediaStorage, StorageError};

use super::check_name;

/// Keeps uploads in process memory.
#[derive(Default)]
pub struct InMemoryMediaStorage {
    files: RwLock<HashMap<String, Vec<u8>>>,
}

impl InMemoryMediaStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MediaStorage for InMemoryMediaStorage {
    async fn save(&self, name: &str, content: &[u8]) -> Result<String, StorageError> {
        check_name(name)?;
        self.files
            .write()
            .await
            .insert(name.to_string(), content.to_vec());
        Ok(name.to_string())
    }

    async fn open(&self, name: &str) -> Result<Option<Vec<u8>>, StorageError> {
        check_name(name)?;
        Ok(self.files.read().await.get(name).cloned())
    }

    async fn delete(&self, name: &str) -> Result<(), StorageError> {
        check_name(name)?;
        self.files.write().await.remove(name);
        Ok(())
    }
}
