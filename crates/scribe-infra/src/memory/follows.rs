use std::sync::Arc;

use async_trait::async_trait;

use scribe_core::error::RepoError;
use scribe_core::ports::FollowRepository;

use super::MemoryStore;

pub struct InMemoryFollowRepository {
    store: Arc<MemoryStore>,
}

impl InMemoryFollowRepository {
    pub fn new(store: Arc<MemoryStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl FollowRepository for InMemoryFollowRepository {
    async fn insert_if_absent(&self, user_id: i64, author_id: i64) -> Result<bool, RepoError> {
        let mut tables = self.store.tables.write().await;
        for id in [user_id, author_id] {
            if !tables.users.contains_key(&id) {
                return Err(RepoError::Constraint(format!("user {id} does not exist")));
            }
        }
        Ok(tables.follows.insert((user_id, author_id)))
    }

    async fn remove(&self, user_id: i64, author_id: i64) -> Result<bool, RepoError> {
        Ok(self
            .store
            .tables
            .write()
            .await
            .follows
            .remove(&(user_id, author_id)))
    }

    async fn exists(&self, user_id: i64, author_id: i64) -> Result<bool, RepoError> {
        Ok(self
            .store
            .tables
            .read()
            .await
            .follows
            .contains(&(user_id, author_id)))
    }
}
