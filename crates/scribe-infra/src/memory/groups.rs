use std::sync::Arc;

use async_trait::async_trait;

use scribe_core::domain::{Group, NewGroup};
use scribe_core::error::RepoError;
use scribe_core::ports::{BaseRepository, GroupRepository};

use super::MemoryStore;

pub struct InMemoryGroupRepository {
    store: Arc<MemoryStore>,
}

impl InMemoryGroupRepository {
    pub fn new(store: Arc<MemoryStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl BaseRepository<Group, i64> for InMemoryGroupRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<Group>, RepoError> {
        Ok(self.store.tables.read().await.groups.get(&id).cloned())
    }

    async fn save(&self, group: Group) -> Result<Group, RepoError> {
        let mut tables = self.store.tables.write().await;
        if tables
            .groups
            .values()
            .any(|g| g.id != group.id && g.slug == group.slug)
        {
            return Err(RepoError::Constraint("slug already taken".to_string()));
        }
        match tables.groups.get_mut(&group.id) {
            Some(stored) => {
                *stored = group.clone();
                Ok(group)
            }
            None => Err(RepoError::NotFound),
        }
    }

    async fn delete(&self, id: i64) -> Result<(), RepoError> {
        if self.store.tables.write().await.delete_group(id) {
            Ok(())
        } else {
            Err(RepoError::NotFound)
        }
    }
}

#[async_trait]
impl GroupRepository for InMemoryGroupRepository {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Group>, RepoError> {
        let tables = self.store.tables.read().await;
        Ok(tables.groups.values().find(|g| g.slug == slug).cloned())
    }

    async fn list(&self) -> Result<Vec<Group>, RepoError> {
        let mut groups: Vec<Group> = self
            .store
            .tables
            .read()
            .await
            .groups
            .values()
            .cloned()
            .collect();
        groups.sort_by(|a, b| a.title.cmp(&b.title).then(a.id.cmp(&b.id)));
        Ok(groups)
    }

    async fn create(&self, group: NewGroup) -> Result<Group, RepoError> {
        let mut tables = self.store.tables.write().await;
        if tables.groups.values().any(|g| g.slug == group.slug) {
            return Err(RepoError::Constraint("slug already taken".to_string()));
        }

        let group = Group {
            id: tables.next_id(),
            title: group.title,
            slug: group.slug,
            description: group.description,
        };
        tables.groups.insert(group.id, group.clone());
        Ok(group)
    }
}
