use std::sync::Arc;

use async_trait::async_trait;

use scribe_core::domain::{Comment, CommentView, NewComment};
use scribe_core::error::RepoError;
use scribe_core::ports::{BaseRepository, CommentRepository};

use super::MemoryStore;

pub struct InMemoryCommentRepository {
    store: Arc<MemoryStore>,
}

impl InMemoryCommentRepository {
    pub fn new(store: Arc<MemoryStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl BaseRepository<Comment, i64> for InMemoryCommentRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<Comment>, RepoError> {
        Ok(self.store.tables.read().await.comments.get(&id).cloned())
    }

    async fn save(&self, comment: Comment) -> Result<Comment, RepoError> {
        let mut tables = self.store.tables.write().await;
        match tables.comments.get_mut(&comment.id) {
            Some(stored) => {
                *stored = comment.clone();
                Ok(comment)
            }
            None => Err(RepoError::NotFound),
        }
    }

    async fn delete(&self, id: i64) -> Result<(), RepoError> {
        match self.store.tables.write().await.comments.remove(&id) {
            Some(_) => Ok(()),
            None => Err(RepoError::NotFound),
        }
    }
}

#[async_trait]
impl CommentRepository for InMemoryCommentRepository {
    async fn create(&self, comment: NewComment) -> Result<Comment, RepoError> {
        let mut tables = self.store.tables.write().await;
        if !tables.posts.contains_key(&comment.post_id) {
            return Err(RepoError::Constraint(format!(
                "post {} does not exist",
                comment.post_id
            )));
        }
        if !tables.users.contains_key(&comment.author_id) {
            return Err(RepoError::Constraint(format!(
                "author {} does not exist",
                comment.author_id
            )));
        }

        let comment = Comment {
            id: tables.next_id(),
            post_id: comment.post_id,
            author_id: comment.author_id,
            text: comment.text,
            created: comment.created,
        };
        tables.comments.insert(comment.id, comment.clone());
        Ok(comment)
    }

    async fn list_for_post(&self, post_id: i64) -> Result<Vec<CommentView>, RepoError> {
        let tables = self.store.tables.read().await;
        let mut comments: Vec<&Comment> = tables
            .comments
            .values()
            .filter(|c| c.post_id == post_id)
            .collect();
        comments.sort_by_key(|c| (c.created, c.id));

        comments
            .into_iter()
            .map(|c| {
                Ok(CommentView {
                    comment: c.clone(),
                    author: tables.author(c.author_id)?,
                })
            })
            .collect()
    }
}
