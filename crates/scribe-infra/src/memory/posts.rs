use std::cmp::Reverse;
use std::sync::Arc;

use async_trait::async_trait;

use scribe_core::domain::{FeedScope, NewPost, Post, PostView};
use scribe_core::error::RepoError;
use scribe_core::ports::{BaseRepository, PostRepository};

use super::MemoryStore;
use super::store::Tables;

pub struct InMemoryPostRepository {
    store: Arc<MemoryStore>,
}

impl InMemoryPostRepository {
    pub fn new(store: Arc<MemoryStore>) -> Self {
        Self { store }
    }
}

fn in_scope(tables: &Tables, scope: FeedScope, post: &Post) -> bool {
    match scope {
        FeedScope::All => true,
        FeedScope::Group(group_id) => post.group_id == Some(group_id),
        FeedScope::Author(author_id) => post.author_id == author_id,
        FeedScope::FollowedBy(user_id) => tables.follows.contains(&(user_id, post.author_id)),
    }
}

fn view(tables: &Tables, post: &Post) -> Result<PostView, RepoError> {
    Ok(PostView {
        post: post.clone(),
        author: tables.author(post.author_id)?,
        group: post
            .group_id
            .and_then(|id| tables.groups.get(&id))
            .map(|g| g.to_ref()),
    })
}

fn check_references(tables: &Tables, author_id: i64, group_id: Option<i64>) -> Result<(), RepoError> {
    if !tables.users.contains_key(&author_id) {
        return Err(RepoError::Constraint(format!("author {author_id} does not exist")));
    }
    match group_id {
        Some(group_id) if !tables.groups.contains_key(&group_id) => Err(RepoError::Constraint(
            format!("group {group_id} does not exist"),
        )),
        _ => Ok(()),
    }
}

#[async_trait]
impl BaseRepository<Post, i64> for InMemoryPostRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<Post>, RepoError> {
        Ok(self.store.tables.read().await.posts.get(&id).cloned())
    }

    async fn save(&self, post: Post) -> Result<Post, RepoError> {
        let mut tables = self.store.tables.write().await;
        check_references(&tables, post.author_id, post.group_id)?;
        match tables.posts.get_mut(&post.id) {
            Some(stored) => {
                *stored = post.clone();
                Ok(post)
            }
            None => Err(RepoError::NotFound),
        }
    }

    async fn delete(&self, id: i64) -> Result<(), RepoError> {
        if self.store.tables.write().await.delete_post(id) {
            Ok(())
        } else {
            Err(RepoError::NotFound)
        }
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn create(&self, post: NewPost) -> Result<Post, RepoError> {
        let mut tables = self.store.tables.write().await;
        check_references(&tables, post.author_id, post.group_id)?;

        let post = Post {
            id: tables.next_id(),
            text: post.text,
            pub_date: post.pub_date,
            image: post.image,
            author_id: post.author_id,
            group_id: post.group_id,
        };
        tables.posts.insert(post.id, post.clone());
        Ok(post)
    }

    async fn find_view(&self, id: i64) -> Result<Option<PostView>, RepoError> {
        let tables = self.store.tables.read().await;
        tables.posts.get(&id).map(|post| view(&tables, post)).transpose()
    }

    async fn count(&self, scope: FeedScope) -> Result<u64, RepoError> {
        let tables = self.store.tables.read().await;
        Ok(tables
            .posts
            .values()
            .filter(|post| in_scope(&tables, scope, post))
            .count() as u64)
    }

    async fn list(
        &self,
        scope: FeedScope,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<PostView>, RepoError> {
        let tables = self.store.tables.read().await;
        let mut posts: Vec<&Post> = tables
            .posts
            .values()
            .filter(|post| in_scope(&tables, scope, post))
            .collect();
        posts.sort_by_key(|post| Reverse((post.pub_date, post.id)));

        posts
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .map(|post| view(&tables, post))
            .collect()
    }
}
