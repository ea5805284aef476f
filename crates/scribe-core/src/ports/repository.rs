use async_trait::async_trait;

use crate::domain::{
    Comment, CommentView, FeedScope, Group, NewComment, NewGroup, NewPost, NewUser, Post,
    PostView, User,
};
use crate::error::RepoError;

/// Generic repository trait defining standard CRUD operations.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Persist changes to an existing entity.
    async fn save(&self, entity: T) -> Result<T, RepoError>;

    /// Delete an entity by its ID.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// User repository with domain-specific methods.
#[async_trait]
pub trait UserRepository: BaseRepository<User, i64> {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError>;

    /// Fails with `RepoError::Constraint` when the username is taken.
    async fn create(&self, user: NewUser) -> Result<User, RepoError>;
}

#[async_trait]
pub trait GroupRepository: BaseRepository<Group, i64> {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Group>, RepoError>;

    /// All groups, ordered by title.
    async fn list(&self) -> Result<Vec<Group>, RepoError>;

    /// Fails with `RepoError::Constraint` when the slug is taken.
    async fn create(&self, group: NewGroup) -> Result<Group, RepoError>;
}

/// Post repository.
///
/// Listings are ordered by `pub_date` descending, then id descending.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, i64> {
    async fn create(&self, post: NewPost) -> Result<Post, RepoError>;

    /// A single post joined with its author and group.
    async fn find_view(&self, id: i64) -> Result<Option<PostView>, RepoError>;

    async fn count(&self, scope: FeedScope) -> Result<u64, RepoError>;

    async fn list(
        &self,
        scope: FeedScope,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<PostView>, RepoError>;
}

#[async_trait]
pub trait CommentRepository: BaseRepository<Comment, i64> {
    async fn create(&self, comment: NewComment) -> Result<Comment, RepoError>;

    /// Comments on a post, oldest first.
    async fn list_for_post(&self, post_id: i64) -> Result<Vec<CommentView>, RepoError>;
}

/// Storage of follow edges. The (user, author) pair is unique.
#[async_trait]
pub trait FollowRepository: Send + Sync {
    /// Insert the edge unless it already exists. Returns whether a row was created.
    async fn insert_if_absent(&self, user_id: i64, author_id: i64) -> Result<bool, RepoError>;

    /// Remove the edge. Returns whether a row was removed.
    async fn remove(&self, user_id: i64, author_id: i64) -> Result<bool, RepoError>;

    async fn exists(&self, user_id: i64, author_id: i64) -> Result<bool, RepoError>;
}
