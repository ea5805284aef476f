//! PostgreSQL repository implementations.

use std::collections::HashMap;

use async_trait::async_trait;
use sea_orm::sea_query::{OnConflict, Query};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DbConn, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Select, Set,
};

use scribe_core::domain::{
    Comment, CommentView, FeedScope, Group, GroupRef, NewComment, NewGroup, NewPost, NewUser,
    Post, PostView, User,
};
use scribe_core::error::RepoError;
use scribe_core::ports::{
    CommentRepository, FollowRepository, GroupRepository, PostRepository, UserRepository,
};

use super::entity::comment::{self, Entity as CommentEntity};
use super::entity::follow::{self, Entity as FollowEntity};
use super::entity::group::{self, Entity as GroupEntity};
use super::entity::post::{self, Entity as PostEntity};
use super::entity::user::{self, Entity as UserEntity};
use super::postgres_base::{PostgresBaseRepository, map_db_err};

/// PostgreSQL user repository.
pub type PostgresUserRepository = PostgresBaseRepository<UserEntity>;

/// PostgreSQL group repository.
pub type PostgresGroupRepository = PostgresBaseRepository<GroupEntity>;

/// PostgreSQL post repository.
pub type PostgresPostRepository = PostgresBaseRepository<PostEntity>;

/// PostgreSQL comment repository.
pub type PostgresCommentRepository = PostgresBaseRepository<CommentEntity>;

/// PostgreSQL follow-edge repository.
pub type PostgresFollowRepository = PostgresBaseRepository<FollowEntity>;

fn author_of(user: Option<user::Model>, post_id: i64) -> Result<scribe_core::domain::AuthorRef, RepoError> {
    user.map(|u| User::from(u).as_author())
        .ok_or_else(|| RepoError::Query(format!("post {post_id} has no author row")))
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        tracing::debug!(username, "Finding user by username");

        let result = UserEntity::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }

    async fn create(&self, user: NewUser) -> Result<User, RepoError> {
        let model = user::ActiveModel::from(user)
            .insert(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(model.into())
    }
}

#[async_trait]
impl GroupRepository for PostgresGroupRepository {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Group>, RepoError> {
        let result = GroupEntity::find()
            .filter(group::Column::Slug.eq(slug))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }

    async fn list(&self) -> Result<Vec<Group>, RepoError> {
        let result = GroupEntity::find()
            .order_by_asc(group::Column::Title)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn create(&self, group: NewGroup) -> Result<Group, RepoError> {
        let model = group::ActiveModel::from(group)
            .insert(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(model.into())
    }
}

/// Base query for the posts visible in a feed scope.
fn scoped(scope: FeedScope) -> Select<PostEntity> {
    let query = PostEntity::find();
    match scope {
        FeedScope::All => query,
        FeedScope::Group(group_id) => query.filter(post::Column::GroupId.eq(group_id)),
        FeedScope::Author(author_id) => query.filter(post::Column::AuthorId.eq(author_id)),
        FeedScope::FollowedBy(user_id) => query.filter(
            post::Column::AuthorId.in_subquery(
                Query::select()
                    .column(follow::Column::AuthorId)
                    .from(FollowEntity)
                    .and_where(follow::Column::UserId.eq(user_id))
                    .to_owned(),
            ),
        ),
    }
}

async fn group_refs(db: &DbConn, ids: Vec<i64>) -> Result<HashMap<i64, GroupRef>, RepoError> {
    if ids.is_empty() {
        return Ok(HashMap::new());
    }

    let groups = GroupEntity::find()
        .filter(group::Column::Id.is_in(ids))
        .all(db)
        .await
        .map_err(map_db_err)?;

    Ok(groups
        .into_iter()
        .map(|g| (g.id, Group::from(g).to_ref()))
        .collect())
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn create(&self, post: NewPost) -> Result<Post, RepoError> {
        let model = post::ActiveModel::from(post)
            .insert(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(model.into())
    }

    async fn find_view(&self, id: i64) -> Result<Option<PostView>, RepoError> {
        let Some((post, author)) = PostEntity::find_by_id(id)
            .find_also_related(UserEntity)
            .one(&self.db)
            .await
            .map_err(map_db_err)?
        else {
            return Ok(None);
        };

        let mut groups = group_refs(&self.db, post.group_id.into_iter().collect()).await?;
        let group = post.group_id.and_then(|id| groups.remove(&id));

        Ok(Some(PostView {
            author: author_of(author, post.id)?,
            group,
            post: post.into(),
        }))
    }

    async fn count(&self, scope: FeedScope) -> Result<u64, RepoError> {
        scoped(scope).count(&self.db).await.map_err(map_db_err)
    }

    async fn list(
        &self,
        scope: FeedScope,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<PostView>, RepoError> {
        let rows = scoped(scope)
            .find_also_related(UserEntity)
            .order_by_desc(post::Column::PubDate)
            .order_by_desc(post::Column::Id)
            .offset(offset)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        let group_ids = rows.iter().filter_map(|(p, _)| p.group_id).collect();
        let groups = group_refs(&self.db, group_ids).await?;

        rows.into_iter()
            .map(|(post, author)| {
                Ok(PostView {
                    author: author_of(author, post.id)?,
                    group: post.group_id.and_then(|id| groups.get(&id).cloned()),
                    post: post.into(),
                })
            })
            .collect()
    }
}

#[async_trait]
impl CommentRepository for PostgresCommentRepository {
    async fn create(&self, comment: NewComment) -> Result<Comment, RepoError> {
        let model = comment::ActiveModel::from(comment)
            .insert(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(model.into())
    }

    async fn list_for_post(&self, post_id: i64) -> Result<Vec<CommentView>, RepoError> {
        let rows = CommentEntity::find()
            .filter(comment::Column::PostId.eq(post_id))
            .find_also_related(UserEntity)
            .order_by_asc(comment::Column::Created)
            .order_by_asc(comment::Column::Id)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        rows.into_iter()
            .map(|(comment, author)| {
                let author = author
                    .map(|u| User::from(u).as_author())
                    .ok_or_else(|| {
                        RepoError::Query(format!("comment {} has no author row", comment.id))
                    })?;
                Ok(CommentView {
                    comment: comment.into(),
                    author,
                })
            })
            .collect()
    }
}

#[async_trait]
impl FollowRepository for PostgresFollowRepository {
    async fn insert_if_absent(&self, user_id: i64, author_id: i64) -> Result<bool, RepoError> {
        let edge = follow::ActiveModel {
            user_id: Set(user_id),
            author_id: Set(author_id),
            ..Default::default()
        };

        let inserted = FollowEntity::insert(edge)
            .on_conflict(
                OnConflict::columns([follow::Column::UserId, follow::Column::AuthorId])
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(inserted > 0)
    }

    async fn remove(&self, user_id: i64, author_id: i64) -> Result<bool, RepoError> {
        let result = FollowEntity::delete_many()
            .filter(follow::Column::UserId.eq(user_id))
            .filter(follow::Column::AuthorId.eq(author_id))
            .exec(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.rows_affected > 0)
    }

    async fn exists(&self, user_id: i64, author_id: i64) -> Result<bool, RepoError> {
        let count = FollowEntity::find()
            .filter(follow::Column::UserId.eq(user_id))
            .filter(follow::Column::AuthorId.eq(author_id))
            .count(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(count > 0)
    }
}
