use std::sync::Arc;

use crate::error::DomainError;
use crate::ports::FollowRepository;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowOutcome {
    Created,
    AlreadyFollowing,
    /// Following yourself is silently ignored.
    SelfFollow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnfollowOutcome {
    Removed,
    SelfFollow,
}

/// Toggles follow edges between users.
#[derive(Clone)]
pub struct FollowService {
    follows: Arc<dyn FollowRepository>,
}

impl FollowService {
    pub fn new(follows: Arc<dyn FollowRepository>) -> Self {
        Self { follows }
    }

    pub async fn follow(&self, user_id: i64, author_id: i64) -> Result<FollowOutcome, DomainError> {
        if user_id == author_id {
            return Ok(FollowOutcome::SelfFollow);
        }

        if self.follows.insert_if_absent(user_id, author_id).await? {
            tracing::info!(user_id, author_id, "Follow created");
            Ok(FollowOutcome::Created)
        } else {
            Ok(FollowOutcome::AlreadyFollowing)
        }
    }

    /// Fails with `NotFound` when `user_id` does not follow `author_id`.
    pub async fn unfollow(
        &self,
        user_id: i64,
        author_id: i64,
    ) -> Result<UnfollowOutcome, DomainError> {
        if user_id == author_id {
            return Ok(UnfollowOutcome::SelfFollow);
        }

        if self.follows.remove(user_id, author_id).await? {
            tracing::info!(user_id, author_id, "Follow removed");
            Ok(UnfollowOutcome::Removed)
        } else {
            Err(DomainError::not_found(
                "follow",
                format!("{user_id}->{author_id}"),
            ))
        }
    }

    /// Anonymous viewers follow nobody.
    pub async fn is_following(
        &self,
        user_id: Option<i64>,
        author_id: i64,
    ) -> Result<bool, DomainError> {
        match user_id {
            Some(user_id) => Ok(self.follows.exists(user_id, author_id).await?),
            None => Ok(false),
        }
    }
}
