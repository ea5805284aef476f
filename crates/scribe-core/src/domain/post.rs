use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::group::GroupRef;
use super::user::AuthorRef;

/// Number of characters a post shows when displayed as a short label.
pub const SHORT_TEXT_LEN: usize = 15;

/// Post entity - an authored text record, optionally grouped and illustrated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: i64,
    pub text: String,
    /// Set once at creation.
    pub pub_date: DateTime<Utc>,
    /// Storage name of the attached image, e.g. `posts/3f2c...e1.gif`.
    pub image: Option<String>,
    pub author_id: i64,
    pub group_id: Option<i64>,
}

impl Post {
    pub fn is_authored_by(&self, user_id: i64) -> bool {
        self.author_id == user_id
    }

    pub fn short_text(&self) -> String {
        self.text.chars().take(SHORT_TEXT_LEN).collect()
    }
}

/// A post that has not been persisted yet.
#[derive(Debug, Clone)]
pub struct NewPost {
    pub text: String,
    pub author_id: i64,
    pub group_id: Option<i64>,
    pub image: Option<String>,
    pub pub_date: DateTime<Utc>,
}

/// A post joined with its author and group, as shown in listings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostView {
    pub post: Post,
    pub author: AuthorRef,
    pub group: Option<GroupRef>,
}

/// Which posts a feed lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedScope {
    All,
    Group(i64),
    Author(i64),
    /// Posts by every author the given user follows.
    FollowedBy(i64),
}
