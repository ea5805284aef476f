use std::collections::{BTreeMap, BTreeSet};

use tokio::sync::RwLock;

use scribe_core::domain::{AuthorRef, Comment, Group, Post, User};
use scribe_core::error::RepoError;

#[derive(Default)]
pub(crate) struct Tables {
    pub users: BTreeMap<i64, User>,
    pub groups: BTreeMap<i64, Group>,
    pub posts: BTreeMap<i64, Post>,
    pub comments: BTreeMap<i64, Comment>,
    /// (user_id, author_id)
    pub follows: BTreeSet<(i64, i64)>,
    last_id: i64,
}

impl Tables {
    /// Ids are unique across tables, which keeps them strictly increasing
    /// per table as well.
    pub fn next_id(&mut self) -> i64 {
        self.last_id += 1;
        self.last_id
    }

    pub fn author(&self, user_id: i64) -> Result<AuthorRef, RepoError> {
        self.users
            .get(&user_id)
            .map(User::as_author)
            .ok_or_else(|| RepoError::Query(format!("user {user_id} does not exist")))
    }

    pub fn delete_user(&mut self, user_id: i64) -> bool {
        if self.users.remove(&user_id).is_none() {
            return false;
        }
        let post_ids: Vec<i64> = self
            .posts
            .values()
            .filter(|p| p.author_id == user_id)
            .map(|p| p.id)
            .collect();
        for post_id in post_ids {
            self.delete_post(post_id);
        }
        self.comments.retain(|_, c| c.author_id != user_id);
        self.follows
            .retain(|&(user, author)| user != user_id && author != user_id);
        true
    }

    pub fn delete_post(&mut self, post_id: i64) -> bool {
        if self.posts.remove(&post_id).is_none() {
            return false;
        }
        self.comments.retain(|_, c| c.post_id != post_id);
        true
    }

    /// Posts of a deleted group lose their group but survive.
    pub fn delete_group(&mut self, group_id: i64) -> bool {
        if self.groups.remove(&group_id).is_none() {
            return false;
        }
        for post in self.posts.values_mut() {
            if post.group_id == Some(group_id) {
                post.group_id = None;
            }
        }
        true
    }
}

/// Shared state behind the in-memory repositories.
#[derive(Default)]
pub struct MemoryStore {
    pub(crate) tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}
