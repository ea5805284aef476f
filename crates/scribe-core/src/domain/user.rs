use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// User entity - an account that authors posts and comments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: Option<String>,
    pub password_hash: String,
    pub date_joined: DateTime<Utc>,
}

impl User {
    /// The public part of the user, as joined into listings.
    pub fn as_author(&self) -> AuthorRef {
        AuthorRef {
            id: self.id,
            username: self.username.clone(),
        }
    }
}

/// A user that has not been persisted yet.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: Option<String>,
    pub password_hash: String,
    pub date_joined: DateTime<Utc>,
}

impl NewUser {
    pub fn new(
        username: String,
        email: Option<String>,
        password_hash: String,
        date_joined: DateTime<Utc>,
    ) -> Self {
        Self {
            username,
            email,
            password_hash,
            date_joined,
        }
    }
}

/// Author columns joined onto posts and comments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorRef {
    pub id: i64,
    pub username: String,
}
