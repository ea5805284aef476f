use serde::{Deserialize, Serialize};

/// Follow edge - `user_id` subscribes to posts by `author_id`.
///
/// The pair is unique; self-follows are refused by the follow service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Follow {
    pub id: i64,
    pub user_id: i64,
    pub author_id: i64,
}
