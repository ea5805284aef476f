//! Domain entities - the core business objects.

mod comment;
mod follow;
mod group;
mod post;
mod user;

pub use comment::{Comment, CommentView, NewComment};
pub use follow::Follow;
pub use group::{Group, GroupRef, NewGroup};
pub use post::{FeedScope, NewPost, Post, PostView, SHORT_TEXT_LEN};
pub use user::{AuthorRef, NewUser, User};
