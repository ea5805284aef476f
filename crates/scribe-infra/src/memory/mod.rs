//! In-memory repositories - used when no database is configured, and in tests.
//!
//! All repositories share one [`MemoryStore`] so joins, cascades and unique
//! constraints behave like the relational schema.

mod comments;
mod follows;
mod groups;
mod posts;
mod store;
mod users;

pub use comments::InMemoryCommentRepository;
pub use follows::InMemoryFollowRepository;
pub use groups::InMemoryGroupRepository;
pub use posts::InMemoryPostRepository;
pub use store::MemoryStore;
pub use users::InMemoryUserRepository;
