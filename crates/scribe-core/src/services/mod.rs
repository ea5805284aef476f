//! Services built on top of the ports.

mod feed;
mod follow;

pub use feed::FeedService;
pub use follow::{FollowOutcome, FollowService, UnfollowOutcome};
