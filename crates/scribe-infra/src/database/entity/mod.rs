//! SeaORM entities for the blogging schema.

pub mod comment;
pub mod follow;
pub mod group;
pub mod post;
pub mod user;
