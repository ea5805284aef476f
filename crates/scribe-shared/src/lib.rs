//! # Scribe Shared
//!
//! Wire types shared by the server and its clients: page contexts, entity
//! views and RFC 7807 problem details.

pub mod dto;
pub mod response;

pub use response::ErrorResponse;
