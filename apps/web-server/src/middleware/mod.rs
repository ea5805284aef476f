//! Middleware and request extractors.

pub mod auth;
pub mod error;
pub mod page_cache;
pub mod request_id;

pub use page_cache::PageCache;
pub use request_id::RequestIdMiddleware;
