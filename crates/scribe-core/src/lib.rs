//! # Scribe Core
//!
//! The domain layer of the Scribe blogging service.
//! This crate contains entities, ports, form validation and the feed/follow
//! services, with zero infrastructure dependencies.

pub mod domain;
pub mod error;
pub mod forms;
pub mod pagination;
pub mod ports;
pub mod services;

pub use error::{DomainError, RepoError};
