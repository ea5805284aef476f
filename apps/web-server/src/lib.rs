//! # Scribe Web Server
//!
//! The actix-web application: configuration, state, middleware and handlers.
//! `main.rs` wires these into a running server; the integration tests build
//! the same application over in-memory state.

pub mod config;
pub mod form_data;
pub mod handlers;
pub mod middleware;
pub mod state;
pub mod telemetry;
pub mod views;

pub use config::{AppConfig, Settings};
pub use state::AppState;
