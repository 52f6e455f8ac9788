//! Data models for the login guard API.
//!
//! Request/response bodies and the structured audit event type.

pub mod api;
pub mod audit;
pub mod auth;

pub use api::*;
pub use audit::*;
pub use auth::*;
