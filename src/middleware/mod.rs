//! Custom middleware for cross-cutting request concerns.

pub mod request_tracing;

pub use request_tracing::*;
