//! Utility functions and helper modules.
//!
//! Request inspection and signing helpers shared by handlers and middleware.

pub mod hmac;
pub mod http;
pub mod route;

pub use http::*;
pub use route::*;
