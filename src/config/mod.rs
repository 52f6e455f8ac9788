//! Configuration structures and loading utilities.
//!
//! Every structure has a `Default` matching the documented constants and a
//! `from_env()` constructor that overrides individual fields.

pub mod hmac;
pub mod lockout;
pub mod proxy;
pub mod server;

pub use hmac::*;
pub use lockout::*;
pub use proxy::*;
pub use server::*;
