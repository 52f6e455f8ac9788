//! Business logic and service layer modules.
//!
//! The login guard is the core; sessions, credential verification, metrics
//! and the sweeper are the collaborators wired around it by the handlers.

pub mod admin_auth;
pub mod credentials;
pub mod login_guard;
pub mod metrics;
pub mod session;
pub mod sweeper;

pub use admin_auth::*;
pub use credentials::*;
pub use login_guard::*;
pub use metrics::*;
pub use session::*;
pub use sweeper::*;
