// web-server/src/auth/mod.rs
//! Credential store, password hashing, login and the extractors that
//! guard every protected route.
pub mod extractor;
pub mod guard;
pub mod password;
pub mod service;
pub mod users;

use thiserror::Error;

pub use extractor::{Authorized, CurrentUser};
pub use guard::{require_active, require_role, AdminOnly, AdminOrAuditor, AdminOrOperator, RolePolicy};
pub use password::PasswordHasher;
pub use service::AuthService;
pub use users::UserStore;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("Incorrect username or password")]
    BadCredentials,

    #[error("Could not validate credentials")]
    InvalidOrExpired,

    #[error("Could not validate credentials")]
    Unauthenticated,

    #[error("Inactive user")]
    Inactive,

    #[error("Insufficient permissions")]
    Forbidden,

    #[error("password hashing failed: {0}")]
    Hashing(String),

    #[error("token signing failed: {0}")]
    Token(String),
}
