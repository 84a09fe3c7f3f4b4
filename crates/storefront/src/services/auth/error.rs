//! Authentication error types.

use thiserror::Error;

use crate::db::RepositoryError;

/// Errors that can occur during account operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// A required field was absent or blank.
    #[error("missing field: {0}")]
    MissingField(&'static str),

    /// Invalid username format.
    #[error("invalid username: {0}")]
    InvalidUsername(#[from] corner_shop_core::UsernameError),

    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] corner_shop_core::EmailError),

    /// Invalid credentials (wrong password or unknown username).
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Username already taken.
    #[error("user already exists")]
    UserAlreadyExists,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,
}
