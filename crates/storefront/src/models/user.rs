//! Account domain types.

use chrono::{DateTime, Utc};

use corner_shop_core::{Email, UserId, Username};

/// A storefront account.
///
/// The password hash is deliberately absent: it only ever leaves the
/// database through `UserRepository::get_password_hash`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Unique login name.
    pub username: Username,
    /// Optional contact email.
    pub email: Option<Email>,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
}

/// Input for inserting an account. The password is already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: Username,
    pub email: Option<Email>,
    pub password_hash: String,
}
