//! Account service.
//!
//! Registration and password login. Passwords are hashed with Argon2id and
//! never stored, returned or logged in plaintext.

mod error;

pub use error::AuthError;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use tracing::instrument;

use corner_shop_core::{Email, Username};

use crate::db::{RepositoryError, Store, UserRepository};
use crate::models::{NewUser, User};

/// Account service.
///
/// Handles account creation, password login and account listing.
pub struct AuthService<'a> {
    users: &'a dyn UserRepository,
}

impl<'a> AuthService<'a> {
    /// Create a new account service.
    #[must_use]
    pub fn new(store: &'a Store) -> Self {
        Self {
            users: store.users(),
        }
    }

    /// Register a new account.
    ///
    /// Username and password are required; an empty or whitespace-only email
    /// is treated as absent. Any non-empty password is accepted.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::MissingField` if username or password is blank.
    /// Returns `AuthError::InvalidUsername` / `AuthError::InvalidEmail` on bad formats.
    /// Returns `AuthError::UserAlreadyExists` if the username is taken.
    #[instrument(skip(self, email, password))]
    pub async fn register(
        &self,
        username: &str,
        email: Option<&str>,
        password: &str,
    ) -> Result<User, AuthError> {
        if username.trim().is_empty() {
            return Err(AuthError::MissingField("username"));
        }
        if password.is_empty() {
            return Err(AuthError::MissingField("password"));
        }

        let username = Username::parse(username)?;
        let email = email
            .filter(|e| !e.trim().is_empty())
            .map(Email::parse)
            .transpose()?;

        let password_hash = hash_password(password)?;

        let user = self
            .users
            .create(NewUser {
                username,
                email,
                password_hash,
            })
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::UserAlreadyExists,
                other => AuthError::Repository(other),
            })?;

        tracing::info!(user_id = %user.id, "Account created");
        Ok(user)
    }

    /// Login with username and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the username/password is wrong.
    #[instrument(skip(self, password))]
    pub async fn login(&self, username: &str, password: &str) -> Result<User, AuthError> {
        // A name that could never have been registered is just a wrong credential.
        let username = Username::parse(username).map_err(|_| AuthError::InvalidCredentials)?;

        let (user, password_hash) = self
            .users
            .get_password_hash(&username)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(password, &password_hash)?;

        Ok(user)
    }

    /// All accounts, in creation order.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Repository` if the database operation fails.
    pub async fn list_users(&self) -> Result<Vec<User>, AuthError> {
        Ok(self.users.list().await?)
    }
}

/// Hash a password using Argon2id.
fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}
