//! Login name type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Username`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum UsernameError {
    /// Empty or whitespace only.
    #[error("username cannot be blank")]
    Blank,
    /// Longer than the column allows.
    #[error("username must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
}

/// A unique login name.
///
/// Usernames are case-sensitive and compared byte for byte, matching the
/// unique index on `shop.user.username`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct Username(String);

impl Username {
    /// Maximum length (`VARCHAR(150)`).
    pub const MAX_LENGTH: usize = 150;

    /// Parse a `Username`, trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns a [`UsernameError`] if the trimmed input is blank or longer
    /// than [`Self::MAX_LENGTH`] characters.
    pub fn parse(s: &str) -> Result<Self, UsernameError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(UsernameError::Blank);
        }
        if s.chars().count() > Self::MAX_LENGTH {
            return Err(UsernameError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }
        Ok(Self(s.to_owned()))
    }

    /// Returns the username as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Username {
    type Error = UsernameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Username> for String {
    fn from(username: Username) -> Self {
        username.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
