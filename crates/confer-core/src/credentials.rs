//! Login input and the persisted credential set.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::tokens::{AccessToken, RefreshToken};

/// Which audience a login is for. Selects the login endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserType {
    Delegate,
    Sponsor,
}

impl UserType {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserType::Delegate => "delegate",
            UserType::Sponsor => "sponsor",
        }
    }
}

impl fmt::Display for UserType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Login credentials for the backend.
///
/// # Security
///
/// The password is never exposed in Debug output.
///
/// # Example
///
/// ```
/// use confer_core::{LoginCredentials, UserType};
///
/// let creds = LoginCredentials::new("a@b.com", "x", UserType::Delegate);
/// assert_eq!(creds.email(), "a@b.com");
/// ```
#[derive(Clone)]
pub struct LoginCredentials {
    email: String,
    password: String,
    user_type: UserType,
}

impl LoginCredentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>, user_type: UserType) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            user_type,
        }
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    /// Returns the password.
    ///
    /// # Security
    ///
    /// Use this only when constructing authentication requests.
    pub fn password(&self) -> &str {
        &self.password
    }

    pub fn user_type(&self) -> UserType {
        self.user_type
    }
}

impl fmt::Debug for LoginCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginCredentials")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .field("user_type", &self.user_type)
            .finish()
    }
}

/// The persisted authentication state.
///
/// Access and refresh tokens are written and cleared together; the principal
/// is the last-known identity returned by login, kept for display only.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Credentials {
    pub access_token: Option<AccessToken>,
    pub refresh_token: Option<RefreshToken>,
    pub principal: Option<Value>,
}

impl Credentials {
    pub fn new(
        access_token: AccessToken,
        refresh_token: Option<RefreshToken>,
        principal: Option<Value>,
    ) -> Self {
        Self {
            access_token: Some(access_token),
            refresh_token,
            principal,
        }
    }

    /// True when nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.access_token.is_none() && self.refresh_token.is_none() && self.principal.is_none()
    }

    pub fn is_authenticated(&self) -> bool {
        self.access_token.is_some()
    }
}
