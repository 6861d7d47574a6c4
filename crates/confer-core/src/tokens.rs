//! Bearer and refresh tokens issued by the backend.
//!
//! Both are opaque strings. They serialize as bare strings so they can sit
//! directly in the credential file, and their `Debug` output never shows
//! the value.

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! opaque_token {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(token: impl Into<String>) -> Self {
                Self(token.into())
            }

            /// The raw value. Only request construction should need it.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!(stringify!($name), "(***)"))
            }
        }
    };
}

opaque_token!(
    /// Sent as `Authorization: Bearer <token>` on every request.
    AccessToken
);

opaque_token!(
    /// Posted to the refresh endpoint to mint a new [`AccessToken`].
    RefreshToken
);
