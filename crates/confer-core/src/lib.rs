//! confer-core - Core types and traits for the confer conference client.

pub mod credentials;
pub mod error;
pub mod memory;
pub mod tokens;
pub mod traits;
pub mod types;

pub use credentials::{Credentials, LoginCredentials, UserType};
pub use error::{
    Error, ErrorKind, ErrorPayload, GatewayError, HttpError, InvalidInputError, StoreError,
};
pub use memory::MemoryCredentialStore;
pub use tokens::{AccessToken, RefreshToken};
pub use traits::CredentialStore;
pub use types::ApiUrl;

/// Result type alias using the crate's Error type.
pub type Result<T> = std::result::Result<T, Error>;
