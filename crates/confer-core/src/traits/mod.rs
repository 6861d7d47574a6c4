//! Core traits for pluggable collaborators.

mod credential_store;

pub use credential_store::CredentialStore;
