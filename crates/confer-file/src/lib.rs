//! confer-file - Filesystem-backed credential storage.

mod store;

pub use store::FileCredentialStore;
