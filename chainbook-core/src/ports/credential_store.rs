//! Credential store port
//!
//! A single durable slot for the bearer token. No validation and no expiry
//! checks; the store only has to survive restarts.

use crate::domain::result::Result;

/// Opaque key/value slot holding at most one token
pub trait CredentialStore: Send + Sync {
    /// Read the stored token, if any
    fn get(&self) -> Result<Option<String>>;

    /// Replace the stored token
    fn set(&self, token: &str) -> Result<()>;

    /// Clear the stored token. Clearing an empty slot is not an error.
    fn remove(&self) -> Result<()>;
}
