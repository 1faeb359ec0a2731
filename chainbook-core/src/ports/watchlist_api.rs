//! Watchlist API port
//!
//! The remote server authenticates analysts and persists their wallets.
//! Every call is a single attempt; failures are returned, never retried.

use async_trait::async_trait;

use crate::domain::result::Result;
use crate::domain::{Draft, Identity, Wallet, WalletId};

/// Requests the core issues against the watchlist server
///
/// Implementations attach the current bearer token to every request except
/// `authenticate` and `register`.
#[async_trait]
pub trait WatchlistApi: Send + Sync {
    /// Exchange credentials for a token (`InvalidCredentials` on rejection)
    async fn authenticate(&self, username: &str, password: &str) -> Result<String>;

    /// Create an account and return its token
    ///
    /// Fails with `Validation` carrying the first server-reported field
    /// error, or `RegistrationFailed` when the error shape is unrecognized.
    async fn register(&self, email: &str, password: &str) -> Result<String>;

    /// Identity behind the current token (`Unauthorized` if missing/invalid)
    async fn fetch_identity(&self) -> Result<Identity>;

    /// All wallets of the current identity, in server order
    async fn list_wallets(&self) -> Result<Vec<Wallet>>;

    /// Persist a draft and return the created record
    async fn create_wallet(&self, draft: &Draft) -> Result<Wallet>;

    /// Delete a wallet by id
    async fn delete_wallet(&self, id: WalletId) -> Result<()>;
}
