//! Port definitions (hexagonal architecture)
//!
//! Ports define the interfaces for external collaborators. The session and
//! wallet services depend only on these traits, not on concrete
//! implementations.

mod credential_store;
mod watchlist_api;

pub use credential_store::CredentialStore;
pub use watchlist_api::WatchlistApi;
