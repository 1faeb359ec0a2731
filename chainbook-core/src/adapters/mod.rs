//! Adapter implementations
//!
//! Adapters implement the port traits with concrete technologies:
//! - reqwest HTTP client for the WatchlistApi port
//! - JSON file and in-memory slots for the CredentialStore port

pub mod credentials;
pub mod http;

#[cfg(test)]
pub mod mock_api;
