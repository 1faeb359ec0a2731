//! Chainbook Core - session and watchlist synchronization for the wallet CRM
//!
//! This crate follows hexagonal architecture:
//!
//! - **domain**: Core entities (Wallet, Draft, Session, FilterCriteria)
//! - **ports**: Traits for external collaborators (WatchlistApi, CredentialStore)
//! - **services**: State owners (SessionManager, WalletStore, ViewFilter) and the event log
//! - **adapters**: Concrete implementations (reqwest client, credential slots)

pub mod domain;
pub mod ports;
pub mod services;
pub mod adapters;
pub mod config;
mod log_migrations;

use std::path::Path;
use std::sync::Arc;

use adapters::credentials::FileCredentialStore;
use adapters::http::HttpApiClient;
use config::Config;
use ports::{CredentialStore, WatchlistApi};
use services::*;

// Re-export commonly used types at crate root
pub use domain::{
    Draft, FilterCriteria, Guard, Identity, Navigation, RiskFilter, RiskLevel, Session,
    SessionStatus, Wallet, WalletId,
};
pub use domain::result::{Error, Result};
pub use services::{EntryPoint, FilteredView, LogEvent, LogQuery, LoggingService};

/// Main context for Chainbook operations
///
/// Holds the two independently owned state containers (session and wallet
/// list) plus the transient filter, all wired to the same API client.
/// Front ends receive it by value and drive it through its methods.
pub struct ChainbookContext {
    pub config: Config,
    pub logger: Option<Arc<LoggingService>>,
    pub credentials: Arc<dyn CredentialStore>,
    pub api: Arc<dyn WatchlistApi>,
    pub session: SessionManager,
    pub wallets: WalletStore,
    pub filter: ViewFilter,
}

impl ChainbookContext {
    /// Create a context backed by the chainbook directory
    ///
    /// The event log is optional: if logs.duckdb cannot be opened the
    /// context is still usable.
    pub fn new(chainbook_dir: &Path, entry_point: EntryPoint) -> anyhow::Result<Self> {
        std::fs::create_dir_all(chainbook_dir)?;
        let config = Config::load(chainbook_dir)?;

        let logger = LoggingService::new(chainbook_dir, entry_point, env!("CARGO_PKG_VERSION"))
            .ok()
            .map(Arc::new);

        let credentials: Arc<dyn CredentialStore> =
            Arc::new(FileCredentialStore::new(chainbook_dir));
        let api: Arc<dyn WatchlistApi> = Arc::new(HttpApiClient::new(
            &config.api_url,
            credentials.clone(),
            config.request_timeout,
        )?);

        Ok(Self::from_parts(config, api, credentials, logger))
    }

    /// Wire a context from explicit collaborators
    pub fn from_parts(
        config: Config,
        api: Arc<dyn WatchlistApi>,
        credentials: Arc<dyn CredentialStore>,
        logger: Option<Arc<LoggingService>>,
    ) -> Self {
        let mut session = SessionManager::new(api.clone(), credentials.clone())
            .retain_token_on_network_error(config.retain_token_on_network_error);
        let mut wallets = WalletStore::new(api.clone());
        if let Some(logger) = &logger {
            session = session.with_logger(logger.clone());
            wallets = wallets.with_logger(logger.clone());
        }

        Self {
            config,
            logger,
            credentials,
            api,
            session,
            wallets,
            filter: ViewFilter::default(),
        }
    }

    /// Resolve the session, then let the wallet store follow it
    pub async fn initialize(&mut self) -> Result<SessionStatus> {
        let status = self.session.resolve().await?;
        self.sync_wallets().await;
        Ok(status)
    }

    /// Sign in and, once authenticated, perform the initial wallet fetch
    pub async fn sign_in(&mut self, username: &str, password: &str) -> Result<Navigation> {
        let nav = self.session.sign_in(username, password).await?;
        self.sync_wallets().await;
        Ok(nav)
    }

    /// Register and, once authenticated, perform the initial wallet fetch
    pub async fn sign_up(&mut self, email: &str, password: &str) -> Result<Navigation> {
        let nav = self.session.sign_up(email, password).await?;
        self.sync_wallets().await;
        Ok(nav)
    }

    /// Log out and drop the previous identity's wallets
    pub async fn logout(&mut self) -> Result<Navigation> {
        let nav = self.session.logout()?;
        self.sync_wallets().await;
        Ok(nav)
    }

    async fn sync_wallets(&mut self) {
        self.wallets.sync_with_session(self.session.session()).await;
    }

    /// The filtered view of the authoritative list under the current criteria
    pub fn filtered(&self) -> FilteredView<'_> {
        self.filter.apply(self.wallets.wallets())
    }
}
