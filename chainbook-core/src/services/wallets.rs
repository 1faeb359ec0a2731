//! Wallet store - the authoritative wallet list of the current session
//!
//! The list only ever changes by wholesale replacement with a server
//! response. Create and delete never touch it locally; a successful
//! mutation is followed by a full re-fetch.

use std::sync::Arc;

use crate::domain::result::{Error, Result};
use crate::domain::{Draft, Identity, Session, Wallet, WalletId};
use crate::ports::WatchlistApi;
use crate::services::logging::{record, LogEvent, LoggingService};

/// Owns the wallet list as last confirmed by the server
pub struct WalletStore {
    api: Arc<dyn WatchlistApi>,
    logger: Option<Arc<LoggingService>>,
    wallets: Vec<Wallet>,
    /// Identity the initial fetch was performed for
    loaded_for: Option<Identity>,
}

impl WalletStore {
    pub fn new(api: Arc<dyn WatchlistApi>) -> Self {
        Self {
            api,
            logger: None,
            wallets: Vec::new(),
            loaded_for: None,
        }
    }

    pub fn with_logger(mut self, logger: Arc<LoggingService>) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Wallets in server order
    pub fn wallets(&self) -> &[Wallet] {
        &self.wallets
    }

    pub fn get(&self, id: WalletId) -> Option<&Wallet> {
        self.wallets.iter().find(|w| w.id == id)
    }

    /// Whether the initial fetch has run for the current identity
    pub fn is_initialized(&self) -> bool {
        self.loaded_for.is_some()
    }

    fn log(&self, event: LogEvent) {
        record(self.logger.as_deref(), event);
    }

    /// Follow the session: fetch once when it first becomes authenticated
    ///
    /// Returns whether a fetch was attempted. Nothing happens while the
    /// session is unresolved. An anonymous session empties the list so the
    /// next identity starts clean.
    pub async fn sync_with_session(&mut self, session: &Session) -> bool {
        match session {
            Session::Unresolved => false,
            Session::Anonymous => {
                self.wallets.clear();
                self.loaded_for = None;
                false
            }
            Session::Authenticated { identity } => {
                if self.loaded_for.as_ref() == Some(identity) {
                    return false;
                }
                if self.loaded_for.is_some() {
                    self.wallets.clear();
                }
                self.loaded_for = Some(identity.clone());
                let _ = self.refresh().await;
                true
            }
        }
    }

    /// Replace the list with the server's current view
    ///
    /// On failure the last good snapshot is kept; the error is logged and
    /// returned, but callers showing the list are expected to ignore it.
    pub async fn refresh(&mut self) -> Result<()> {
        match self.api.list_wallets().await {
            Ok(wallets) => {
                self.wallets = wallets;
                self.log(LogEvent::new("wallets_refreshed"));
                Ok(())
            }
            Err(e) => {
                self.log(LogEvent::new("wallet_refresh_failed").with_core_error(&e));
                Err(e)
            }
        }
    }

    /// Submit a draft; on success the list is re-fetched
    ///
    /// The draft is only borrowed, so on failure the caller still holds it
    /// for correction. A failed follow-up refresh does not fail the create.
    pub async fn create(&mut self, draft: &Draft) -> Result<Wallet> {
        draft.validate().map_err(Error::validation)?;

        let created = match self.api.create_wallet(draft).await {
            Ok(wallet) => wallet,
            Err(e) => {
                self.log(LogEvent::new("wallet_create_failed").with_core_error(&e));
                return Err(e);
            }
        };

        self.log(LogEvent::new("wallet_created"));
        let _ = self.refresh().await;
        Ok(created)
    }

    /// Delete a wallet; on success the list is re-fetched
    ///
    /// Confirmation is the caller's job. Nothing is removed locally, so a
    /// failure needs no rollback and triggers no refresh.
    pub async fn delete(&mut self, id: WalletId) -> Result<()> {
        if let Err(e) = self.api.delete_wallet(id).await {
            self.log(LogEvent::new("wallet_delete_failed").with_core_error(&e));
            return Err(e);
        }

        self.log(LogEvent::new("wallet_deleted"));
        let _ = self.refresh().await;
        Ok(())
    }
}
