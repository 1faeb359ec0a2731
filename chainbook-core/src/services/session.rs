//! Session manager - authentication state and the protected-view guard
//!
//! The session starts `Unresolved`. Resolution reads the stored token and,
//! if there is one, asks the server who it belongs to:
//!
//! ```text
//! Unresolved --(no token)-----------------> Anonymous
//! Unresolved --(token, identity ok)-------> Authenticated
//! Unresolved --(token, identity failed)---> Anonymous   (token cleared)
//! Anonymous  --login(token) + resolve-----> Authenticated | Anonymous
//! Authenticated --logout------------------> Anonymous   (token cleared)
//! ```

use std::sync::Arc;

use crate::domain::result::{Error, Result};
use crate::domain::{Guard, Navigation, Session, SessionStatus};
use crate::ports::{CredentialStore, WatchlistApi};
use crate::services::logging::{record, LogEvent, LoggingService};

/// Owns the authentication state of the current session
pub struct SessionManager {
    api: Arc<dyn WatchlistApi>,
    credentials: Arc<dyn CredentialStore>,
    logger: Option<Arc<LoggingService>>,
    session: Session,
    retain_token_on_network_error: bool,
}

impl SessionManager {
    pub fn new(api: Arc<dyn WatchlistApi>, credentials: Arc<dyn CredentialStore>) -> Self {
        Self {
            api,
            credentials,
            logger: None,
            session: Session::Unresolved,
            retain_token_on_network_error: false,
        }
    }

    pub fn with_logger(mut self, logger: Arc<LoggingService>) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Keep the stored token when identity resolution fails only because the
    /// server could not be reached. Any other failure still clears it.
    pub fn retain_token_on_network_error(mut self, retain: bool) -> Self {
        self.retain_token_on_network_error = retain;
        self
    }

    /// Read-only snapshot of the current session
    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn status(&self) -> SessionStatus {
        self.session.status()
    }

    /// What a protected view may do right now
    pub fn guard(&self) -> Guard<'_> {
        self.session.guard()
    }

    fn log(&self, event: LogEvent) {
        record(self.logger.as_deref(), event);
    }

    /// Derive the session from the stored token and the server
    ///
    /// Identity failures are handled here and never surface: the session is
    /// demoted to `Anonymous` and the token is cleared. Only credential
    /// store failures are returned, after the session has been set to
    /// `Anonymous`.
    pub async fn resolve(&mut self) -> Result<SessionStatus> {
        let token = match self.credentials.get() {
            Ok(token) => token,
            Err(e) => {
                self.session = Session::Anonymous;
                self.log(LogEvent::new("session_resolved").with_core_error(&e));
                return Err(e);
            }
        };

        if token.is_none() {
            self.session = Session::Anonymous;
            self.log(LogEvent::new("session_resolved"));
            return Ok(self.status());
        }

        match self.api.fetch_identity().await {
            Ok(identity) => {
                self.session = Session::Authenticated { identity };
                self.log(LogEvent::new("session_resolved"));
            }
            Err(e) => {
                self.session = Session::Anonymous;
                self.log(LogEvent::new("session_demoted").with_core_error(&e));
                if !(e.is_network() && self.retain_token_on_network_error) {
                    self.credentials.remove()?;
                }
            }
        }

        Ok(self.status())
    }

    /// Store a freshly issued token, re-resolve, and head for the dashboard
    ///
    /// The dashboard guard takes care of bouncing back to the login view if
    /// the token turns out to be unusable.
    pub async fn login(&mut self, token: &str) -> Result<Navigation> {
        self.credentials.set(token)?;
        // A failed re-resolution was already logged as `session_demoted`
        if self.resolve().await? == SessionStatus::Authenticated {
            self.log(LogEvent::new("login_succeeded").with_view(Navigation::Dashboard.path()));
        }
        Ok(Navigation::Dashboard)
    }

    /// Authenticate with username/password, then `login`
    ///
    /// On failure nothing is written to the credential store and the
    /// session is left untouched.
    pub async fn sign_in(&mut self, username: &str, password: &str) -> Result<Navigation> {
        require("Email", username)?;
        require("Password", password)?;

        let token = match self.api.authenticate(username, password).await {
            Ok(token) => token,
            Err(e) => {
                self.log(
                    LogEvent::new("login_failed")
                        .with_view(Navigation::Login.path())
                        .with_core_error(&e),
                );
                return Err(e);
            }
        };
        self.login(&token).await
    }

    /// Create an account, then `login` with the issued token
    pub async fn sign_up(&mut self, email: &str, password: &str) -> Result<Navigation> {
        require("Email", email)?;
        require("Password", password)?;

        let token = match self.api.register(email, password).await {
            Ok(token) => token,
            Err(e) => {
                self.log(
                    LogEvent::new("registration_failed")
                        .with_view(Navigation::Register.path())
                        .with_core_error(&e),
                );
                return Err(e);
            }
        };
        self.login(&token).await
    }

    /// Forget the token and head for the login view
    pub fn logout(&mut self) -> Result<Navigation> {
        self.session = Session::Anonymous;
        self.credentials.remove()?;
        self.log(LogEvent::new("logout").with_view(Navigation::Login.path()));
        Ok(Navigation::Login)
    }
}

fn require(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::validation(format!("{} is required", field)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use crate::adapters::credentials::MemoryCredentialStore;
    use crate::adapters::http::HttpApiClient;
    use crate::adapters::mock_api::{MockApiServer, MockConfig};

    fn manager_for(server: &MockApiServer, store: Arc<MemoryCredentialStore>) -> SessionManager {
        let api = HttpApiClient::new(&server.base_url(), store.clone(), Some(Duration::from_secs(5)))
            .unwrap();
        SessionManager::new(Arc::new(api), store)
    }

    #[tokio::test]
    async fn test_no_token_resolves_anonymous_without_network() {
        let server = MockApiServer::start(MockConfig::default()).unwrap();
        let store = Arc::new(MemoryCredentialStore::new());
        let mut manager = manager_for(&server, store);

        assert_eq!(manager.status(), SessionStatus::Unresolved);
        assert_eq!(manager.resolve().await.unwrap(), SessionStatus::Anonymous);
        assert!(server.requests().is_empty());
    }

    #[tokio::test]
    async fn test_valid_token_resolves_authenticated() {
        let server = MockApiServer::start(MockConfig::default()).unwrap();
        server.seed_user("analyst@example.com", "secret123");
        let store = Arc::new(MemoryCredentialStore::with_token(
            server.token_for("analyst@example.com"),
        ));
        let mut manager = manager_for(&server, store);

        assert_eq!(manager.resolve().await.unwrap(), SessionStatus::Authenticated);
        assert_eq!(
            manager.session().identity().unwrap().email,
            "analyst@example.com"
        );
    }

    #[tokio::test]
    async fn test_rejected_token_is_cleared() {
        let server = MockApiServer::start(MockConfig::default()).unwrap();
        let store = Arc::new(MemoryCredentialStore::with_token("expired"));
        let mut manager = manager_for(&server, store.clone());

        assert_eq!(manager.resolve().await.unwrap(), SessionStatus::Anonymous);
        assert_eq!(store.get().unwrap(), None);
        assert_eq!(manager.guard(), Guard::Redirect(Navigation::Login));
    }

    #[tokio::test]
    async fn test_sign_in_wrong_password_writes_nothing() {
        let server = MockApiServer::start(MockConfig::default()).unwrap();
        server.seed_user("analyst@example.com", "secret123");
        let store = Arc::new(MemoryCredentialStore::new());
        let mut manager = manager_for(&server, store.clone());
        manager.resolve().await.unwrap();

        let err = manager
            .sign_in("analyst@example.com", "nope")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidCredentials));
        assert_eq!(manager.status(), SessionStatus::Anonymous);
        assert_eq!(store.get().unwrap(), None);
    }

    #[tokio::test]
    async fn test_sign_in_then_logout() {
        let server = MockApiServer::start(MockConfig::default()).unwrap();
        server.seed_user("analyst@example.com", "secret123");
        let store = Arc::new(MemoryCredentialStore::new());
        let mut manager = manager_for(&server, store.clone());
        manager.resolve().await.unwrap();

        let nav = manager
            .sign_in("analyst@example.com", "secret123")
            .await
            .unwrap();
        assert_eq!(nav, Navigation::Dashboard);
        assert!(manager.session().is_authenticated());
        assert!(store.get().unwrap().is_some());

        assert_eq!(manager.logout().unwrap(), Navigation::Login);
        assert_eq!(manager.status(), SessionStatus::Anonymous);
        assert!(manager.session().identity().is_none());
        assert_eq!(store.get().unwrap(), None);
    }

    #[tokio::test]
    async fn test_sign_up_logs_in() {
        let server = MockApiServer::start(MockConfig::default()).unwrap();
        let store = Arc::new(MemoryCredentialStore::new());
        let mut manager = manager_for(&server, store);

        manager.sign_up("new@example.com", "secret123").await.unwrap();
        assert_eq!(manager.session().identity().unwrap().email, "new@example.com");
        assert!(server.request_count("POST /register") == 1);
        assert!(server.request_count("GET /users/me") == 1);
    }

    #[tokio::test]
    async fn test_missing_fields_rejected_locally() {
        let server = MockApiServer::start(MockConfig::default()).unwrap();
        let store = Arc::new(MemoryCredentialStore::new());
        let mut manager = manager_for(&server, store);

        let err = manager.sign_in("", "secret").await.unwrap_err();
        assert!(matches!(err, Error::Validation(ref m) if m == "Email is required"));
        assert!(server.requests().is_empty());
    }
}
