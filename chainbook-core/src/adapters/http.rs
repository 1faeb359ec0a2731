//! Watchlist HTTP client
//!
//! Talks to the Chainbook API server:
//! - POST /token (form) and POST /register (JSON) issue bearer tokens
//! - GET /users/me confirms the identity behind a token
//! - GET/POST /wallets/ and DELETE /wallets/{id} manage the watchlist

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::config::validate_api_url;
use crate::domain::result::{Error, Result};
use crate::domain::{Draft, Identity, Wallet, WalletId};
use crate::ports::{CredentialStore, WatchlistApi};

/// Token issued by `/token` and `/register`
#[derive(Debug, Deserialize, Serialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    token_type: Option<String>,
}

/// HTTP implementation of the watchlist API
///
/// The bearer token is read from the credential store on every request, so
/// a login or logout takes effect on the next call without rebuilding the
/// client.
pub struct HttpApiClient {
    client: Client,
    base_url: String,
    credentials: Arc<dyn CredentialStore>,
}

impl HttpApiClient {
    /// Create a client for `base_url`
    ///
    /// `timeout` of `None` means requests may wait indefinitely.
    pub fn new(
        base_url: &str,
        credentials: Arc<dyn CredentialStore>,
        timeout: Option<Duration>,
    ) -> Result<Self> {
        let base_url = validate_api_url(base_url)?;

        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| Error::network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url,
            credentials,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Attach the stored token, if there is one
    fn authorized(&self, request: RequestBuilder) -> Result<RequestBuilder> {
        Ok(match self.credentials.get()? {
            Some(token) => request.bearer_auth(token),
            None => request,
        })
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response> {
        request.send().await.map_err(map_request_error)
    }

    async fn send_authorized(&self, request: RequestBuilder) -> Result<Response> {
        let request = self.authorized(request)?;
        let response = self.send(request).await?;
        if response.status().is_success() {
            Ok(response)
        } else {
            Err(error_for_status(response).await)
        }
    }
}

/// Map transport errors to user-facing messages
fn map_request_error(error: reqwest::Error) -> Error {
    if error.is_timeout() {
        Error::network("Request to the watchlist server timed out")
    } else if error.is_connect() {
        Error::network("Unable to connect to the watchlist server")
    } else {
        Error::network(format!("Watchlist request failed: {}", error))
    }
}

async fn parse_json<T: DeserializeOwned>(response: Response) -> Result<T> {
    response
        .json::<T>()
        .await
        .map_err(|e| Error::network(format!("Malformed server response: {}", e)))
}

/// Extract the server's `detail`: either a string or a list of `{msg}`
/// field errors, of which the first is used
pub(crate) fn detail_message(body: &str) -> Option<String> {
    let value: JsonValue = serde_json::from_str(body).ok()?;
    match value.get("detail")? {
        JsonValue::String(s) if !s.is_empty() => Some(s.clone()),
        JsonValue::Array(items) => items
            .first()?
            .get("msg")?
            .as_str()
            .map(str::to_string),
        _ => None,
    }
}

/// Map a non-success response of an authenticated request to an error
async fn error_for_status(response: Response) -> Error {
    let status = response.status();
    let detail = response
        .text()
        .await
        .ok()
        .and_then(|body| detail_message(&body));

    match status {
        StatusCode::UNAUTHORIZED => Error::Unauthorized,
        StatusCode::FORBIDDEN => Error::Forbidden(detail.unwrap_or_else(|| "Not Authorized".into())),
        StatusCode::NOT_FOUND => Error::NotFound(detail.unwrap_or_else(|| "Not Found".into())),
        s if s.is_client_error() => Error::Validation(
            detail.unwrap_or_else(|| format!("Request rejected (HTTP {})", s.as_u16())),
        ),
        s => Error::network(format!("Watchlist API error: HTTP {}", s.as_u16())),
    }
}

#[async_trait]
impl WatchlistApi for HttpApiClient {
    async fn authenticate(&self, username: &str, password: &str) -> Result<String> {
        let request = self
            .client
            .post(self.url("/token"))
            .form(&[("username", username), ("password", password)]);
        let response = self.send(request).await?;

        match response.status() {
            s if s.is_success() => Ok(parse_json::<TokenResponse>(response).await?.access_token),
            StatusCode::UNAUTHORIZED => Err(Error::InvalidCredentials),
            _ => Err(error_for_status(response).await),
        }
    }

    async fn register(&self, email: &str, password: &str) -> Result<String> {
        let request = self
            .client
            .post(self.url("/register"))
            .json(&serde_json::json!({ "email": email, "password": password }));
        let response = self.send(request).await?;

        if response.status().is_success() {
            return Ok(parse_json::<TokenResponse>(response).await?.access_token);
        }

        let body = response.text().await.unwrap_or_default();
        match detail_message(&body) {
            Some(message) => Err(Error::Validation(message)),
            None => Err(Error::RegistrationFailed),
        }
    }

    async fn fetch_identity(&self) -> Result<Identity> {
        let response = self
            .send_authorized(self.client.get(self.url("/users/me")))
            .await?;
        parse_json(response).await
    }

    async fn list_wallets(&self) -> Result<Vec<Wallet>> {
        let response = self
            .send_authorized(self.client.get(self.url("/wallets/")))
            .await?;
        parse_json(response).await
    }

    async fn create_wallet(&self, draft: &Draft) -> Result<Wallet> {
        let response = self
            .send_authorized(self.client.post(self.url("/wallets/")).json(draft))
            .await?;
        parse_json(response).await
    }

    async fn delete_wallet(&self, id: WalletId) -> Result<()> {
        self.send_authorized(self.client.delete(self.url(&format!("/wallets/{}", id))))
            .await?;
        Ok(())
    }
}
