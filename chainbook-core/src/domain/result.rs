//! Result and error types for the core library

use thiserror::Error;

/// Core library error type
///
/// The first six variants mirror what the watchlist API can report back to
/// a user action. The rest are local failures (credential storage,
/// configuration, serialization).
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Registration failed. Please try again.")]
    RegistrationFailed,

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Credential storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Every value [`Error::kind`] can return
    pub const KINDS: [&'static str; 10] = [
        "invalid_credentials",
        "validation",
        "registration_failed",
        "unauthorized",
        "not_found",
        "network",
        "forbidden",
        "storage",
        "config",
        "json",
    ];

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a not found error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create a network error
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    /// Create a credential storage error
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// Whether the server rejected the attached bearer token
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized)
    }

    /// Whether the failure happened before the server could judge the request
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network(_))
    }

    /// Short machine-readable name, used as the event log error message
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidCredentials => "invalid_credentials",
            Self::Validation(_) => "validation",
            Self::RegistrationFailed => "registration_failed",
            Self::Unauthorized => "unauthorized",
            Self::NotFound(_) => "not_found",
            Self::Network(_) => "network",
            Self::Forbidden(_) => "forbidden",
            Self::Storage(_) => "storage",
            Self::Config(_) => "config",
            Self::Json(_) => "json",
        }
    }
}

/// Core library result type
pub type Result<T> = std::result::Result<T, Error>;
