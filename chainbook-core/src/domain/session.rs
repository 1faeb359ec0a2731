//! Session domain model: authentication state, navigation intents, view guard

use std::fmt;

use serde::Serialize;

use super::Identity;

/// Coarse authentication status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SessionStatus {
    Unresolved,
    Anonymous,
    Authenticated,
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SessionStatus::Unresolved => "unresolved",
            SessionStatus::Anonymous => "anonymous",
            SessionStatus::Authenticated => "authenticated",
        };
        f.write_str(s)
    }
}

/// Authentication state of the current session
///
/// The identity lives inside the `Authenticated` variant, so a session can
/// never carry an identity without being authenticated (or vice versa).
/// The bearer token itself stays in the credential store.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Session {
    #[default]
    Unresolved,
    Anonymous,
    Authenticated { identity: Identity },
}

impl Session {
    pub fn status(&self) -> SessionStatus {
        match self {
            Session::Unresolved => SessionStatus::Unresolved,
            Session::Anonymous => SessionStatus::Anonymous,
            Session::Authenticated { .. } => SessionStatus::Authenticated,
        }
    }

    pub fn identity(&self) -> Option<&Identity> {
        match self {
            Session::Authenticated { identity } => Some(identity),
            _ => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Session::Authenticated { .. })
    }

    /// What a protected view may do under this session
    pub fn guard(&self) -> Guard<'_> {
        match self {
            Session::Unresolved => Guard::Loading,
            Session::Anonymous => Guard::Redirect(Navigation::Login),
            Session::Authenticated { identity } => Guard::Allow(identity),
        }
    }
}

/// Intent to navigate, interpreted by the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Navigation {
    Dashboard,
    Login,
    Register,
}

impl Navigation {
    pub fn path(&self) -> &'static str {
        match self {
            Navigation::Dashboard => "/dashboard",
            Navigation::Login => "/login",
            Navigation::Register => "/register",
        }
    }
}

/// Outcome of checking a protected view against the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Guard<'a> {
    /// Render a neutral loading state and issue no data requests
    Loading,
    /// Leave the protected view
    Redirect(Navigation),
    /// Render the view for this identity
    Allow(&'a Identity),
}
