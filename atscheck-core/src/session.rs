//! Explicit login session and navigation state.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{AtsCheckError, Result};

/// Page the user is currently on.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "view", content = "resumeId", rename_all = "snake_case")]
pub enum View {
    /// Public landing page.
    #[default]
    Landing,
    /// Login form.
    Login,
    /// Registration form.
    Register,
    /// Resume library.
    Dashboard,
    /// Analysis results for one resume.
    Results(i64),
}

/// Profile of the logged-in user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    /// Login email.
    pub email: String,
    /// Given name.
    #[serde(default)]
    pub first_name: String,
    /// Family name.
    #[serde(default)]
    pub last_name: String,
}

impl SessionUser {
    /// Full name, falling back to the email when no name is known.
    pub fn display_name(&self) -> String {
        let name = format!("{} {}", self.first_name.trim(), self.last_name.trim());
        let name = name.trim();
        if name.is_empty() {
            self.email.clone()
        } else {
            name.to_string()
        }
    }
}

/// Credentials plus the last visited view.
///
/// Set on login, cleared on logout; the caller decides where it is persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Session {
    /// Bearer token issued by the backend.
    pub token: Option<String>,
    /// Logged-in user profile.
    pub user: Option<SessionUser>,
    /// Last visited view.
    pub current_view: View,
}

impl Session {
    /// Store credentials and move to the dashboard.
    pub fn login(&mut self, token: impl Into<String>, user: SessionUser) {
        debug!("session opened for {}", user.email);
        self.token = Some(token.into());
        self.user = Some(user);
        self.current_view = View::Dashboard;
    }

    /// Drop credentials and return to the landing page.
    pub fn logout(&mut self) {
        if let Some(user) = self.user.as_ref() {
            debug!("session closed for {}", user.email);
        }
        self.token = None;
        self.user = None;
        self.current_view = View::Landing;
    }

    /// Switch to another view.
    pub fn navigate(&mut self, view: View) {
        self.current_view = view;
    }

    /// Whether a token is held.
    pub fn is_authenticated(&self) -> bool {
        self.token.as_deref().is_some_and(|token| !token.is_empty())
    }

    /// The bearer token, or [`AtsCheckError::Unauthenticated`].
    pub fn require_token(&self) -> Result<&str> {
        self.token
            .as_deref()
            .filter(|token| !token.is_empty())
            .ok_or(AtsCheckError::Unauthenticated)
    }
}
