use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::Profile;

/// Stub login record. There is no password and no verification; it only marks
/// that someone has "signed in" on this device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub email: String,
}

impl Session {
    pub fn new(email: &str) -> Result<Self, SessionError> {
        let email = email.trim();
        if email.is_empty() {
            return Err(SessionError::MissingEmail);
        }
        Ok(Self {
            email: email.to_string(),
        })
    }

    pub fn is_valid(&self) -> bool {
        !self.email.trim().is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    MissingEmail,
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::MissingEmail => write!(f, "email is required to log in"),
        }
    }
}

impl std::error::Error for SessionError {}

/// Which screen a shell should show on startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GateState {
    /// No session: show login
    Unauthenticated,
    /// Logged in but no business profile yet: show setup
    NeedsProfile,
    /// Show the dashboard
    Ready,
}

impl GateState {
    pub fn resolve(session: Option<&Session>, profile: Option<&Profile>) -> Self {
        match (session, profile) {
            (None, _) => GateState::Unauthenticated,
            (Some(_), None) => GateState::NeedsProfile,
            (Some(_), Some(_)) => GateState::Ready,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GateState::Unauthenticated => "unauthenticated",
            GateState::NeedsProfile => "needs-profile",
            GateState::Ready => "ready",
        }
    }
}

impl fmt::Display for GateState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// UI colour scheme preference, kept next to the ledger data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(format!("unknown theme '{}'", other)),
        }
    }
}
