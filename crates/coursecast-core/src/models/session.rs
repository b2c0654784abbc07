use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};

/// Visible state of an upload session.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum SessionState {
    #[default]
    Idle,
    RequestingUrl,
    Uploading,
    Processing,
    Complete,
    Error,
}

impl SessionState {
    /// `complete` and `error` do not self-transition; only a reset leaves them.
    pub fn is_terminal(self) -> bool {
        matches!(self, SessionState::Complete | SessionState::Error)
    }
}

impl Display for SessionState {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            SessionState::Idle => write!(f, "idle"),
            SessionState::RequestingUrl => write!(f, "requesting-url"),
            SessionState::Uploading => write!(f, "uploading"),
            SessionState::Processing => write!(f, "processing"),
            SessionState::Complete => write!(f, "complete"),
            SessionState::Error => write!(f, "error"),
        }
    }
}
