//! Observable session state and outcome callbacks.

use coursecast_core::models::SessionState;
use serde::Serialize;

/// What an observer sees of the current session.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UploadSnapshot {
    pub state: SessionState,
    /// Correlation id of the upload record, once the backend issued one.
    pub upload_id: Option<String>,
    /// Transfer progress, 0 to 100. Non-decreasing within a session.
    pub progress_percent: u8,
    /// User-facing message of the failure, set only in [`SessionState::Error`].
    pub last_error: Option<String>,
    pub error_code: Option<&'static str>,
}

impl UploadSnapshot {
    pub fn is_terminal(&self) -> bool {
        self.state.is_terminal()
    }
}

/// Outcome notifications. Exactly one of them fires per session that reaches a terminal
/// state; a cancelled session fires neither.
pub trait UploadCallbacks: Send + Sync {
    fn on_upload_complete(&self, playback_id: &str, duration_secs: f64);

    fn on_error(&self, _message: &str) {}
}

/// Callbacks that ignore every outcome.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopCallbacks;

impl UploadCallbacks for NoopCallbacks {
    fn on_upload_complete(&self, _playback_id: &str, _duration_secs: f64) {}
}
